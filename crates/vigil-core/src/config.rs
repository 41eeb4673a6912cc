//! Moderation engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::classifier::DEFAULT_MIN_LENGTH;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Tunables for the moderation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Maximum wait for a media analyzer, in milliseconds.
    pub media_timeout_ms: u64,
    /// Moderator identity used when none is supplied.
    pub default_moderator: String,
    /// Unmatched text shorter than this (in characters) is sent to review.
    pub min_content_length: usize,
    /// Number of log entries shown by recent-activity views.
    pub recent_actions: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            media_timeout_ms: 10_000,
            default_moderator: "Moderator".to_string(),
            min_content_length: DEFAULT_MIN_LENGTH,
            recent_actions: 5,
        }
    }
}

impl ModerationConfig {
    /// Loads config from a JSON file. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "media_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.default_moderator.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_moderator must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The media analyzer wait bound.
    pub fn media_timeout(&self) -> Duration {
        Duration::from_millis(self.media_timeout_ms)
    }

    /// Sets the media timeout.
    pub fn with_media_timeout(mut self, timeout: Duration) -> Self {
        self.media_timeout_ms = timeout.as_millis() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ModerationConfig::default();
        assert_eq!(config.media_timeout(), Duration::from_secs(10));
        assert_eq!(config.min_content_length, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ModerationConfig =
            serde_json::from_str(r#"{"default_moderator": "alice"}"#).unwrap();
        assert_eq!(config.default_moderator, "alice");
        assert_eq!(config.media_timeout_ms, 10_000);
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ModerationConfig {
            media_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = ModerationConfig::load("/nonexistent/vigil/config.json").unwrap();
        assert_eq!(config, ModerationConfig::default());
    }
}
