//! Media analysis contract and fallback policy.
//!
//! Non-text content is classified by an external [`MediaAnalyzer`]. The
//! core never lets an analyzer failure reach the submitter: errors, panics,
//! timeouts and malformed results are all replaced by a fixed conservative
//! result that sends the content to manual review.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{Classification, Tier};
use crate::content::ContentType;

/// Details reported when analysis could not complete.
pub const FALLBACK_DETAILS: &str = "unable to analyze content; manual review required";

/// Confidence reported when analysis could not complete.
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// An uploaded media file. The bytes are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Creates an upload.
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Result returned by a media analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tier: Tier,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    pub details: String,
}

impl AnalysisResult {
    /// Creates an analysis result.
    pub fn new(tier: Tier, confidence: f32, details: impl Into<String>) -> Self {
        Self {
            tier,
            confidence,
            details: details.into(),
        }
    }

    /// The conservative result substituted for any analyzer failure.
    pub fn fallback() -> Self {
        Self::new(Tier::Suspicious, FALLBACK_CONFIDENCE, FALLBACK_DETAILS)
    }
}

impl From<AnalysisResult> for Classification {
    fn from(result: AnalysisResult) -> Self {
        Classification::new(result.tier, result.confidence, result.details)
    }
}

/// Errors an analyzer may report.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The media could not be read or decoded.
    #[error("unreadable media: {0}")]
    Unreadable(String),

    /// The analyzer does not handle this media.
    #[error("unsupported media: {0}")]
    Unsupported(String),

    /// The analysis backend failed.
    #[error("analysis backend error: {0}")]
    Backend(String),
}

/// External capability that classifies non-text media.
#[async_trait]
pub trait MediaAnalyzer: Send + Sync {
    /// Classifies the upload.
    async fn analyze(&self, upload: &MediaUpload) -> Result<AnalysisResult, AnalysisError>;

    /// Returns the name of this analyzer for logging.
    fn name(&self) -> &'static str;
}

/// Runs an analyzer once with a bounded wait, substituting the fallback
/// result on error, panic, timeout, or a non-finite confidence.
pub async fn analyze_with_fallback(
    analyzer: Arc<dyn MediaAnalyzer>,
    upload: Arc<MediaUpload>,
    limit: Duration,
) -> AnalysisResult {
    let name = analyzer.name();
    let task_upload = Arc::clone(&upload);
    let mut handle = tokio::spawn(async move { analyzer.analyze(&task_upload).await });

    let outcome = match tokio::time::timeout(limit, &mut handle).await {
        Ok(joined) => joined,
        Err(_) => {
            handle.abort();
            warn!(
                analyzer = name,
                file = %upload.file_name,
                timeout_ms = limit.as_millis() as u64,
                "Media analysis timed out, using fallback"
            );
            return AnalysisResult::fallback();
        }
    };

    match outcome {
        Ok(Ok(result)) if result.confidence.is_finite() => {
            debug!(analyzer = name, tier = ?result.tier, "Media analyzed");
            AnalysisResult {
                confidence: result.confidence.clamp(0.0, 1.0),
                ..result
            }
        }
        Ok(Ok(result)) => {
            warn!(
                analyzer = name,
                confidence = result.confidence,
                "Media analyzer returned invalid confidence, using fallback"
            );
            AnalysisResult::fallback()
        }
        Ok(Err(e)) => {
            warn!(analyzer = name, error = %e, "Media analysis failed, using fallback");
            AnalysisResult::fallback()
        }
        Err(e) => {
            warn!(analyzer = name, error = %e, "Media analyzer task aborted, using fallback");
            AnalysisResult::fallback()
        }
    }
}

/// Analyzers registered per media type.
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    analyzers: HashMap<ContentType, Arc<dyn MediaAnalyzer>>,
}

impl AnalyzerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an analyzer for one media type. Text cannot be registered.
    pub fn register(mut self, content_type: ContentType, analyzer: Arc<dyn MediaAnalyzer>) -> Self {
        if content_type.is_media() {
            self.analyzers.insert(content_type, analyzer);
        } else {
            warn!("Ignoring media analyzer registered for text content");
        }
        self
    }

    /// Registers one analyzer for every media type.
    pub fn register_all(self, analyzer: Arc<dyn MediaAnalyzer>) -> Self {
        ContentType::all()
            .iter()
            .filter(|t| t.is_media())
            .fold(self, |registry, t| registry.register(*t, Arc::clone(&analyzer)))
    }

    /// Returns the analyzer for a media type, if registered.
    pub fn get(&self, content_type: ContentType) -> Option<Arc<dyn MediaAnalyzer>> {
        self.analyzers.get(&content_type).cloned()
    }

    /// Returns true if no analyzers are registered.
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(AnalysisResult);

    #[async_trait]
    impl MediaAnalyzer for Fixed {
        async fn analyze(&self, _upload: &MediaUpload) -> Result<AnalysisResult, AnalysisError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct Failing;

    #[async_trait]
    impl MediaAnalyzer for Failing {
        async fn analyze(&self, _upload: &MediaUpload) -> Result<AnalysisResult, AnalysisError> {
            Err(AnalysisError::Backend("service unavailable".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct Stalled;

    #[async_trait]
    impl MediaAnalyzer for Stalled {
        async fn analyze(&self, _upload: &MediaUpload) -> Result<AnalysisResult, AnalysisError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(AnalysisResult::new(Tier::Safe, 1.0, "late"))
        }

        fn name(&self) -> &'static str {
            "stalled"
        }
    }

    struct Panicking;

    #[async_trait]
    impl MediaAnalyzer for Panicking {
        async fn analyze(&self, _upload: &MediaUpload) -> Result<AnalysisResult, AnalysisError> {
            panic!("decoder crashed");
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    fn upload() -> Arc<MediaUpload> {
        Arc::new(MediaUpload::new("photo.png", None, vec![1, 2, 3]))
    }

    #[tokio::test]
    async fn passes_through_valid_result() {
        let analyzer = Arc::new(Fixed(AnalysisResult::new(Tier::Harmful, 0.9, "explicit")));
        let result = analyze_with_fallback(analyzer, upload(), Duration::from_secs(1)).await;
        assert_eq!(result.tier, Tier::Harmful);
        assert_eq!(result.details, "explicit");
    }

    #[tokio::test]
    async fn clamps_out_of_range_confidence() {
        let analyzer = Arc::new(Fixed(AnalysisResult::new(Tier::Harmful, 1.3, "x")));
        let result = analyze_with_fallback(analyzer, upload(), Duration::from_secs(1)).await;
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn error_becomes_fallback() {
        let result = analyze_with_fallback(Arc::new(Failing), upload(), Duration::from_secs(1)).await;
        assert_eq!(result, AnalysisResult::fallback());
        assert_eq!(result.tier, Tier::Suspicious);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.details, FALLBACK_DETAILS);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_fallback() {
        let result =
            analyze_with_fallback(Arc::new(Stalled), upload(), Duration::from_millis(50)).await;
        assert_eq!(result, AnalysisResult::fallback());
    }

    #[tokio::test]
    async fn panic_becomes_fallback() {
        let result =
            analyze_with_fallback(Arc::new(Panicking), upload(), Duration::from_secs(1)).await;
        assert_eq!(result, AnalysisResult::fallback());
    }

    #[tokio::test]
    async fn nan_confidence_becomes_fallback() {
        let analyzer = Arc::new(Fixed(AnalysisResult::new(Tier::Safe, f32::NAN, "?")));
        let result = analyze_with_fallback(analyzer, upload(), Duration::from_secs(1)).await;
        assert_eq!(result, AnalysisResult::fallback());
    }

    #[test]
    fn registry_lookup() {
        let registry = AnalyzerRegistry::new().register(ContentType::Image, Arc::new(Failing));
        assert!(registry.get(ContentType::Image).is_some());
        assert!(registry.get(ContentType::Video).is_none());

        let registry = AnalyzerRegistry::new().register_all(Arc::new(Failing));
        assert!(registry.get(ContentType::Audio).is_some());
        assert!(registry.get(ContentType::Text).is_none());
    }
}
