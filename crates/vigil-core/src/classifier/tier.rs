//! Safety tiers and classification results.

use serde::{Deserialize, Serialize};

/// Confidence attached to a harmful verdict from the text rules.
pub const HARMFUL_CONFIDENCE: f32 = 0.85;

/// Confidence attached to a suspicious verdict from the text rules.
pub const SUSPICIOUS_CONFIDENCE: f32 = 0.65;

/// Confidence attached to text too short to judge.
pub const SHORT_CONTENT_CONFIDENCE: f32 = 0.5;

/// Confidence attached to text with no rule hits.
pub const SAFE_CONFIDENCE: f32 = 0.9;

/// Report used when text is too short to judge.
pub const SHORT_CONTENT_REPORT: &str = "insufficient content for reliable analysis";

/// Report used when no rule matched.
pub const SAFE_REPORT: &str =
    "Content appears to be safe based on textual analysis. No harmful patterns detected.";

/// Terminal safety classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Content may be published.
    Safe,
    /// Content needs a human decision.
    Suspicious,
    /// Content violates guidelines.
    Harmful,
}

impl Tier {
    /// Returns all tiers, least to most severe.
    pub fn all() -> &'static [Tier] {
        &[Tier::Safe, Tier::Suspicious, Tier::Harmful]
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Safe => "safe",
            Tier::Suspicious => "suspicious",
            Tier::Harmful => "harmful",
        }
    }
}

/// The outcome of classifying one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Resolved tier.
    pub tier: Tier,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    /// Human-readable explanation.
    pub report: String,
}

impl Classification {
    /// Creates a classification, clamping confidence into range.
    pub fn new(tier: Tier, confidence: f32, report: impl Into<String>) -> Self {
        Self {
            tier,
            confidence: confidence.clamp(0.0, 1.0),
            report: report.into(),
        }
    }

    /// Harmful verdict naming what was found.
    pub fn harmful(label: &str) -> Self {
        Self::new(Tier::Harmful, HARMFUL_CONFIDENCE, harmful_report(label))
    }

    /// Suspicious verdict naming what was found.
    pub fn suspicious(label: &str) -> Self {
        Self::new(Tier::Suspicious, SUSPICIOUS_CONFIDENCE, suspicious_report(label))
    }

    /// Verdict for text too short to judge.
    pub fn short_content() -> Self {
        Self::new(
            Tier::Suspicious,
            SHORT_CONTENT_CONFIDENCE,
            SHORT_CONTENT_REPORT,
        )
    }

    /// Verdict for text with no hits.
    pub fn safe() -> Self {
        Self::new(Tier::Safe, SAFE_CONFIDENCE, SAFE_REPORT)
    }
}

/// Report text for a harmful verdict.
pub fn harmful_report(label: &str) -> String {
    format!(
        "Content contains potentially harmful language or themes related to {}. \
         This content violates our community guidelines.",
        label
    )
}

/// Report text for a suspicious verdict.
pub fn suspicious_report(label: &str) -> String {
    format!(
        "Content contains potentially concerning language or themes that require \
         further review by our moderation team: {}.",
        label
    )
}
