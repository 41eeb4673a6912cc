//! Content records, moderator decisions, and audit entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::{Classification, Tier};
use crate::media::MediaUpload;

/// Unique identifier of a content record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of submitted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Audio,
}

impl ContentType {
    /// Returns all content types.
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Text,
            ContentType::Image,
            ContentType::Video,
            ContentType::Audio,
        ]
    }

    /// Returns true for types classified by a media analyzer.
    pub fn is_media(&self) -> bool {
        !matches!(self, ContentType::Text)
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ContentType::Text),
            "image" => Some(ContentType::Image),
            "video" => Some(ContentType::Video),
            "audio" => Some(ContentType::Audio),
            _ => None,
        }
    }
}

/// Moderation status of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Submitted, classification not yet complete.
    Analyzing,
    Safe,
    Suspicious,
    Harmful,
}

impl ContentStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Analyzing => "analyzing",
            ContentStatus::Safe => "safe",
            ContentStatus::Suspicious => "suspicious",
            ContentStatus::Harmful => "harmful",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "analyzing" => Some(ContentStatus::Analyzing),
            "safe" => Some(ContentStatus::Safe),
            "suspicious" => Some(ContentStatus::Suspicious),
            "harmful" => Some(ContentStatus::Harmful),
            _ => None,
        }
    }
}

impl From<Tier> for ContentStatus {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Safe => ContentStatus::Safe,
            Tier::Suspicious => ContentStatus::Suspicious,
            Tier::Harmful => ContentStatus::Harmful,
        }
    }
}

/// A human moderator's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeratorDecision {
    /// Publish the content.
    Approve,
    /// Send the content back for editing.
    Edit,
    /// Block the content.
    Block,
}

impl ModeratorDecision {
    /// The status a decision moves content into.
    pub fn resulting_status(&self) -> ContentStatus {
        match self {
            ModeratorDecision::Approve => ContentStatus::Safe,
            ModeratorDecision::Edit => ContentStatus::Suspicious,
            ModeratorDecision::Block => ContentStatus::Harmful,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeratorDecision::Approve => "approve",
            ModeratorDecision::Edit => "edit",
            ModeratorDecision::Block => "block",
        }
    }

    /// Parse from database string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(ModeratorDecision::Approve),
            "edit" => Some(ModeratorDecision::Edit),
            "block" => Some(ModeratorDecision::Block),
            _ => None,
        }
    }
}

/// Review fields written by a moderator; always set together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRecord {
    /// Free-text notes (optional).
    pub notes: Option<String>,
    /// Moderator identity.
    pub moderated_by: String,
    /// When the decision was made.
    pub moderated_at: DateTime<Utc>,
}

/// A submitted piece of content and its moderation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub content_type: ContentType,
    /// Raw text, or the file name for media.
    pub payload: String,
    /// MIME type recorded for media submissions.
    pub mime_type: Option<String>,
    pub status: ContentStatus,
    pub submitted_at: DateTime<Utc>,
    /// Classifier explanation, set once classification completes.
    pub report: Option<String>,
    /// Confidence of whichever classifier resolved the status.
    pub confidence: f32,
    /// Present once a moderator has reviewed the content.
    pub moderation: Option<ModerationRecord>,
}

impl Content {
    /// Creates a record in the `analyzing` state.
    pub fn new(
        id: ContentId,
        content_type: ContentType,
        payload: impl Into<String>,
        mime_type: Option<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content_type,
            payload: payload.into(),
            mime_type,
            status: ContentStatus::Analyzing,
            submitted_at,
            report: None,
            confidence: 0.0,
            moderation: None,
        }
    }

    /// Writes the automatic classification result.
    pub fn apply_classification(&mut self, classification: Classification) {
        self.status = classification.tier.into();
        self.confidence = classification.confidence;
        self.report = Some(classification.report);
    }

    /// Writes a moderator decision, overwriting any earlier review.
    pub fn apply_decision(
        &mut self,
        decision: ModeratorDecision,
        notes: Option<String>,
        moderator: &str,
        at: DateTime<Utc>,
    ) {
        self.status = decision.resulting_status();
        self.moderation = Some(ModerationRecord {
            notes,
            moderated_by: moderator.to_string(),
            moderated_at: at,
        });
    }

    /// Returns true once a moderator has reviewed the content.
    pub fn is_reviewed(&self) -> bool {
        self.moderation.is_some()
    }

    /// Returns true if the content awaits a moderator.
    ///
    /// Any suspicious record does, including one sent back with `edit`.
    pub fn awaits_review(&self) -> bool {
        self.status == ContentStatus::Suspicious
    }
}

/// Immutable audit entry for one moderator decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationAction {
    /// Content the decision applied to (by id only).
    pub content_id: ContentId,
    pub action: ModeratorDecision,
    pub notes: Option<String>,
    pub moderator: String,
    /// Status the decision produced.
    pub resulting_status: ContentStatus,
    pub timestamp: DateTime<Utc>,
}

/// Input to `ContentLifecycle::submit`.
#[derive(Debug, Clone)]
pub struct Submission {
    pub content_type: ContentType,
    /// Text body for text submissions; ignored for media.
    pub text: String,
    /// Uploaded file for media submissions.
    pub file: Option<MediaUpload>,
}

impl Submission {
    /// A text submission.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            text: text.into(),
            file: None,
        }
    }

    /// A media submission with its uploaded file.
    pub fn media(content_type: ContentType, file: MediaUpload) -> Self {
        Self {
            content_type,
            text: String::new(),
            file: Some(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_mapping() {
        assert_eq!(
            ModeratorDecision::Approve.resulting_status(),
            ContentStatus::Safe
        );
        assert_eq!(
            ModeratorDecision::Edit.resulting_status(),
            ContentStatus::Suspicious
        );
        assert_eq!(
            ModeratorDecision::Block.resulting_status(),
            ContentStatus::Harmful
        );
    }

    #[test]
    fn string_forms_roundtrip() {
        for t in ContentType::all() {
            assert_eq!(ContentType::parse(t.as_str()), Some(*t));
        }
        assert_eq!(ContentStatus::parse("harmful"), Some(ContentStatus::Harmful));
        assert_eq!(ContentStatus::parse("pending"), None);
        assert_eq!(ModeratorDecision::parse("edit"), Some(ModeratorDecision::Edit));
    }

    #[test]
    fn new_content_is_analyzing() {
        let c = Content::new(
            ContentId::generate(),
            ContentType::Text,
            "hello",
            None,
            Utc::now(),
        );
        assert_eq!(c.status, ContentStatus::Analyzing);
        assert!(c.report.is_none());
        assert!(!c.is_reviewed());
    }

    #[test]
    fn apply_decision_sets_review_fields_together() {
        let mut c = Content::new(
            ContentId::from("c1"),
            ContentType::Text,
            "hello",
            None,
            Utc::now(),
        );
        c.apply_classification(Classification::new(Tier::Suspicious, 0.65, "r"));
        assert!(c.awaits_review());

        let at = Utc::now();
        c.apply_decision(ModeratorDecision::Approve, None, "alice", at);
        assert_eq!(c.status, ContentStatus::Safe);
        let review = c.moderation.as_ref().unwrap();
        assert_eq!(review.moderated_by, "alice");
        assert_eq!(review.moderated_at, at);
        assert!(!c.awaits_review());
    }

    #[test]
    fn edit_decision_keeps_content_pending() {
        let mut c = Content::new(
            ContentId::from("c2"),
            ContentType::Text,
            "hello",
            None,
            Utc::now(),
        );
        c.apply_classification(Classification::new(Tier::Suspicious, 0.65, "r"));
        c.apply_decision(ModeratorDecision::Edit, Some("reword".into()), "bob", Utc::now());
        assert!(c.is_reviewed());
        assert!(c.awaits_review());
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ContentId::generate(), ContentId::generate());
    }
}
