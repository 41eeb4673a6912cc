//! Content lifecycle state machine.
//!
//! ```text
//! submit ──► analyzing ──► safe | suspicious | harmful ──► (moderate)* ──► safe | suspicious | harmful
//! ```
//!
//! A record is classified exactly once, automatically, and is only written
//! to the store after that classification completes, so `analyzing` is
//! never persisted. Moderator decisions may follow any number of times.
//!
//! ## Concurrency
//!
//! Each record sits behind its own mutex. A moderation holds that mutex
//! across the store write and the log append, so two decisions on the same
//! record never interleave. Records share no invariant, so there is no
//! cross-record locking.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classifier::{Classification, LexiconClassifier, TextClassifier};
use crate::config::ModerationConfig;
use crate::content::{
    Content, ContentId, ContentStatus, ContentType, ModerationAction, ModeratorDecision,
    Submission,
};
use crate::error::{ModerationError, Result};
use crate::media::{analyze_with_fallback, AnalyzerRegistry, MediaAnalyzer, MediaUpload};
use crate::moderation_log::ModerationLog;
use crate::store::{index_contents, ContentStore};

/// Outcome of a moderation request.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    /// The decision was applied and logged.
    Applied(ModerationAction),
    /// No content with that id; nothing changed.
    NotFound,
}

impl ModerationOutcome {
    /// Returns true if the decision was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, ModerationOutcome::Applied(_))
    }
}

/// Filter for listing content.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    /// Only this content type.
    pub content_type: Option<ContentType>,
    /// Only this status.
    pub status: Option<ContentStatus>,
    /// Case-insensitive substring of the payload.
    pub search: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl ContentFilter {
    fn matches(&self, content: &Content) -> bool {
        if let Some(t) = self.content_type {
            if content.content_type != t {
                return false;
            }
        }
        if let Some(s) = self.status {
            if content.status != s {
                return false;
            }
        }
        if let Some(ref needle) = self.search {
            if !content
                .payload
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Counts across all content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStats {
    pub total: usize,
    pub safe: usize,
    pub suspicious: usize,
    pub harmful: usize,
    /// Suspicious and not yet reviewed.
    pub pending_review: usize,
    /// Safe after a moderator review.
    pub approved_by_moderators: usize,
    /// Harmful after a moderator review.
    pub blocked_by_moderators: usize,
    /// Entries in the moderation log.
    pub moderation_actions: usize,
}

type Record = Arc<Mutex<Content>>;

/// Owns content records from submission through moderation.
pub struct ContentLifecycle {
    classifier: TextClassifier,
    analyzers: AnalyzerRegistry,
    store: Arc<dyn ContentStore>,
    records: RwLock<HashMap<ContentId, Record>>,
    log: RwLock<ModerationLog>,
    config: ModerationConfig,
}

impl ContentLifecycle {
    /// Loads persisted state from the store and returns a ready lifecycle.
    pub fn open(
        store: Arc<dyn ContentStore>,
        analyzers: AnalyzerRegistry,
        config: ModerationConfig,
    ) -> Result<Self> {
        let state = store.load()?;

        let loaded = state.contents.len();
        let records: HashMap<ContentId, Record> = index_contents(state.contents)
            .into_iter()
            .map(|(id, content)| {
                if content.status == ContentStatus::Analyzing {
                    warn!(id = %id, "Loaded content that never finished classification");
                }
                (id, Arc::new(Mutex::new(content)))
            })
            .collect();

        if records.len() != loaded {
            warn!(
                loaded,
                unique = records.len(),
                "Store returned duplicate content ids"
            );
        }

        info!(
            contents = records.len(),
            actions = state.actions.len(),
            media_analyzers = !analyzers.is_empty(),
            "Content lifecycle opened"
        );

        Ok(Self {
            classifier: TextClassifier::with_lexicon(LexiconClassifier::with_min_length(
                config.min_content_length,
            )),
            analyzers,
            store,
            records: RwLock::new(records),
            log: RwLock::new(ModerationLog::from_entries(state.actions)),
            config,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Validates, classifies, and stores a submission, returning its id.
    ///
    /// Text is classified synchronously. Media is handed to the analyzer
    /// registered for its type, bounded by the configured timeout; analyzer
    /// failures yield the fallback classification rather than an error.
    pub async fn submit(&self, submission: Submission) -> Result<ContentId> {
        let Submission {
            content_type,
            text,
            file,
        } = submission;

        let (payload, mime_type, upload) = if content_type.is_media() {
            let upload = file
                .filter(|f| !f.file_name.trim().is_empty())
                .ok_or_else(|| {
                    ModerationError::Validation(format!(
                        "a file is required for {} content",
                        content_type.as_str()
                    ))
                })?;
            (upload.file_name.clone(), upload.mime_type.clone(), Some(upload))
        } else {
            if text.trim().is_empty() {
                return Err(ModerationError::Validation(
                    "text content must not be empty".into(),
                ));
            }
            (text, None, None)
        };

        let analyzer = if upload.is_some() {
            Some(self.analyzers.get(content_type).ok_or_else(|| {
                ModerationError::InvariantViolation(format!(
                    "no media analyzer registered for {} content",
                    content_type.as_str()
                ))
            })?)
        } else {
            None
        };

        let mut content = Content::new(
            ContentId::generate(),
            content_type,
            payload,
            mime_type,
            Utc::now(),
        );
        debug!(id = %content.id, content_type = content_type.as_str(), "Analyzing submission");

        let classification = match (analyzer, upload) {
            (Some(analyzer), Some(upload)) => self.classify_media(analyzer, upload).await,
            _ => self.classifier.classify(&content.payload),
        };
        content.apply_classification(classification);

        let id = content.id.clone();
        if self.record(&id).is_some() {
            return Err(duplicate_id(&id));
        }

        // Stored before the records lock is taken.
        self.store.save_content(&content)?;
        info!(
            id = %id,
            content_type = content_type.as_str(),
            status = content.status.as_str(),
            confidence = content.confidence,
            "Content submitted"
        );

        match self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(id.clone())
        {
            Entry::Occupied(_) => Err(duplicate_id(&id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(content)));
                Ok(id)
            }
        }
    }

    async fn classify_media(
        &self,
        analyzer: Arc<dyn MediaAnalyzer>,
        upload: MediaUpload,
    ) -> Classification {
        analyze_with_fallback(analyzer, Arc::new(upload), self.config.media_timeout())
            .await
            .into()
    }

    /// Returns a snapshot of a record.
    pub fn get(&self, id: &ContentId) -> Option<Content> {
        let record = self.record(id)?;
        let content = record.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(content.clone())
    }

    /// Applies a moderator decision to a record, regardless of its status.
    ///
    /// The record's status and review fields are overwritten and exactly
    /// one entry is appended to the log. Unknown ids change nothing.
    pub fn moderate(
        &self,
        id: &ContentId,
        decision: ModeratorDecision,
        notes: Option<String>,
        moderator: &str,
    ) -> Result<ModerationOutcome> {
        let moderator = moderator.trim();
        if moderator.is_empty() {
            return Err(ModerationError::Validation(
                "moderator identity must not be empty".into(),
            ));
        }
        let notes = notes.filter(|n| !n.trim().is_empty());

        let Some(record) = self.record(id) else {
            debug!(id = %id, "Moderation requested for unknown content");
            return Ok(ModerationOutcome::NotFound);
        };

        let mut content = record.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Utc::now();
        let previous = content.status;

        let mut updated = content.clone();
        updated.apply_decision(decision, notes.clone(), moderator, now);

        let action = ModerationAction {
            content_id: id.clone(),
            action: decision,
            notes,
            moderator: moderator.to_string(),
            resulting_status: updated.status,
            timestamp: now,
        };

        self.store.save_moderation(&updated, &action)?;
        *content = updated;
        self.log
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .append(action.clone());

        info!(
            id = %id,
            action = decision.as_str(),
            moderator,
            from = previous.as_str(),
            to = content.status.as_str(),
            "Content moderated"
        );

        Ok(ModerationOutcome::Applied(action))
    }

    /// Moderates using the configured default moderator identity.
    pub fn moderate_as_default(
        &self,
        id: &ContentId,
        decision: ModeratorDecision,
        notes: Option<String>,
    ) -> Result<ModerationOutcome> {
        let moderator = self.config.default_moderator.clone();
        self.moderate(id, decision, notes, &moderator)
    }

    /// Lists content matching a filter, newest first.
    pub fn list(&self, filter: &ContentFilter) -> Vec<Content> {
        let mut contents: Vec<Content> = self
            .snapshot_all()
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        contents.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        if let Some(limit) = filter.limit {
            contents.truncate(limit);
        }
        contents
    }

    /// Content awaiting a moderator, oldest first.
    ///
    /// Every suspicious record is pending, including records a moderator
    /// sent back with `edit`.
    pub fn review_queue(&self, filter: &ContentFilter) -> Vec<Content> {
        let mut contents: Vec<Content> = self
            .snapshot_all()
            .into_iter()
            .filter(|c| c.awaits_review() && filter.matches(c))
            .collect();
        contents.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        if let Some(limit) = filter.limit {
            contents.truncate(limit);
        }
        contents
    }

    /// Reviewed content that ended safe or harmful, most recently reviewed first.
    pub fn reviewed(&self, filter: &ContentFilter) -> Vec<Content> {
        let mut contents: Vec<Content> = self
            .snapshot_all()
            .into_iter()
            .filter(|c| {
                c.is_reviewed()
                    && matches!(c.status, ContentStatus::Safe | ContentStatus::Harmful)
                    && filter.matches(c)
            })
            .collect();
        contents.sort_by(|a, b| {
            let at = |c: &Content| c.moderation.as_ref().map(|m| m.moderated_at);
            at(b).cmp(&at(a))
        });
        if let Some(limit) = filter.limit {
            contents.truncate(limit);
        }
        contents
    }

    /// Aggregate counts.
    pub fn stats(&self) -> ContentStats {
        let mut stats = ContentStats::default();
        for c in self.snapshot_all() {
            stats.total += 1;
            match c.status {
                ContentStatus::Safe => stats.safe += 1,
                ContentStatus::Suspicious => stats.suspicious += 1,
                ContentStatus::Harmful => stats.harmful += 1,
                ContentStatus::Analyzing => {}
            }
            if c.awaits_review() {
                stats.pending_review += 1;
            }
            if c.is_reviewed() {
                match c.status {
                    ContentStatus::Safe => stats.approved_by_moderators += 1,
                    ContentStatus::Harmful => stats.blocked_by_moderators += 1,
                    _ => {}
                }
            }
        }
        stats.moderation_actions = self.read_log().len();
        stats
    }

    /// Log entries for one record, oldest first.
    pub fn actions_for(&self, id: &ContentId) -> Vec<ModerationAction> {
        self.read_log().for_content(id)
    }

    /// The `n` most recent log entries, newest first.
    pub fn recent_actions(&self, n: usize) -> Vec<ModerationAction> {
        self.read_log().recent(n)
    }

    /// Total log entries.
    pub fn action_count(&self) -> usize {
        self.read_log().len()
    }

    fn record(&self, id: &ContentId) -> Option<Record> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    fn snapshot_all(&self) -> Vec<Content> {
        let records: Vec<Record> = self
            .records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect();
        records
            .iter()
            .map(|r| r.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone())
            .collect()
    }

    fn read_log(&self) -> RwLockReadGuard<'_, ModerationLog> {
        self.log.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn duplicate_id(id: &ContentId) -> ModerationError {
    ModerationError::InvariantViolation(format!("content id {} already exists", id))
}
