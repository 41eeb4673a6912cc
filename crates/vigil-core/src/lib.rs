//! Vigil Core - Classification, moderation lifecycle, and audit logic.
//!
//! This crate provides the decision engine of the Vigil moderation platform:
//!
//! - [`classifier`]: ordered lexical and contextual rules for text
//! - [`media`]: the analyzer contract for non-text media and its fallback policy
//! - [`lifecycle`]: the content state machine driven by classification and moderators
//! - [`moderation_log`]: the append-only audit trail of moderator decisions
//! - [`store`]: the durability capability consumed by the lifecycle
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vigil_core::{
//!     AnalyzerRegistry, ContentLifecycle, MemoryStore, ModerationConfig, ModeratorDecision,
//!     Submission,
//! };
//!
//! # async fn run() -> vigil_core::Result<()> {
//! let lifecycle = ContentLifecycle::open(
//!     Arc::new(MemoryStore::new()),
//!     AnalyzerRegistry::new(),
//!     ModerationConfig::default(),
//! )?;
//!
//! let id = lifecycle.submit(Submission::text("hello, nice weather today")).await?;
//! lifecycle.moderate(&id, ModeratorDecision::Block, Some("spam".into()), "alice")?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod media;
pub mod moderation_log;
pub mod store;

pub use classifier::{Classification, ContextualRules, LexiconClassifier, TextClassifier, Tier};
pub use config::{ConfigError, ModerationConfig};
pub use content::{
    Content, ContentId, ContentStatus, ContentType, ModerationAction, ModerationRecord,
    ModeratorDecision, Submission,
};
pub use error::{ModerationError, Result};
pub use lifecycle::{ContentFilter, ContentLifecycle, ContentStats, ModerationOutcome};
pub use media::{AnalysisError, AnalysisResult, AnalyzerRegistry, MediaAnalyzer, MediaUpload};
pub use moderation_log::ModerationLog;
pub use store::{ContentStore, MemoryStore, StoreError, StoredState};
