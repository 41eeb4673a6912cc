//! Lifecycle error types.
//!
//! Only failures the caller must act on are errors. Media analysis
//! failures are absorbed into a fallback classification, and unknown ids
//! are ordinary outcomes (`Option::None` / `ModerationOutcome::NotFound`).

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the content lifecycle.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Input rejected before any record was created.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration or programming error, e.g. no analyzer for a media type.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The store failed; in-memory state was left unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, ModerationError>;
