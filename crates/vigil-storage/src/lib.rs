//! Vigil Storage - SQLite persistence layer.
//!
//! Implements [`vigil_core::ContentStore`] on SQLite:
//!
//! - Content records, one row per id, rewritten whole on every change
//! - The append-only moderation log
//!
//! A moderation writes the updated record and its log entry in a single
//! transaction, so a crash never leaves one without the other.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vigil_core::{AnalyzerRegistry, ContentLifecycle, ModerationConfig};
//! use vigil_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//! let lifecycle =
//!     ContentLifecycle::open(Arc::new(db), AnalyzerRegistry::new(), ModerationConfig::default())
//!         .unwrap();
//! assert_eq!(lifecycle.stats().total, 0);
//! ```

mod database;
pub mod error;
mod pool;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use pool::ConnectionPool;
pub use repository::{ActionsRepo, ContentsRepo};
