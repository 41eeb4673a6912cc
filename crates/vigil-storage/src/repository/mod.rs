//! Database repositories for each table.

pub mod actions;
pub mod contents;

pub use actions::ActionsRepo;
pub use contents::ContentsRepo;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Result, StorageError};

/// Formats a timestamp for storage.
///
/// Always nine fractional digits and a `Z` suffix, so stored strings sort
/// chronologically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parses a stored timestamp.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .map_err(|_| StorageError::Corrupt(format!("invalid timestamp {:?}", s)))
}
