//! Vigil application library.
//!
//! Pieces of the `vigil` binary that are worth testing on their own:
//! - Filename heuristic media analyzer
//! - File upload loading and content type inference

pub mod analyzer;
pub mod upload;

pub use analyzer::FilenameHeuristicAnalyzer;
pub use upload::{infer_content_type, load_upload};
