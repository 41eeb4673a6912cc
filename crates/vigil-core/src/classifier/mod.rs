//! Content classification for moderation.
//!
//! Text is classified in two passes: the contextual rules run first and,
//! when one fires, decide the tier outright. Otherwise the lexicon
//! classifier's keyword groups decide.

mod contextual;
mod lexicon;
mod text;
mod tier;

pub use contextual::{ContextualRules, ContextualVerdict};
pub use lexicon::{LexiconCategory, LexiconClassifier, LexiconMatch, DEFAULT_MIN_LENGTH};
pub use text::TextClassifier;
pub use tier::{
    harmful_report, suspicious_report, Classification, Tier, HARMFUL_CONFIDENCE,
    SAFE_CONFIDENCE, SHORT_CONTENT_CONFIDENCE, SHORT_CONTENT_REPORT, SUSPICIOUS_CONFIDENCE,
};
