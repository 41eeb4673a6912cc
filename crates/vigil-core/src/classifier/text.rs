//! Text classification pipeline.
//!
//! Contextual rules are consulted first; a verdict from them overrides the
//! lexicon outright. Only when no contextual rule fires does the lexicon
//! (and its short-content rule) decide.

use std::time::Instant;

use tracing::debug;

use super::{Classification, ContextualRules, LexiconClassifier};

/// Combined contextual + lexicon classifier for text content.
pub struct TextClassifier {
    contextual: ContextualRules,
    lexicon: LexiconClassifier,
}

impl TextClassifier {
    /// Creates a classifier with the built-in rules.
    pub fn new() -> Self {
        Self::with_lexicon(LexiconClassifier::new())
    }

    /// Creates a classifier with a custom lexicon classifier.
    pub fn with_lexicon(lexicon: LexiconClassifier) -> Self {
        Self {
            contextual: ContextualRules::new(),
            lexicon,
        }
    }

    /// Classifies text. Pure and deterministic; never fails.
    pub fn classify(&self, text: &str) -> Classification {
        let start = Instant::now();

        let classification = match self.contextual.evaluate(text) {
            Some(verdict) => {
                debug!(rule = verdict.rule_id, tier = ?verdict.tier, "Contextual rule fired");
                verdict.to_classification()
            }
            None => self.lexicon.classify(text),
        };

        debug!(
            tier = ?classification.tier,
            confidence = classification.confidence,
            duration_us = start.elapsed().as_micros() as u64,
            "Text classified"
        );

        classification
    }
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Tier, SHORT_CONTENT_REPORT, SUSPICIOUS_CONFIDENCE};

    fn classifier() -> TextClassifier {
        TextClassifier::new()
    }

    #[test]
    fn threat_detected_by_context() {
        let result = classifier().classify("I am going to kill you");
        assert_eq!(result.tier, Tier::Harmful);
        assert_eq!(result.confidence, 0.85);
        assert!(result.report.contains("threats of violence"));
    }

    #[test]
    fn directed_insult_is_harmful() {
        let result = classifier().classify("you are an idiot");
        assert_eq!(result.tier, Tier::Harmful);
    }

    #[test]
    fn lexicon_decides_without_context() {
        let result = classifier().classify("that movie was total crap");
        assert_eq!(result.tier, Tier::Harmful);
        assert!(result.report.contains("profanity"));
    }

    #[test]
    fn contextual_verdict_overrides_lexicon() {
        // "police" fires the sensitive-topic rule, which overrides the
        // profanity hit the lexicon would report.
        let result = classifier().classify("the police showed up, damn");
        assert_eq!(result.tier, Tier::Suspicious);
        assert_eq!(result.confidence, SUSPICIOUS_CONFIDENCE);
        assert!(result.report.contains("sensitive topic"));
    }

    #[test]
    fn anxious_text_is_suspicious() {
        let result = classifier().classify("I feel really anxious lately");
        assert_eq!(result.tier, Tier::Suspicious);
        assert!(result.report.contains("sensitive topic requiring context"));
    }

    #[test]
    fn greeting_is_safe() {
        let result = classifier().classify("hello, nice weather today");
        assert_eq!(result.tier, Tier::Safe);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn short_text_needs_review() {
        let result = classifier().classify("hi");
        assert_eq!(result.tier, Tier::Suspicious);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.report, SHORT_CONTENT_REPORT);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        let text = "please just once, let's meet up";
        assert_eq!(c.classify(text), c.classify(text));
    }

    #[test]
    fn total_over_odd_input() {
        let c = classifier();
        let long = "a".repeat(10_000);
        for text in ["", "   ", "\u{0}\u{1}", "🙂🙂🙂🙂🙂🙂", long.as_str()] {
            let _ = c.classify(text);
        }
    }
}
