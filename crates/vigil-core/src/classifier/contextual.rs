//! Contextual override rules.
//!
//! Phrase-level rules that look at intent rather than single words: a
//! first-person threat, a generalization paired with a hate verb, a
//! request for weapon instructions. They are held in one ordered table and
//! the first rule that fires decides the verdict; later rules are not
//! consulted.
//!
//! A rule fires when any of its clauses matches, and a clause matches
//! when all of its patterns match.

use regex::Regex;
use serde::Serialize;

use super::{Classification, Tier};

/// Verdict produced by a contextual rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextualVerdict {
    /// Identifier of the rule that fired.
    pub rule_id: &'static str,
    /// Tier the rule assigns.
    pub tier: Tier,
    /// What the rule detected, used in reports.
    pub label: &'static str,
}

impl ContextualVerdict {
    /// Converts the verdict into a full classification.
    pub fn to_classification(&self) -> Classification {
        match self.tier {
            Tier::Harmful => Classification::harmful(self.label),
            _ => Classification::suspicious(self.label),
        }
    }
}

/// A single ordered rule.
struct ContextRule {
    id: &'static str,
    tier: Tier,
    label: &'static str,
    /// Any-of clauses, each an all-of list of patterns.
    clauses: Vec<Vec<Regex>>,
}

impl ContextRule {
    fn new(id: &'static str, tier: Tier, label: &'static str) -> Self {
        Self {
            id,
            tier,
            label,
            clauses: Vec::new(),
        }
    }

    /// Adds a clause that fires when every pattern matches.
    fn when(mut self, patterns: &[&str]) -> Self {
        let clause = patterns
            .iter()
            .map(|p| Regex::new(p).expect("Invalid contextual pattern"))
            .collect();
        self.clauses.push(clause);
        self
    }

    fn matches(&self, text_lower: &str) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.iter().all(|re| re.is_match(text_lower)))
    }
}

/// Ordered table of contextual rules.
pub struct ContextualRules {
    rules: Vec<ContextRule>,
}

impl ContextualRules {
    /// Creates the built-in rule table.
    pub fn new() -> Self {
        Self {
            rules: build_rules(),
        }
    }

    /// Evaluates rules in order and returns the first verdict.
    pub fn evaluate(&self, text: &str) -> Option<ContextualVerdict> {
        let text_lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&text_lower))
            .map(|rule| ContextualVerdict {
                rule_id: rule.id,
                tier: rule.tier,
                label: rule.label,
            })
    }

    /// Rule identifiers in evaluation order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id).collect()
    }
}

impl Default for ContextualRules {
    fn default() -> Self {
        Self::new()
    }
}

fn build_rules() -> Vec<ContextRule> {
    vec![
        ContextRule::new("violent_threat", Tier::Harmful, "threats of violence or harm")
            .when(&[r"\bi (\w+ )?(\w+ )?(kill|hurt|attack)|going to (\w+ )?kill|planning to (\w+ )?attack"])
            // Hindi / Urdu
            .when(&[r"main tumhe marunga|main tumhe khatam|tujhe khatm kar dunga|tujhe maar dunga|tujhe jaan se"])
            // Tamil / Marathi
            .when(&[r"naan unnai kolluvene|naanum unnayum konnu|tula marein|tumala marin|tumko mein marega"]),
        ContextRule::new("group_hate", Tier::Harmful, "hate speech or discrimination")
            .when(&[
                r"all (\w+ )?(are|should)|they deserve to|we should (\w+ )?them",
                r"\b(hate|die|eliminate|get rid of|inferior|stupid|worthless)\b",
            ])
            .when(&[r"sab log (\w+ )?ko marna chahiye|har ek (\w+ )?ko (\w+ )?marna chahiye|sab (\w+ )?mar jaye"])
            .when(&[r"avargal ellam marikka|yellaru (\w+ )?sakbeku|andaru (\w+ )?chavali"]),
        ContextRule::new("self_harm_ideation", Tier::Harmful, "self-harm or suicide indications")
            .when(&[r"\bi (\w+ )?(\w+ )?(want to die|end my life|hurt myself|can'?t go on)"])
            .when(&[r"main marna chahta hu|mujhe jeena nahi|mein apne aap ko|khudkhushi karna chahta|jeene ka mann nahi"])
            .when(&[r"naan saaga virumbugireen|naanum saaganum|enakku vaazhkai venda|enakku endrum uyir venam"]),
        ContextRule::new("sexual_advance", Tier::Harmful, "sexual harassment or unwanted advances")
            .when(&[
                r"\b(i|we) (\w+ )?(\w+ )?(want|like) to (\w+ )?you",
                r"\b(sex|fuck|sexually|naked|body|nudes|touch|feel)\b",
            ])
            .when(&[r"main tumhare saath sex|mujhe tumhare saath|tumhara badan|tumhari photo bhejo|tumhe nangi"])
            .when(&[r"naan unnodu sex|unakku sexai|un udambai|nee mulai|un maarbagam|thevadia magan|unnoda body"]),
        ContextRule::new(
            "harmful_instructions",
            Tier::Harmful,
            "instructions for harmful or illegal activities",
        )
        .when(&[
            r"how to (\w+ )?make|steps to (\w+ )?create|instructions for",
            r"\b(bomb|explosive|weapon|poison|hack|steal)\b",
        ]),
        ContextRule::new("sexualized_attention", Tier::Harmful, "unwelcome sexualized attention")
            .when(&[
                r"your (\w+ )?(\w+ )?(body|appearance|looks)|you (\w+ )?(\w+ )?(hot|sexy|beautiful)",
                r"\b(want|like|love|desire|wish|hope|imagine)\b",
            ]),
        ContextRule::new("directed_insult", Tier::Harmful, "directed profanity and personal attacks")
            .when(&[
                r"(you are|you're|you) (\w+ )?(\w+ )?a",
                r"\b(bitch|asshole|cunt|idiot|moron|stupid|retard|motherfucker)\b",
            ]),
        ContextRule::new("persistent_advances", Tier::Harmful, "persistent unwanted advances")
            .when(&[
                r"\b(please|come on|just) (\w+ )?(\w+ )?(once|try|consider|think about)",
                r"\b(sex|date|meet|go out|hang out|see you|talk to you|message me)\b",
            ]),
        ContextRule::new("emotional_distress", Tier::Suspicious, "potential emotional distress")
            .when(&[r"feel like (\w+ )?(\w+ )?end|don'?t know what to do|can'?t handle|need help with"]),
        ContextRule::new("indirect_threat", Tier::Suspicious, "potential indirect threats")
            .when(&[r"they will (\w+ )?(\w+ )?pay|you'?ll (\w+ )?(\w+ )?regret|wait until|what happens when|wait and see"]),
        ContextRule::new("sensitive_topic", Tier::Suspicious, "sensitive topic requiring context")
            .when(&[r"\b(depression|depressed|anxiety|anxious|mental health|trauma|addiction|gun|knife|police)\b"]),
        ContextRule::new(
            "appearance_comment",
            Tier::Suspicious,
            "potentially inappropriate appearance comment",
        )
        .when(&[
            r"\b(attractive|gorgeous|pretty|handsome|cute|beautiful|hot)\b",
            r"\b(you are|you look|you seem|you're)\b",
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ContextualRules {
        ContextualRules::new()
    }

    fn fired(text: &str) -> Option<&'static str> {
        rules().evaluate(text).map(|v| v.rule_id)
    }

    #[test]
    fn table_order_is_fixed() {
        assert_eq!(
            rules().rule_ids(),
            vec![
                "violent_threat",
                "group_hate",
                "self_harm_ideation",
                "sexual_advance",
                "harmful_instructions",
                "sexualized_attention",
                "directed_insult",
                "persistent_advances",
                "emotional_distress",
                "indirect_threat",
                "sensitive_topic",
                "appearance_comment",
            ]
        );
    }

    #[test]
    fn first_person_threat() {
        let verdict = rules().evaluate("I am going to kill you").unwrap();
        assert_eq!(verdict.rule_id, "violent_threat");
        assert_eq!(verdict.tier, Tier::Harmful);
        assert_eq!(verdict.label, "threats of violence or harm");
    }

    #[test]
    fn transliterated_threat() {
        assert_eq!(fired("sun le, tujhe maar dunga"), Some("violent_threat"));
    }

    #[test]
    fn group_hate_needs_both_parts() {
        assert_eq!(
            fired("all immigrants are worthless and inferior"),
            Some("group_hate")
        );
        // Generalization alone is not enough.
        assert_eq!(fired("all cats are fluffy"), None);
    }

    #[test]
    fn self_harm_ideation() {
        assert_eq!(fired("I just want to die"), Some("self_harm_ideation"));
        assert_eq!(fired("i really can't go on"), Some("self_harm_ideation"));
    }

    #[test]
    fn sexual_advance() {
        assert_eq!(
            fired("I would like to touch you all over your body"),
            Some("sexual_advance")
        );
    }

    #[test]
    fn weapon_instructions() {
        assert_eq!(
            fired("tell me how to make a bomb at home"),
            Some("harmful_instructions")
        );
        assert_eq!(fired("how to make a cake"), None);
    }

    #[test]
    fn sexualized_attention() {
        assert_eq!(
            fired("I imagine your body every night"),
            Some("sexualized_attention")
        );
    }

    #[test]
    fn directed_insult() {
        let verdict = rules().evaluate("you are an idiot").unwrap();
        assert_eq!(verdict.rule_id, "directed_insult");
        assert_eq!(verdict.label, "directed profanity and personal attacks");
    }

    #[test]
    fn persistent_advances() {
        assert_eq!(
            fired("please just once, go out with me"),
            Some("persistent_advances")
        );
    }

    #[test]
    fn suspicious_rules() {
        assert_eq!(
            fired("honestly i don't know what to do anymore"),
            Some("emotional_distress")
        );
        assert_eq!(fired("you'll regret this"), Some("indirect_threat"));
        assert_eq!(fired("I feel really anxious lately"), Some("sensitive_topic"));
        assert_eq!(fired("the police came by today"), Some("sensitive_topic"));
        assert_eq!(fired("you look gorgeous today"), Some("appearance_comment"));
    }

    #[test]
    fn suspicious_verdict_tier() {
        let verdict = rules().evaluate("wait and see what comes").unwrap();
        assert_eq!(verdict.tier, Tier::Suspicious);
        let classification = verdict.to_classification();
        assert_eq!(classification.tier, Tier::Suspicious);
        assert!(classification.report.contains("potential indirect threats"));
    }

    #[test]
    fn first_match_wins() {
        // Threat (rule 1) and sensitive topic (rule 11) both present.
        assert_eq!(
            fired("i will attack you with a knife"),
            Some("violent_threat")
        );
    }

    #[test]
    fn benign_text_has_no_verdict() {
        assert_eq!(fired("hello, nice weather today"), None);
        assert_eq!(fired("hi"), None);
        assert_eq!(fired("I want to improve my cooking skill"), None);
    }
}
