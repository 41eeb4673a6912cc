//! Keyword lexicon classifier.
//!
//! Two ordered groups of topical word lists: every harmful category is
//! checked before any suspicious one, and the first category whose pattern
//! matches decides the verdict. Matching is case-insensitive and respects
//! word boundaries, so "skill" never matches "kill".

use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Classification, Tier};

/// Minimum character count below which unmatched text is not trusted.
pub const DEFAULT_MIN_LENGTH: usize = 5;

/// Topical word lists known to the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexiconCategory {
    // Harmful
    Violence,
    Hate,
    SelfHarm,
    Sexual,
    Illegal,
    Harassment,
    Profanity,
    Insults,
    SexualViolence,
    SexualSolicitation,
    ExplicitAdvances,
    BodyComments,
    ExplicitQuestions,
    Slurs,
    ChildExploitation,
    SouthAsianProfanity,
    EuropeanProfanity,
    EastAsianProfanity,
    // Suspicious
    Unease,
    Anger,
    Anxiety,
    Pain,
    Substances,
    Conflict,
    MildLanguage,
    RomanticInterest,
    Affection,
    Solicitation,
    Innuendo,
}

impl LexiconCategory {
    /// Harmful categories in evaluation order.
    pub fn harmful() -> &'static [LexiconCategory] {
        use LexiconCategory::*;
        &[
            Violence,
            Hate,
            SelfHarm,
            Sexual,
            Illegal,
            Harassment,
            Profanity,
            Insults,
            SexualViolence,
            SexualSolicitation,
            ExplicitAdvances,
            BodyComments,
            ExplicitQuestions,
            Slurs,
            ChildExploitation,
            SouthAsianProfanity,
            EuropeanProfanity,
            EastAsianProfanity,
        ]
    }

    /// Suspicious categories in evaluation order.
    pub fn suspicious() -> &'static [LexiconCategory] {
        use LexiconCategory::*;
        &[
            Unease,
            Anger,
            Anxiety,
            Pain,
            Substances,
            Conflict,
            MildLanguage,
            RomanticInterest,
            Affection,
            Solicitation,
            Innuendo,
        ]
    }

    /// The tier a hit in this category produces.
    pub fn tier(&self) -> Tier {
        if Self::harmful().contains(self) {
            Tier::Harmful
        } else {
            Tier::Suspicious
        }
    }

    /// Phrase used in reports.
    pub fn label(&self) -> &'static str {
        use LexiconCategory::*;
        match self {
            Violence => "violence",
            Hate => "hate speech",
            SelfHarm => "self-harm",
            Sexual => "sexual content",
            Illegal => "illegal activities",
            Harassment => "harassment",
            Profanity => "profanity",
            Insults => "insults",
            SexualViolence => "sexual violence",
            SexualSolicitation => "sexual solicitation",
            ExplicitAdvances => "explicit sexual advances",
            BodyComments => "sexualized comments about the body",
            ExplicitQuestions => "sexually explicit questions",
            Slurs => "slurs",
            ChildExploitation => "child exploitation",
            SouthAsianProfanity => "profanity in South Asian languages",
            EuropeanProfanity => "profanity in European languages",
            EastAsianProfanity => "profanity in East Asian languages",
            Unease => "unease or suspicion",
            Anger => "anger",
            Anxiety => "fear or anxiety",
            Pain => "pain or suffering",
            Substances => "alcohol or drugs",
            Conflict => "conflict",
            MildLanguage => "mild language",
            RomanticInterest => "romantic interest",
            Affection => "flirtatious affection",
            Solicitation => "requests for private contact",
            Innuendo => "sexual innuendo",
        }
    }

    fn pattern(&self) -> &'static str {
        use LexiconCategory::*;
        match self {
            Violence => r"\b(kill|murder|hurt|harm|attack|beat|assault|threaten|shoot|stab|punch|violate|torture)\b",
            Hate => r"\b(hate|racist|sexist|homophobic|transphobic|nazi|terrorism|bigot|disgusting)\b",
            SelfHarm => r"\b(suicide|self-harm|cutting|overdose|self-injury|end my life)\b",
            Sexual => r"\b(porn|explicit|nude|naked|obscene|lewd|masturbate)\b",
            Illegal => r"\b(steal|robbery|hack|fraud|illegal|weapon|bomb|drugs|cocaine|heroin)\b",
            Harassment => r"\b(harass|bully|stalk|dox|expose|humiliate)\b",
            Profanity => r"\b(fuck|shit|ass|bitch|cunt|dick|cock|pussy|whore|bastard|asshole|motherfucker|damn|bullshit|crap)\b",
            Insults => r"\b(jerk|idiot|stupid|dumb|moron|retard|imbecile|fool|loser|slut|wanker|twat|piss|tits|boobs)\b",
            SexualViolence => r"\b(rape|molest|grope|fondle|sexual assault|inappropriately touch)\b",
            SexualSolicitation => r"\b(send nudes|sexy pics|sex chat|sext|cyber sex|get naked|show me your|strip for me)\b",
            ExplicitAdvances => r"\b(want to fuck|want to bang|sleep with me|sleep together|hook up|get laid|blow job|go down on)\b",
            BodyComments => r"\b(nice body|sexy body|hot body|beautiful body|nice ass|nice tits|nice boobs|sexy legs)\b",
            ExplicitQuestions => r"\b(what are you wearing|take off your|remove your clothes|are you naked|are you horny|turn me on)\b",
            Slurs => r"\b(nigger|nigga|kike|chink|spic|wetback|raghead|towelhead|fag|faggot|dyke|tranny)\b",
            ChildExploitation => r"\b(child porn|kiddie porn|underage sex|minor sex|pedo|pedophile|young girl|young boy|trafficking)\b",
            SouthAsianProfanity => concat!(
                r"\b(bhenchod|behenchod|bahenchod|madarchod|madar|behen ke laude|bsdk|chutiya|lund|lauda|randi|gandu|chut|jhatu",
                r"|panchod|pencho|khotey|kuttey|khota|harami|kanjara|tatti",
                r"|bokachoda|khanki|shala|kutta|sutki|magi|chudi|voda",
                r"|otha|baadu|pundai|sunni|thevdiya|myir|naaye|loosu|koodhi|ommala|thayoli",
                r"|dengey|gudda|modda|lanja|pookulu|pooku|sulli|gadida|erripook|dengu",
                r"|zhavadya|bhikaar|chinal|zavadya|bhosadya|aayi(chi)?(zavli|gand)",
                r"|myru|pundachi|thendi|maire|poorr|thevidiya|achante|kunna",
                r"|keydimaga|sule|gandu|nayi|mayamaga|byavarsi",
                r"|chodu|gaand|bhosdina|maa-bhen|lulli|bosadi",
                r"|kanjari|kameena|chussa|gaandu|kamina|phudi|choot|chuss|kutti",
                r"|fodri|fodem|rando|chikli|chood|fodi|zadap|bhikari|ghand|yedu|futti|zatalo",
                r"|gahori|lora|kuttar|guu|xuwali",
                r"|maghia|chodri|mogiare|dhipa|panji|bedhya|ghusi|thuku|chuda)\b",
            ),
            EuropeanProfanity => r"\b(puta|cojones|coño|follar|joder|mierda|putain|merde|salope|connard|fick|scheiße|fotze|cazzo|stronzo|puttana|cyka|blyat|khuy|pizda|yebat)\b",
            EastAsianProfanity => r"(他妈的|肏|屁眼|傻逼|妓女|屄|くそ|ファック|淫売|씨발|좆|개자식|지랄|걸레)",
            Unease => r"\b(suspicious|weird|strange|odd|creepy|sketchy|concerning)\b",
            Anger => r"\b(angry|upset|annoyed|frustrated|mad|pissed)\b",
            Anxiety => r"\b(scared|afraid|worried|anxious|nervous|concerned)\b",
            Pain => r"\b(pain|hurt|suffering|misery|agony|anguish)\b",
            Substances => r"\b(drug|drink|alcohol|weed|marijuana|high|drunk)\b",
            Conflict => r"\b(fight|argument|conflict|dispute|disagree|debate)\b",
            MildLanguage => r"\b(hell|darn|sucks|freaking|heck|gosh|shut up|screw|frickin)\b",
            RomanticInterest => r"\b(date me|go out with me|attracted to you|find you attractive|cute|hot|sexy|dating|relationship)\b",
            Affection => r"\b(flirt|love you|miss you|thinking about you|dreaming of you|fantasize|crush on you)\b",
            Solicitation => r"\b(can i have your|give me your number|meet up|meet in person|alone together|private chat|dm me)\b",
            Innuendo => r"\b(that's what she said|in bed|between the sheets|getting it on|doing it|netflix and chill)\b",
        }
    }
}

/// A lexicon hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconMatch {
    /// Category whose word list matched.
    pub category: LexiconCategory,
    /// The matched text (lowercased).
    pub term: String,
}

/// Compiled word lists for one tier.
struct PatternGroup {
    /// Regex set for fast multi-pattern matching.
    regex_set: RegexSet,
    /// Individual regexes, index-aligned with `categories`, for extracting the term.
    regexes: Vec<Regex>,
    categories: Vec<LexiconCategory>,
}

impl PatternGroup {
    fn build(categories: &[LexiconCategory]) -> Self {
        let patterns: Vec<&str> = categories.iter().map(|c| c.pattern()).collect();
        let regex_set = RegexSet::new(&patterns).expect("Invalid lexicon patterns");
        let regexes = patterns
            .iter()
            .map(|p| Regex::new(p).expect("Invalid lexicon pattern"))
            .collect();

        Self {
            regex_set,
            regexes,
            categories: categories.to_vec(),
        }
    }

    /// Returns the first category (in declaration order) that matches.
    fn first_match(&self, text_lower: &str) -> Option<LexiconMatch> {
        let index = self.regex_set.matches(text_lower).into_iter().next()?;
        let term = self.regexes[index]
            .find(text_lower)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Some(LexiconMatch {
            category: self.categories[index],
            term,
        })
    }
}

/// Regex-based keyword classifier.
pub struct LexiconClassifier {
    harmful: PatternGroup,
    suspicious: PatternGroup,
    min_length: usize,
}

impl LexiconClassifier {
    /// Creates a classifier with the built-in word lists.
    pub fn new() -> Self {
        Self::with_min_length(DEFAULT_MIN_LENGTH)
    }

    /// Creates a classifier with a custom short-content threshold.
    pub fn with_min_length(min_length: usize) -> Self {
        Self {
            harmful: PatternGroup::build(LexiconCategory::harmful()),
            suspicious: PatternGroup::build(LexiconCategory::suspicious()),
            min_length,
        }
    }

    /// Returns the first lexicon hit, harmful lists first.
    pub fn find_match(&self, text: &str) -> Option<LexiconMatch> {
        let text_lower = text.to_lowercase();
        self.harmful
            .first_match(&text_lower)
            .or_else(|| self.suspicious.first_match(&text_lower))
    }

    /// Classifies text using only the word lists and the length rule.
    pub fn classify(&self, text: &str) -> Classification {
        let Some(hit) = self.find_match(text) else {
            return if text.chars().count() < self.min_length {
                Classification::short_content()
            } else {
                Classification::safe()
            };
        };

        debug!(category = ?hit.category, term = %hit.term, "Lexicon match");
        match hit.category.tier() {
            Tier::Harmful => Classification::harmful(hit.category.label()),
            _ => Classification::suspicious(hit.category.label()),
        }
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}
