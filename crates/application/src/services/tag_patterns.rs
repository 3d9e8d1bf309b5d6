//! Keyword pattern registry
//!
//! Compiled once on first use and shared read-only afterwards. All patterns
//! are case-insensitive and anchored on word boundaries.

use std::sync::LazyLock;

use domain::TagName;
use regex::Regex;

/// Medical / allergy urgency patterns, in priority order
const URGENCY_PATTERN_SOURCES: [&str; 12] = [
    r"\b(anaphyla\w*)\b",
    r"\bepipen\b",
    r"\b(life[- ]?threatening)\b",
    r"\b(severe\s+allerg\w*)\b",
    r"\b(fatal\s+allerg\w*)\b",
    r"\b(allergic\s+shock)\b",
    r"\b(cannot\s+breathe)\b",
    r"\b(throat\s+swell\w*)\b",
    r"\b(emergency\s+allerg\w*)\b",
    r"\b(deadly\s+allerg\w*)\b",
    r"\b(medical\s+alert)\b",
    r"\b(celiac\s+disease)\b",
];

/// Keyword rules of the deterministic tagger
const FALLBACK_RULE_SOURCES: [(TagName, &str); 8] = [
    (TagName::Vip, r"\bvip\b"),
    (TagName::Celeb, r"\bceleb(rity)?\b"),
    (TagName::FrequentVisitors, r"\bfrequent\b"),
    (TagName::Birthday, r"\bbirthday\b"),
    (TagName::Anniversary, r"\banniversary\b"),
    (TagName::NoShows, r"\bno[- ]?show\b"),
    (
        TagName::DietaryRestrictions,
        r"\b(vegan|vegetarian|halal|kosher|gluten[- ]?free|nut[- ]?free|pescatarian|dairy[- ]?free)\b",
    ),
    (
        TagName::Allergies,
        r"\b(allerg\w+|nut[- ]?free|lactose|celiac|intoleran\w+)\b",
    ),
];

#[allow(clippy::expect_used)] // Infallible with valid static patterns
fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("static pattern must compile")
}

pub(crate) static URGENCY_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| URGENCY_PATTERN_SOURCES.iter().map(|p| compile(p)).collect());

pub(crate) static FALLBACK_RULES: LazyLock<Vec<(TagName, Regex)>> = LazyLock::new(|| {
    FALLBACK_RULE_SOURCES
        .iter()
        .map(|(tag, p)| (*tag, compile(p)))
        .collect()
});
