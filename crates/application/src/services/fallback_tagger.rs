//! Deterministic fallback tagger
//!
//! Rule-based classifier used when the language-model classifier is absent
//! or has no answer. It always terminates and always produces a valid
//! analysis.

use async_trait::async_trait;
use domain::{SentimentLevel, TagAnalysis, combine_guest_text};
use tracing::debug;

use super::tag_patterns::FALLBACK_RULES;
use super::urgency_detector::detect_urgency;
use crate::ports::TagClassifier;

/// Confidence reported by the rule-based tagger
pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.55;

/// Summary attached to every fallback analysis
pub const FALLBACK_SUMMARY: &str = "Generated by deterministic fallback (classifier unavailable).";

/// Keyword-rule tagger with a fixed confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackTagger {
    confidence: f64,
}

impl Default for FallbackTagger {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_FALLBACK_CONFIDENCE,
        }
    }
}

impl FallbackTagger {
    /// Create a tagger reporting [`DEFAULT_FALLBACK_CONFIDENCE`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the reported confidence
    ///
    /// Values are clamped into [0.0, 1.0]; a non-finite value keeps the default.
    #[must_use]
    pub fn with_confidence(confidence: f64) -> Self {
        if confidence.is_finite() {
            Self {
                confidence: confidence.clamp(0.0, 1.0),
            }
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Tag the combined guest text
    #[must_use]
    pub fn tag(&self, special_request: &str, dietary_preferences: &str) -> TagAnalysis {
        let combined = combine_guest_text(special_request, dietary_preferences);

        let tags = FALLBACK_RULES
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&combined))
            .map(|(tag, _)| *tag);

        let urgent_reason = detect_urgency(&combined);
        let sentiment = SentimentLevel::Neutral.escalate(urgent_reason.is_some());

        let analysis = TagAnalysis::builder()
            .tags(tags)
            .sentiment(sentiment)
            .confidence(self.confidence)
            .summary(FALLBACK_SUMMARY)
            .urgent_reason(urgent_reason)
            .build_normalized();

        debug!(
            tags = %analysis.tag_labels(),
            sentiment = %analysis.sentiment(),
            "Fallback tagger produced analysis"
        );
        analysis
    }
}

#[async_trait]
impl TagClassifier for FallbackTagger {
    async fn classify(
        &self,
        special_request: &str,
        dietary_preferences: &str,
    ) -> Option<TagAnalysis> {
        Some(self.tag(special_request, dietary_preferences))
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use domain::TagName;

    use super::*;

    #[test]
    fn empty_input_yields_empty_neutral_analysis() {
        let analysis = FallbackTagger::new().tag("", "");
        assert!(analysis.tags().is_empty());
        assert_eq!(analysis.sentiment(), SentimentLevel::Neutral);
        assert!((analysis.confidence() - DEFAULT_FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(analysis.summary(), FALLBACK_SUMMARY);
        assert!(analysis.urgent_reason().is_none());
    }

    #[test]
    fn anniversary_vip_scenario() {
        let analysis = FallbackTagger::new()
            .tag("This is our 25th wedding anniversary. VIP members.", "");
        assert!(analysis.has_tag(TagName::Anniversary));
        assert!(analysis.has_tag(TagName::Vip));
        assert_eq!(analysis.sentiment(), SentimentLevel::Neutral);
    }

    #[test]
    fn severe_allergy_scenario_is_urgent() {
        let analysis = FallbackTagger::new().tag(
            "My daughter has a severe nut allergy and carries an epipen. Life-threatening.",
            "Nut-free",
        );
        assert_eq!(analysis.sentiment(), SentimentLevel::Urgent);
        assert!(analysis.has_tag(TagName::Allergies));
        assert!(analysis.has_tag(TagName::DietaryRestrictions));
        assert_eq!(
            analysis.urgent_reason(),
            Some("Detected urgent keyword: 'epipen'")
        );
    }

    #[test]
    fn urgency_force_adds_allergies() {
        let analysis = FallbackTagger::new().tag("guest has celiac disease", "");
        assert_eq!(analysis.sentiment(), SentimentLevel::Urgent);
        assert!(analysis.has_tag(TagName::Allergies));
    }

    #[test]
    fn lactose_intolerance_is_not_urgent() {
        let analysis = FallbackTagger::new().tag("", "lactose intolerant");
        assert_eq!(analysis.sentiment(), SentimentLevel::Neutral);
        assert!(analysis.has_tag(TagName::Allergies));
    }

    #[test]
    fn dietary_keywords_tag_restrictions() {
        let analysis = FallbackTagger::new().tag("", "Vegan, gluten-free");
        assert!(analysis.has_tag(TagName::DietaryRestrictions));
        assert_eq!(analysis.tags().len(), 1);
    }

    #[test]
    fn repeated_keywords_tag_once() {
        let analysis = FallbackTagger::new().tag("birthday birthday BIRTHDAY", "birthday");
        assert_eq!(analysis.tags().len(), 1);
    }

    #[test]
    fn fields_are_joined_with_a_space() {
        // "no" at the end of one field and "show" at the start of the next
        let analysis = FallbackTagger::new().tag("no", "show");
        assert!(analysis.has_tag(TagName::NoShows));
    }

    #[test]
    fn configured_confidence_is_clamped() {
        assert!((FallbackTagger::with_confidence(1.4).confidence() - 1.0).abs() < f64::EPSILON);
        assert!(
            (FallbackTagger::with_confidence(f64::NAN).confidence() - DEFAULT_FALLBACK_CONFIDENCE)
                .abs()
                < f64::EPSILON
        );
        let analysis = FallbackTagger::with_confidence(0.3).tag("vip", "");
        assert!((analysis.confidence() - 0.3).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn classifier_impl_always_answers() {
        let tagger = FallbackTagger::new();
        let analysis = tagger.classify("celebrity guest", "").await;
        assert!(analysis.is_some_and(|a| a.has_tag(TagName::Celeb)));
        assert_eq!(tagger.name(), "fallback");
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn always_produces_valid_analysis(special in "\\PC{0,200}", dietary in "\\PC{0,100}") {
                let analysis = FallbackTagger::new().tag(&special, &dietary);
                prop_assert!((0.0..=1.0).contains(&analysis.confidence()));
                prop_assert_eq!(analysis.summary(), FALLBACK_SUMMARY);
                if analysis.sentiment() == SentimentLevel::Urgent {
                    prop_assert!(analysis.has_tag(TagName::Allergies));
                    prop_assert!(analysis.urgent_reason().is_some());
                }
            }

            #[test]
            fn tagging_is_deterministic(special in "[a-zA-Z ,.-]{0,120}", dietary in "[a-zA-Z ,-]{0,60}") {
                let tagger = FallbackTagger::new();
                let first = tagger.tag(&special, &dietary);
                let second = tagger.tag(&special, &dietary);
                prop_assert_eq!(first.tags(), second.tags());
                prop_assert_eq!(first.sentiment(), second.sentiment());
                prop_assert_eq!(first.urgent_reason(), second.urgent_reason());
            }

            #[test]
            fn repeating_text_adds_no_tags(words in prop::collection::vec(
                prop::sample::select(vec!["vip", "birthday", "vegan", "allergy", "celebrity", "no-show"]),
                0..12,
            )) {
                let text = words.join(" ");
                let once = FallbackTagger::new().tag(&text, "");
                let twice = FallbackTagger::new().tag(&format!("{text} {text}"), &text);
                prop_assert_eq!(once.tags(), twice.tags());
            }
        }
    }
}
