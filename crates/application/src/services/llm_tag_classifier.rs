//! Language-model tag classifier
//!
//! Sends the guest text to an [`InferencePort`] under a fixed JSON contract,
//! sanitizes the answer against the tag and sentiment vocabularies and
//! reconciles it with the urgency detector. Every failure is soft: the
//! classifier logs it and answers `None`.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use domain::{
    MAX_URGENT_REASON_CHARS, SentimentLevel, TagAnalysis, TagName, combine_guest_text,
    truncate_chars,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::urgency_detector::detect_urgency;
use crate::{
    error::ApplicationError,
    ports::{InferencePort, TagClassifier},
};

/// Confidence assumed when the model omits it or sends garbage
pub const DEFAULT_CLASSIFIER_CONFIDENCE: f64 = 0.5;

/// Instruction contract sent as the system prompt
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You are a restaurant CRM tagging assistant.  Analyze the guest's special
request text and dietary preferences, then return a JSON object with EXACTLY
these fields:

{
  "tags": [],
  "sentiment": "",
  "confidence": 0.0,
  "summary": "",
  "urgent_reason": null
}

RULES:
1. "tags" must ONLY contain values from this list:
   ["VIP", "Celeb", "frequent visitors", "Birthday", "Anniversary",
    "No shows", "Dietary restrictions", "allergies"]
2. "sentiment" must be one of: "Positive", "Neutral", "Negative", "Urgent".
3. If the text mentions ANY medical condition, life-threatening allergy,
   anaphylaxis, epipen, severe allergy, or similar, you MUST set
   sentiment to "Urgent" and explain in "urgent_reason".
4. "confidence" is your confidence in the tag assignment (0.0 to 1.0).
5. "summary" is a one-sentence description of what you found.
6. Return ONLY valid JSON.  No markdown, no explanation outside the JSON.
"#;

/// Why a classifier answer was discarded
#[derive(Debug, Error)]
enum ClassifierFailure {
    #[error(transparent)]
    Inference(#[from] ApplicationError),

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `tags` is not an array")]
    TagsNotArray,
}

/// Tag classifier backed by an external language model
pub struct LlmTagClassifier {
    inference: Arc<dyn InferencePort>,
    timeout: Option<Duration>,
}

impl fmt::Debug for LlmTagClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmTagClassifier")
            .field("model", &self.inference.current_model())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LlmTagClassifier {
    /// Create a classifier without an overall deadline
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self {
            inference,
            timeout: None,
        }
    }

    /// Give up (and answer `None`) when the model takes longer than `timeout`
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Render the user prompt, with `(none)` standing in for empty fields
    #[must_use]
    pub fn build_user_prompt(special_request: &str, dietary_preferences: &str) -> String {
        let or_none = |s: &str| if s.is_empty() { "(none)".to_string() } else { s.to_string() };
        format!(
            "Special Request: {}\nDietary Preferences: {}",
            or_none(special_request),
            or_none(dietary_preferences)
        )
    }

    async fn try_classify(
        &self,
        special_request: &str,
        dietary_preferences: &str,
    ) -> Result<TagAnalysis, ClassifierFailure> {
        let prompt = Self::build_user_prompt(special_request, dietary_preferences);
        let call = self
            .inference
            .generate_with_system(CLASSIFIER_SYSTEM_PROMPT, &prompt);

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ClassifierFailure::Timeout(limit))??,
            None => call.await?,
        };

        debug!(
            model = %result.model,
            tokens = ?result.tokens_used,
            latency_ms = result.latency_ms,
            "Classifier responded"
        );

        let combined = combine_guest_text(special_request, dietary_preferences);
        reconcile(&result.content, &combined)
    }
}

#[async_trait]
impl TagClassifier for LlmTagClassifier {
    #[instrument(
        skip(self, special_request, dietary_preferences),
        fields(model = %self.inference.current_model())
    )]
    async fn classify(
        &self,
        special_request: &str,
        dietary_preferences: &str,
    ) -> Option<TagAnalysis> {
        match self.try_classify(special_request, dietary_preferences).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!(error = %e, "Classifier unavailable, answer discarded");
                None
            },
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_confidence(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CLASSIFIER_CONFIDENCE)
        .clamp(0.0, 1.0)
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Turn a raw model answer into a validated analysis
///
/// Unknown tags are dropped, an unknown sentiment becomes neutral and the
/// urgency detector's verdict on `combined_text` is a floor for the result.
fn reconcile(raw: &str, combined_text: &str) -> Result<TagAnalysis, ClassifierFailure> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let object = value.as_object().ok_or(ClassifierFailure::NotAnObject)?;

    let raw_tags = object
        .get("tags")
        .ok_or(ClassifierFailure::MissingField("tags"))?
        .as_array()
        .ok_or(ClassifierFailure::TagsNotArray)?;
    let tags: Vec<TagName> = raw_tags
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|label| {
            let tag = TagName::from_label(label);
            if tag.is_none() {
                debug!(label, "Dropping tag outside the vocabulary");
            }
            tag
        })
        .collect();

    let sentiment = object
        .get("sentiment")
        .ok_or(ClassifierFailure::MissingField("sentiment"))?
        .as_str()
        .and_then(SentimentLevel::from_label)
        .unwrap_or_default();

    let confidence = parse_confidence(object.get("confidence"));
    let summary = text_field(object, "summary").unwrap_or_default();
    let model_reason = text_field(object, "urgent_reason").filter(|r| !r.trim().is_empty());

    let detected = detect_urgency(combined_text);
    let sentiment = sentiment.escalate(detected.is_some());
    if detected.is_some() {
        debug!("Urgency detector fired, analysis forced to Urgent");
    }

    let urgent_reason = model_reason
        .or(detected)
        .map(|r| truncate_chars(&r, MAX_URGENT_REASON_CHARS));

    Ok(TagAnalysis::builder()
        .tags(tags)
        .sentiment(sentiment)
        .confidence(confidence)
        .summary(summary)
        .urgent_reason(urgent_reason)
        .build_normalized())
}
