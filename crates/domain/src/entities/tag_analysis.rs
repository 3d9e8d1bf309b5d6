//! Tag analysis value object
//!
//! The canonical result of analyzing one reservation's guest notes. It is
//! only constructible through validation, and a deserialized payload goes
//! through the same checks as a freshly built one.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{SentimentLevel, TagName};

/// Maximum summary length in characters
pub const MAX_SUMMARY_CHARS: usize = 500;

/// Maximum urgent reason length in characters
pub const MAX_URGENT_REASON_CHARS: usize = 300;

/// Reason used for an urgent analysis that arrived without one
pub const DEFAULT_URGENT_REASON: &str = "Severe allergy / medical concern detected";

/// Truncate `text` to at most `max_chars` characters
///
/// Counts Unicode scalar values, so multi-byte text is never split inside a
/// character.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Validated tags, sentiment and confidence for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TagAnalysisRecord")]
pub struct TagAnalysis {
    tags: BTreeSet<TagName>,
    sentiment: SentimentLevel,
    confidence: f64,
    summary: String,
    analyzed_at: DateTime<Utc>,
    urgent_reason: Option<String>,
}

/// Unvalidated wire shape of a stored analysis
#[derive(Debug, Deserialize)]
struct TagAnalysisRecord {
    #[serde(default)]
    tags: Vec<TagName>,
    #[serde(default)]
    sentiment: SentimentLevel,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    summary: String,
    #[serde(default = "Utc::now")]
    analyzed_at: DateTime<Utc>,
    #[serde(default)]
    urgent_reason: Option<String>,
}

impl TryFrom<TagAnalysisRecord> for TagAnalysis {
    type Error = DomainError;

    fn try_from(record: TagAnalysisRecord) -> Result<Self, Self::Error> {
        TagAnalysis::builder()
            .tags(record.tags)
            .sentiment(record.sentiment)
            .confidence(record.confidence)
            .summary(record.summary)
            .urgent_reason(record.urgent_reason)
            .analyzed_at(record.analyzed_at)
            .build()
    }
}

impl TagAnalysis {
    /// Create a validated analysis stamped with the current time
    pub fn new(
        tags: impl IntoIterator<Item = TagName>,
        sentiment: SentimentLevel,
        confidence: f64,
        summary: impl Into<String>,
        urgent_reason: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::builder()
            .tags(tags)
            .sentiment(sentiment)
            .confidence(confidence)
            .summary(summary)
            .urgent_reason(urgent_reason)
            .build()
    }

    /// Start building an analysis
    #[must_use]
    pub fn builder() -> TagAnalysisBuilder {
        TagAnalysisBuilder::default()
    }

    /// Tags in vocabulary order
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<TagName> {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: TagName) -> bool {
        self.tags.contains(&tag)
    }

    #[must_use]
    pub const fn sentiment(&self) -> SentimentLevel {
        self.sentiment
    }

    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.sentiment.is_urgent()
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Present only for urgent analyses
    #[must_use]
    pub fn urgent_reason(&self) -> Option<&str> {
        self.urgent_reason.as_deref()
    }

    #[must_use]
    pub const fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }

    /// Tag labels joined with `", "`
    #[must_use]
    pub fn tag_labels(&self) -> String {
        self.tags
            .iter()
            .map(TagName::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Builder for [`TagAnalysis`]
#[derive(Debug, Clone, Default)]
pub struct TagAnalysisBuilder {
    tags: BTreeSet<TagName>,
    sentiment: SentimentLevel,
    confidence: f64,
    summary: String,
    urgent_reason: Option<String>,
    analyzed_at: Option<DateTime<Utc>>,
}

impl TagAnalysisBuilder {
    #[must_use]
    pub fn tag(mut self, tag: TagName) -> Self {
        self.tags.insert(tag);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: impl IntoIterator<Item = TagName>) -> Self {
        self.tags.extend(tags);
        self
    }

    #[must_use]
    pub const fn sentiment(mut self, sentiment: SentimentLevel) -> Self {
        self.sentiment = sentiment;
        self
    }

    #[must_use]
    pub const fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub fn urgent_reason(mut self, reason: Option<String>) -> Self {
        self.urgent_reason = reason;
        self
    }

    #[must_use]
    pub const fn analyzed_at(mut self, at: DateTime<Utc>) -> Self {
        self.analyzed_at = Some(at);
        self
    }

    /// Validate and build
    ///
    /// An urgent analysis always carries the allergies tag and a non-empty
    /// reason. A reason on a non-urgent analysis is discarded.
    pub fn build(self) -> Result<TagAnalysis, DomainError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(DomainError::validation(format!(
                "confidence must be within [0.0, 1.0], got {}",
                self.confidence
            )));
        }

        let summary_len = self.summary.chars().count();
        if summary_len > MAX_SUMMARY_CHARS {
            return Err(DomainError::validation(format!(
                "summary exceeds {MAX_SUMMARY_CHARS} characters ({summary_len})"
            )));
        }

        if self.sentiment.is_urgent() {
            let reason = self
                .urgent_reason
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| DomainError::validation("urgent analysis requires a reason"))?;
            let reason_len = reason.chars().count();
            if reason_len > MAX_URGENT_REASON_CHARS {
                return Err(DomainError::validation(format!(
                    "urgent reason exceeds {MAX_URGENT_REASON_CHARS} characters ({reason_len})"
                )));
            }
        }

        Ok(self.assemble())
    }

    /// Build, repairing out-of-range values instead of rejecting them
    ///
    /// Confidence is clamped into [0.0, 1.0] (non-finite becomes 0.0), text
    /// fields are truncated to their limits and an urgent analysis without a
    /// reason receives [`DEFAULT_URGENT_REASON`].
    #[must_use]
    pub fn build_normalized(mut self) -> TagAnalysis {
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.summary = truncate_chars(&self.summary, MAX_SUMMARY_CHARS);
        if self.sentiment.is_urgent() {
            let reason = self
                .urgent_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_URGENT_REASON);
            self.urgent_reason = Some(truncate_chars(reason, MAX_URGENT_REASON_CHARS));
        }
        self.assemble()
    }

    fn assemble(self) -> TagAnalysis {
        let Self {
            mut tags,
            sentiment,
            confidence,
            summary,
            urgent_reason,
            analyzed_at,
        } = self;

        let urgent_reason = if sentiment.is_urgent() {
            tags.insert(TagName::Allergies);
            urgent_reason
        } else {
            None
        };

        TagAnalysis {
            tags,
            sentiment,
            confidence,
            summary,
            analyzed_at: analyzed_at.unwrap_or_else(Utc::now),
            urgent_reason,
        }
    }
}
