//! Tagging orchestrator
//!
//! Asks the primary classifier first and falls back to the deterministic
//! tagger exactly once when it has no answer.

use std::{fmt, sync::Arc};

use domain::{AnalysisRequest, TagAnalysis};
use tracing::{info, instrument};

use super::fallback_tagger::FallbackTagger;
use crate::ports::TagClassifier;

/// Composes an optional primary classifier with the fallback tagger
#[derive(Clone)]
pub struct TaggingService {
    primary: Option<Arc<dyn TagClassifier>>,
    fallback: FallbackTagger,
}

impl fmt::Debug for TaggingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggingService")
            .field("primary", &self.primary.as_ref().map(|c| c.name()))
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl TaggingService {
    /// Create an orchestrator that only uses the fallback tagger
    pub const fn new(fallback: FallbackTagger) -> Self {
        Self {
            primary: None,
            fallback,
        }
    }

    /// Try `classifier` before the fallback
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn TagClassifier>) -> Self {
        self.primary = Some(classifier);
        self
    }

    /// Whether a primary classifier is configured
    pub const fn has_classifier(&self) -> bool {
        self.primary.is_some()
    }

    /// Produce the canonical analysis for a request
    #[instrument(
        skip(self, request),
        fields(reservation_id = %request.reservation_id, tenant_id = %request.tenant_id)
    )]
    pub async fn analyze(&self, request: &AnalysisRequest) -> TagAnalysis {
        let special = request.special_request_text.as_str();
        let dietary = request.dietary_preferences.as_str();

        let (analysis, source) = match &self.primary {
            Some(classifier) => match classifier.classify(special, dietary).await {
                Some(analysis) => (analysis, classifier.name()),
                None => (self.fallback.tag(special, dietary), self.fallback.name()),
            },
            None => (self.fallback.tag(special, dietary), self.fallback.name()),
        };

        info!(
            source,
            sentiment = %analysis.sentiment(),
            tags = %analysis.tag_labels(),
            confidence = analysis.confidence(),
            "Reservation analyzed"
        );
        analysis
    }
}
