//! Tagging pipeline tuning.

use application::DEFAULT_FALLBACK_CONFIDENCE;
use serde::Deserialize;

/// Tagging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TaggingConfig {
    /// Confidence attached to deterministic fallback results
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f64,

    /// Number of analyses kept in the in-memory history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Upper bound for one classifier call including retries (none = unbounded)
    #[serde(default)]
    pub classifier_timeout_ms: Option<u64>,
}

const fn default_fallback_confidence() -> f64 {
    DEFAULT_FALLBACK_CONFIDENCE
}

const fn default_history_capacity() -> usize {
    50
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            fallback_confidence: default_fallback_confidence(),
            history_capacity: default_history_capacity(),
            classifier_timeout_ms: None,
        }
    }
}
