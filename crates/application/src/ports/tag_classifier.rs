//! Tag classifier port
//!
//! A text classifier turns the two guest-text fields into a [`TagAnalysis`].
//! Network-backed classifiers may have no answer; the deterministic fallback
//! always has one.

use async_trait::async_trait;
use domain::TagAnalysis;
#[cfg(test)]
use mockall::automock;

/// Port for classifying guest notes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TagClassifier: Send + Sync {
    /// Classify the special request and dietary text
    ///
    /// Returns `None` when the classifier could not produce a valid result.
    /// Implementations never return errors.
    async fn classify(&self, special_request: &str, dietary_preferences: &str)
    -> Option<TagAnalysis>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
