//! Application state shared across handlers

use std::sync::Arc;

use application::{AnalyzeTagsService, InferencePort};
use infrastructure::{AppConfig, InSystemNotificationAdapter};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The analyze-tags use case
    pub analyze_tags: Arc<AnalyzeTagsService>,
    /// Hosted classifier, when an API key is configured (readiness probe)
    pub inference: Option<Arc<dyn InferencePort>>,
    /// In-system alert inbox
    pub inbox: Arc<InSystemNotificationAdapter>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analyze_tags", &self.analyze_tags)
            .field("classifier", &self.inference.is_some())
            .field("environment", &self.config.environment)
            .finish_non_exhaustive()
    }
}
