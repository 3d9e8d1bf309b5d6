//! Health check handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "eMenu Tables Smart Tagging API";

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Whether a hosted classifier is configured (otherwise keyword rules only)
    pub classifier_configured: bool,
}

/// Liveness check - is the server running?
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        classifier_configured: state.inference.is_some(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub classifier: ClassifierStatus,
}

/// Status of the hosted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierStatus {
    pub configured: bool,
    pub healthy: bool,
    pub model: Option<String>,
}

/// Readiness check
///
/// Always ready: when the classifier is missing or unhealthy, analyses fall
/// back to the keyword tagger. The classifier status is reported for
/// operators.
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let classifier = match &state.inference {
        Some(inference) => {
            let healthy = inference.is_healthy().await;
            ClassifierStatus {
                configured: true,
                healthy,
                model: Some(inference.current_model()),
            }
        },
        None => ClassifierStatus {
            configured: false,
            healthy: false,
            model: None,
        },
    };

    if classifier.configured && !classifier.healthy {
        tracing::warn!("Classifier unhealthy, serving keyword fallback");
    }

    Json(ReadinessResponse {
        ready: true,
        classifier,
    })
}
