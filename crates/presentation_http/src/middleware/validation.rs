//! Request validation
//!
//! `ValidatedJson` deserializes a JSON body and runs its `validator` rules,
//! rejecting either failure with a 400 `validation_error` body.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::JsonError(e) => e.body_text(),
            Self::ValidationFailed(msg) => msg.clone(),
        };

        let body = serde_json::json!({
            "error": message,
            "code": "validation_error"
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Flatten field errors into `field: message` pairs
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let detail = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {detail}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// A JSON extractor that also validates the request body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, routing::post};
    use domain::AnalysisRequest;
    use tower::ServiceExt;

    use super::*;

    async fn echo(ValidatedJson(req): ValidatedJson<AnalysisRequest>) -> String {
        req.special_request_text
    }

    async fn post_json(body: String) -> (StatusCode, serde_json::Value) {
        let response = Router::new()
            .route("/analyze", post(echo))
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    fn ids() -> (String, String) {
        (uuid::Uuid::new_v4().to_string(), uuid::Uuid::new_v4().to_string())
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let (reservation, tenant) = ids();
        let body = format!(
            r#"{{"reservation_id":"{reservation}","tenant_id":"{tenant}","special_request_text":"window seat"}}"#
        );
        let (status, _) = post_json(body).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_tenant_is_rejected() {
        let (reservation, _) = ids();
        let (status, json) = post_json(format!(r#"{{"reservation_id":"{reservation}"}}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "validation_error");
    }

    #[tokio::test]
    async fn oversized_text_is_rejected() {
        let (reservation, tenant) = ids();
        let long = "x".repeat(2001);
        let body = format!(
            r#"{{"reservation_id":"{reservation}","tenant_id":"{tenant}","special_request_text":"{long}"}}"#
        );
        let (status, json) = post_json(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("special_request_text"));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (status, json) = post_json("{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "validation_error");
    }
}
