//! Smart tagging handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use domain::{
    AnalysisRequest, CustomerId, NotificationEvent, ReservationId, TagAnalysis, TenantId,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Response of `POST /v1/reservations/analyze-tags`
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeTagsResponse {
    pub reservation_id: ReservationId,
    pub tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub smart_tags: TagAnalysis,
    pub notification_triggered: bool,
    /// One entry per attempted channel; empty unless urgent
    #[serde(default)]
    pub notifications: Vec<NotificationEvent>,
}

/// Analyze a reservation's special request and dietary preferences
#[instrument(
    skip(state, request),
    fields(reservation_id = %request.reservation_id, tenant_id = %request.tenant_id)
)]
pub async fn analyze_tags(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AnalysisRequest>,
) -> Result<Json<AnalyzeTagsResponse>, ApiError> {
    let reservation_id = request.reservation_id;
    let tenant_id = request.tenant_id;
    let customer_id = request.customer_id;
    let customer_name = request.customer_name.clone();

    let outcome = state.analyze_tags.analyze(request).await?;

    info!(
        sentiment = %outcome.analysis.sentiment(),
        tags = %outcome.analysis.tag_labels(),
        notification_triggered = outcome.notification_triggered,
        "Reservation analyzed"
    );

    Ok(Json(AnalyzeTagsResponse {
        reservation_id,
        tenant_id,
        customer_id,
        customer_name,
        smart_tags: outcome.analysis,
        notification_triggered: outcome.notification_triggered,
        notifications: outcome.events,
    }))
}

/// Tenant scope of a customer lookup
#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: TenantId,
}

/// Stored smart tags of a customer; `null` when never analyzed
#[instrument(skip(state, customer_id, query))]
pub async fn get_customer_tags(
    State(state): State<AppState>,
    customer_id: Result<Path<CustomerId>, PathRejection>,
    query: Result<Query<TenantQuery>, QueryRejection>,
) -> Result<Json<Option<TagAnalysis>>, ApiError> {
    let Path(customer_id) = customer_id.map_err(|e| ApiError::Validation(e.body_text()))?;
    let Query(TenantQuery { tenant_id }) =
        query.map_err(|e| ApiError::Validation(e.body_text()))?;

    let tags = state
        .analyze_tags
        .customer_tags(tenant_id, customer_id)
        .await?;
    Ok(Json(tags))
}
