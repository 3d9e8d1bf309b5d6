//! Recent analyses and in-system alert inbox

use axum::{
    Json,
    extract::{Query, State},
};
use domain::{AnalysisRecord, NotificationEvent, TenantId};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Entries returned when no `limit` is given
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Upper bound on `limit`
pub const MAX_PAGE_SIZE: usize = 500;

/// Paging and optional tenant scope
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
}

impl LimitQuery {
    fn resolved(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Newest first
    pub history: Vec<AnalysisRecord>,
    /// Entries currently retained
    pub total: usize,
}

/// Recent analyses, newest first
pub async fn get_analysis_history(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<HistoryResponse> {
    let (history, total) = state
        .analyze_tags
        .history(query.tenant_id, query.resolved())
        .await;
    Json(HistoryResponse { history, total })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsResponse {
    /// Newest first
    pub notifications: Vec<NotificationEvent>,
    pub total: usize,
}

/// Urgent alerts recorded on the in-system channel, newest first
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<NotificationsResponse> {
    let (notifications, total) = match &query.tenant_id {
        Some(tenant_id) => state.inbox.recent_for_tenant(tenant_id, query.resolved()),
        None => (state.inbox.recent(query.resolved()), state.inbox.len()),
    };
    Json(NotificationsResponse {
        notifications,
        total,
    })
}
