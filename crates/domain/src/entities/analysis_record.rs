//! Analysis history entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::TagAnalysis;
use crate::value_objects::{AnalysisId, ReservationId, TenantId};

/// One completed analysis as kept in the recent-history buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub reservation_id: ReservationId,
    pub tenant_id: TenantId,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub smart_tags: TagAnalysis,
    pub notification_triggered: bool,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    #[must_use]
    pub fn new(
        reservation_id: ReservationId,
        tenant_id: TenantId,
        customer_name: Option<String>,
        smart_tags: TagAnalysis,
        notification_triggered: bool,
    ) -> Self {
        Self {
            id: AnalysisId::new(),
            reservation_id,
            tenant_id,
            customer_name,
            smart_tags,
            notification_triggered,
            created_at: Utc::now(),
        }
    }
}
