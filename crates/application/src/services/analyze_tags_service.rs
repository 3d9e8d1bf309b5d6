//! Analyze-tags use case
//!
//! Validate the request, run the tagging pipeline, store the result on the
//! customer profile, alert staff when urgent and remember the analysis in the
//! recent history.

use std::{fmt, sync::Arc};

use domain::{
    AnalysisRecord, AnalysisRequest, CustomerId, NotificationEvent, TagAnalysis, TenantId,
};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use super::{
    notification_service::{NotificationService, NotificationTargets},
    tagging_service::TaggingService,
};
use crate::{
    error::ApplicationError,
    ports::{AnalysisHistoryPort, CustomerProfileStore},
};

/// Result of one analyze-tags call
#[derive(Debug, Clone)]
pub struct AnalyzeTagsOutcome {
    pub analysis: TagAnalysis,
    /// Dispatched alerts; empty unless the analysis is urgent
    pub events: Vec<NotificationEvent>,
    pub notification_triggered: bool,
}

/// Inbound use case behind `POST /v1/reservations/analyze-tags`
pub struct AnalyzeTagsService {
    tagging: TaggingService,
    notifications: NotificationService,
    targets: NotificationTargets,
    profiles: Arc<dyn CustomerProfileStore>,
    history: Arc<dyn AnalysisHistoryPort>,
}

impl fmt::Debug for AnalyzeTagsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzeTagsService")
            .field("tagging", &self.tagging)
            .field("notifications", &self.notifications)
            .field("history_capacity", &self.history.capacity())
            .finish_non_exhaustive()
    }
}

impl AnalyzeTagsService {
    /// Create the use case from its collaborators
    pub fn new(
        tagging: TaggingService,
        notifications: NotificationService,
        profiles: Arc<dyn CustomerProfileStore>,
        history: Arc<dyn AnalysisHistoryPort>,
    ) -> Self {
        Self {
            tagging,
            notifications,
            targets: NotificationTargets::default(),
            profiles,
            history,
        }
    }

    /// Staff contacts used for external alert channels
    #[must_use]
    pub fn with_targets(mut self, targets: NotificationTargets) -> Self {
        self.targets = targets;
        self
    }

    /// Whether a language-model classifier is configured
    pub const fn has_classifier(&self) -> bool {
        self.tagging.has_classifier()
    }

    /// Analyze a reservation's guest notes
    ///
    /// Persistence errors are returned to the caller; notification failures
    /// are recorded on the returned events and never fail the call.
    #[instrument(
        skip(self, request),
        fields(reservation_id = %request.reservation_id, tenant_id = %request.tenant_id)
    )]
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalyzeTagsOutcome, ApplicationError> {
        request.validate()?;

        let analysis = self.tagging.analyze(&request).await;

        if let Some(customer_id) = request.customer_id {
            self.persist(&request.tenant_id, &customer_id, &analysis)
                .await?;
        }

        let events = self
            .notifications
            .check_and_notify(
                request.tenant_id,
                request.reservation_id,
                &analysis,
                &self.targets,
            )
            .await;
        let notification_triggered = !events.is_empty();

        if notification_triggered {
            warn!(
                reason = analysis.urgent_reason().unwrap_or_default(),
                "Urgent reservation flagged"
            );
        }

        self.history
            .record(AnalysisRecord::new(
                request.reservation_id,
                request.tenant_id,
                request.customer_name,
                analysis.clone(),
                notification_triggered,
            ))
            .await;

        Ok(AnalyzeTagsOutcome {
            analysis,
            events,
            notification_triggered,
        })
    }

    async fn persist(
        &self,
        tenant_id: &TenantId,
        customer_id: &CustomerId,
        analysis: &TagAnalysis,
    ) -> Result<(), ApplicationError> {
        match self.profiles.save_tags(tenant_id, customer_id, analysis).await {
            Ok(true) => {
                info!(%customer_id, "Smart tags stored on customer profile");
                Ok(())
            },
            Ok(false) => Err(customer_not_found(tenant_id, customer_id)),
            Err(e) => {
                error!(%customer_id, error = %e, "Failed to persist smart tags");
                Err(match e {
                    ApplicationError::Persistence(_) | ApplicationError::NotFound(_) => e,
                    other => ApplicationError::Persistence(other.to_string()),
                })
            },
        }
    }

    /// Stored analysis of a customer, scoped by tenant
    ///
    /// `Ok(None)` means the customer exists but has not been analyzed yet.
    #[instrument(skip(self))]
    pub async fn customer_tags(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
    ) -> Result<Option<TagAnalysis>, ApplicationError> {
        let profile = self
            .profiles
            .get_profile(&tenant_id, &customer_id)
            .await?
            .ok_or_else(|| customer_not_found(&tenant_id, &customer_id))?;
        Ok(profile.smart_tags)
    }

    /// Up to `limit` recent analyses, newest first, and the stored total
    ///
    /// With a tenant, only that tenant's analyses are returned and counted.
    pub async fn history(
        &self,
        tenant_id: Option<TenantId>,
        limit: usize,
    ) -> (Vec<AnalysisRecord>, usize) {
        let Some(tenant_id) = tenant_id else {
            let records = self.history.recent(limit).await;
            let total = self.history.len().await;
            return (records, total);
        };

        let owned: Vec<AnalysisRecord> = self
            .history
            .recent(self.history.capacity())
            .await
            .into_iter()
            .filter(|r| r.tenant_id == tenant_id)
            .collect();
        let total = owned.len();
        (owned.into_iter().take(limit).collect(), total)
    }
}

fn customer_not_found(tenant_id: &TenantId, customer_id: &CustomerId) -> ApplicationError {
    ApplicationError::NotFound(format!(
        "Customer {customer_id} not found for tenant {tenant_id}"
    ))
}
