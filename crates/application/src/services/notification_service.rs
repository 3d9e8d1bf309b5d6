//! Notification dispatcher for urgent allergy / medical alerts
//!
//! Turns an urgent analysis into one event per reachable channel, sends each
//! through its transport and records the outcome on the event. Dispatch
//! failures never escape this service.

use std::{fmt, sync::Arc};

use domain::{
    DEFAULT_URGENT_REASON, NotificationChannel, NotificationEvent, NotificationStatus,
    ReservationId, TagAnalysis, TenantId,
};
use tracing::{error, info, instrument, warn};

use crate::ports::NotificationTransportPort;

/// Staff contact targets for external channels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationTargets {
    /// Phone number for WhatsApp alerts
    pub staff_phone: Option<String>,
    /// Address for e-mail alerts
    pub staff_email: Option<String>,
}

impl NotificationTargets {
    /// Recipient for an external channel, if one is configured
    #[must_use]
    pub fn recipient_for(&self, channel: NotificationChannel) -> Option<&str> {
        let target = match channel {
            NotificationChannel::WhatsApp => self.staff_phone.as_deref(),
            NotificationChannel::Email => self.staff_email.as_deref(),
            _ => None,
        };
        target.map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Subject line of an urgent alert
#[must_use]
pub fn alert_subject(reservation_id: ReservationId) -> String {
    format!("URGENT: Allergy/Medical Alert - Reservation {reservation_id}")
}

/// Body of an urgent alert
#[must_use]
pub fn alert_body(reservation_id: ReservationId, analysis: &TagAnalysis) -> String {
    let reason = analysis.urgent_reason().unwrap_or(DEFAULT_URGENT_REASON);
    let percent = analysis.confidence() * 100.0;
    format!(
        "Reservation {reservation_id} has been flagged as URGENT.\n\n\
         Reason: {reason}\n\
         Tags: {tags}\n\
         AI Summary: {summary}\n\
         Confidence: {percent:.0}%\n\n\
         Please review this reservation immediately and brief kitchen staff.",
        tags = analysis.tag_labels(),
        summary = analysis.summary(),
    )
}

/// Dispatches urgent alerts over the in-system channel and any extra channels
pub struct NotificationService {
    in_system: Arc<dyn NotificationTransportPort>,
    external: Vec<Arc<dyn NotificationTransportPort>>,
}

impl fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels: Vec<_> = self.external.iter().map(|t| t.channel()).collect();
        f.debug_struct("NotificationService")
            .field("external_channels", &channels)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Create a dispatcher with the always-present in-system transport
    pub fn new(in_system: Arc<dyn NotificationTransportPort>) -> Self {
        Self {
            in_system,
            external: Vec::new(),
        }
    }

    /// Register a transport for an external channel
    ///
    /// Transports are attempted in registration order after the in-system
    /// event. A second transport for a channel that is already registered
    /// replaces the first.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn NotificationTransportPort>) -> Self {
        let channel = transport.channel();
        if channel == NotificationChannel::InSystem {
            self.in_system = transport;
        } else if let Some(slot) = self.external.iter_mut().find(|t| t.channel() == channel) {
            *slot = transport;
        } else {
            self.external.push(transport);
        }
        self
    }

    /// Whether a transport is registered for `channel`
    pub fn has_channel(&self, channel: NotificationChannel) -> bool {
        channel == NotificationChannel::InSystem
            || self.external.iter().any(|t| t.channel() == channel)
    }

    /// Dispatch alerts for an urgent analysis
    ///
    /// Returns an empty list for a non-urgent analysis. Otherwise the first
    /// event is always the in-system one, followed by one event per external
    /// channel that has both a transport and a target.
    #[instrument(skip(self, analysis, targets), fields(sentiment = %analysis.sentiment()))]
    pub async fn check_and_notify(
        &self,
        tenant_id: TenantId,
        reservation_id: ReservationId,
        analysis: &TagAnalysis,
        targets: &NotificationTargets,
    ) -> Vec<NotificationEvent> {
        if !analysis.is_urgent() {
            return Vec::new();
        }

        let subject = alert_subject(reservation_id);
        let body = alert_body(reservation_id, analysis);
        let new_event = |channel| {
            NotificationEvent::new(tenant_id, reservation_id, channel, &subject, &body)
        };

        let mut events = Vec::with_capacity(1 + self.external.len());
        events.push(dispatch(self.in_system.as_ref(), new_event(NotificationChannel::InSystem)).await);

        for transport in &self.external {
            let channel = transport.channel();
            let Some(recipient) = targets.recipient_for(channel) else {
                continue;
            };
            let event = new_event(channel).with_recipient(recipient);
            events.push(dispatch(transport.as_ref(), event).await);
        }

        let sent = events
            .iter()
            .filter(|e| e.status() == NotificationStatus::Sent)
            .count();
        info!(
            events = events.len(),
            sent,
            "Urgent notification dispatched"
        );
        events
    }
}

/// Send one event and record the outcome on it
async fn dispatch(
    transport: &dyn NotificationTransportPort,
    mut event: NotificationEvent,
) -> NotificationEvent {
    let outcome = match transport.send(&event).await {
        Ok(()) => event.mark_sent(),
        Err(e) => {
            warn!(
                channel = %event.channel,
                reservation_id = %event.reservation_id,
                error = %e,
                "Notification dispatch failed"
            );
            event.mark_failed(e.to_string())
        },
    };
    if let Err(e) = outcome {
        error!(channel = %event.channel, error = %e, "Notification status not recorded");
    }
    event
}

#[cfg(test)]
mod tests {
    use domain::{SentimentLevel, TagName};

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::MockNotificationTransportPort;

    fn urgent_analysis() -> TagAnalysis {
        TagAnalysis::new(
            [TagName::DietaryRestrictions],
            SentimentLevel::Urgent,
            0.9,
            "Severe nut allergy",
            Some("Detected urgent keyword: 'epipen'".to_string()),
        )
        .unwrap()
    }

    fn transport(channel: NotificationChannel, succeed: bool) -> Arc<dyn NotificationTransportPort> {
        let mut mock = MockNotificationTransportPort::new();
        mock.expect_channel().return_const(channel);
        if succeed {
            mock.expect_send().returning(|_| Ok(()));
        } else {
            mock.expect_send()
                .returning(|_| Err(ApplicationError::Notification("gateway down".into())));
        }
        Arc::new(mock)
    }

    fn targets() -> NotificationTargets {
        NotificationTargets {
            staff_phone: Some("+15550100".to_string()),
            staff_email: Some("kitchen@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn non_urgent_analysis_yields_no_events() {
        let mut in_system = MockNotificationTransportPort::new();
        in_system.expect_channel().return_const(NotificationChannel::InSystem);
        in_system.expect_send().never();

        let service = NotificationService::new(Arc::new(in_system));
        let analysis =
            TagAnalysis::new([TagName::Vip], SentimentLevel::Neutral, 0.55, "", None).unwrap();
        let events = service
            .check_and_notify(TenantId::new(), ReservationId::new(), &analysis, &targets())
            .await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn urgent_analysis_always_has_in_system_event() {
        let service = NotificationService::new(transport(NotificationChannel::InSystem, true));
        let events = service
            .check_and_notify(
                TenantId::new(),
                ReservationId::new(),
                &urgent_analysis(),
                &NotificationTargets::default(),
            )
            .await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].channel, NotificationChannel::InSystem);
        assert_eq!(events[0].status(), NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn external_channels_need_target_and_transport() {
        let service = NotificationService::new(transport(NotificationChannel::InSystem, true))
            .with_transport(transport(NotificationChannel::WhatsApp, true));

        // Email target configured but no email transport; WhatsApp has both
        let events = service
            .check_and_notify(TenantId::new(), ReservationId::new(), &urgent_analysis(), &targets())
            .await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].channel, NotificationChannel::WhatsApp);
        assert_eq!(events[1].recipient.as_deref(), Some("+15550100"));

        // Transport present but no target
        let no_phone = NotificationTargets {
            staff_phone: None,
            staff_email: None,
        };
        let events = service
            .check_and_notify(TenantId::new(), ReservationId::new(), &urgent_analysis(), &no_phone)
            .await;
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn failures_are_recorded_not_raised() {
        let service = NotificationService::new(transport(NotificationChannel::InSystem, false))
            .with_transport(transport(NotificationChannel::WhatsApp, false))
            .with_transport(transport(NotificationChannel::Email, true));

        let events = service
            .check_and_notify(TenantId::new(), ReservationId::new(), &urgent_analysis(), &targets())
            .await;

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].status(), NotificationStatus::Failed);
        assert_eq!(events[1].status(), NotificationStatus::Failed);
        assert!(events[1].error().is_some_and(|e| e.contains("gateway down")));
        assert_eq!(events[2].channel, NotificationChannel::Email);
        assert_eq!(events[2].status(), NotificationStatus::Sent);
    }

    #[tokio::test]
    async fn events_carry_correlation_ids_and_template() {
        let tenant = TenantId::new();
        let reservation = ReservationId::new();
        let service = NotificationService::new(transport(NotificationChannel::InSystem, true));

        let events = service
            .check_and_notify(tenant, reservation, &urgent_analysis(), &targets())
            .await;
        let event = &events[0];

        assert_eq!(event.tenant_id, tenant);
        assert_eq!(event.reservation_id, reservation);
        assert_eq!(event.subject, alert_subject(reservation));
        assert!(event.body.contains("Reason: Detected urgent keyword: 'epipen'"));
        assert!(event.body.contains("Tags: Dietary restrictions, allergies"));
        assert!(event.body.contains("AI Summary: Severe nut allergy"));
        assert!(event.body.contains("Confidence: 90%"));
    }

    #[test]
    fn subject_format() {
        let id = ReservationId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            alert_subject(id),
            "URGENT: Allergy/Medical Alert - Reservation 550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn body_format() {
        let id = ReservationId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let analysis = TagAnalysis::new(
            [],
            SentimentLevel::Urgent,
            0.55,
            "Generated by deterministic fallback (classifier unavailable).",
            Some("Detected urgent keyword: 'anaphylaxis'".to_string()),
        )
        .unwrap();
        assert_eq!(
            alert_body(id, &analysis),
            "Reservation 550e8400-e29b-41d4-a716-446655440000 has been flagged as URGENT.\n\n\
             Reason: Detected urgent keyword: 'anaphylaxis'\n\
             Tags: allergies\n\
             AI Summary: Generated by deterministic fallback (classifier unavailable).\n\
             Confidence: 55%\n\n\
             Please review this reservation immediately and brief kitchen staff."
        );
    }

    #[test]
    fn blank_targets_are_ignored() {
        let targets = NotificationTargets {
            staff_phone: Some("  ".to_string()),
            staff_email: Some("chef@example.com".to_string()),
        };
        assert_eq!(targets.recipient_for(NotificationChannel::WhatsApp), None);
        assert_eq!(
            targets.recipient_for(NotificationChannel::Email),
            Some("chef@example.com")
        );
        assert_eq!(targets.recipient_for(NotificationChannel::InSystem), None);
    }

    #[test]
    fn transports_replace_same_channel() {
        let service = NotificationService::new(transport(NotificationChannel::InSystem, true))
            .with_transport(transport(NotificationChannel::Email, true))
            .with_transport(transport(NotificationChannel::Email, false));
        assert!(service.has_channel(NotificationChannel::Email));
        assert!(!service.has_channel(NotificationChannel::WhatsApp));
        assert_eq!(service.external.len(), 1);
    }
}
