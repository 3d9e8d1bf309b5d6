//! Notification event entity
//!
//! One dispatch attempt of an urgent alert on one channel. Events are never
//! reused; status moves once from `pending` to `sent` or `failed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{
    NotificationChannel, NotificationId, NotificationStatus, ReservationId, TenantId,
};

/// A single staff notification and its delivery status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: NotificationId,
    pub tenant_id: TenantId,
    pub reservation_id: ReservationId,
    pub channel: NotificationChannel,
    /// Phone number or address the event was sent to (none for in-system)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    pub subject: String,
    pub body: String,
    status: NotificationStatus,
    pub dispatched_at: DateTime<Utc>,
    /// Transport error message for failed events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl NotificationEvent {
    /// Create a pending event
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        reservation_id: ReservationId,
        channel: NotificationChannel,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            tenant_id,
            reservation_id,
            channel,
            recipient: None,
            subject: subject.into(),
            body: body.into(),
            status: NotificationStatus::Pending,
            dispatched_at: Utc::now(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    #[must_use]
    pub const fn status(&self) -> NotificationStatus {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record a successful delivery
    pub fn mark_sent(&mut self) -> Result<(), DomainError> {
        self.transition(NotificationStatus::Sent)?;
        self.error = None;
        Ok(())
    }

    /// Record a failed delivery with the transport's error message
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), DomainError> {
        self.transition(NotificationStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn transition(&mut self, next: NotificationStatus) -> Result<(), DomainError> {
        if self.status != NotificationStatus::Pending {
            return Err(DomainError::InvalidTransition(format!(
                "{} -> {next}",
                self.status
            )));
        }
        self.status = next;
        self.dispatched_at = Utc::now();
        Ok(())
    }
}
