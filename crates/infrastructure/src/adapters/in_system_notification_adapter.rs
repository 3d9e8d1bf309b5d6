//! In-system notification adapter
//!
//! The audit-trail channel: every urgent alert is logged and kept in a
//! bounded in-memory inbox for staff dashboards. Delivery never fails.

use std::collections::VecDeque;

use application::{error::ApplicationError, ports::NotificationTransportPort};
use async_trait::async_trait;
use domain::{NotificationChannel, NotificationEvent, NotificationStatus, TenantId};
use parking_lot::Mutex;
use tracing::{info, instrument};

/// Default number of alerts kept in the inbox
pub const DEFAULT_INBOX_CAPACITY: usize = 200;

#[derive(Debug)]
pub struct InSystemNotificationAdapter {
    inbox: Mutex<VecDeque<NotificationEvent>>,
    capacity: usize,
}

impl Default for InSystemNotificationAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX_CAPACITY)
    }
}

impl InSystemNotificationAdapter {
    /// Capacity 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inbox: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Most recent alerts first
    pub fn recent(&self, limit: usize) -> Vec<NotificationEvent> {
        self.inbox.lock().iter().rev().take(limit).cloned().collect()
    }

    /// Most recent alerts of one tenant first, with that tenant's total
    pub fn recent_for_tenant(
        &self,
        tenant_id: &TenantId,
        limit: usize,
    ) -> (Vec<NotificationEvent>, usize) {
        let inbox = self.inbox.lock();
        let owned: Vec<&NotificationEvent> = inbox
            .iter()
            .rev()
            .filter(|e| e.tenant_id == *tenant_id)
            .collect();
        let total = owned.len();
        (owned.into_iter().take(limit).cloned().collect(), total)
    }

    pub fn len(&self) -> usize {
        self.inbox.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.lock().is_empty()
    }
}

#[async_trait]
impl NotificationTransportPort for InSystemNotificationAdapter {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::InSystem
    }

    #[instrument(skip(self, event))]
    async fn send(&self, event: &NotificationEvent) -> Result<(), ApplicationError> {
        info!(
            tenant_id = %event.tenant_id,
            reservation_id = %event.reservation_id,
            subject = %event.subject,
            "In-system alert recorded"
        );

        // Recording is the delivery, so the inbox copy is already sent
        let mut delivered = event.clone();
        if delivered.status() == NotificationStatus::Pending {
            delivered.mark_sent()?;
        }

        let mut inbox = self.inbox.lock();
        if inbox.len() == self.capacity {
            inbox.pop_front();
        }
        inbox.push_back(delivered);
        Ok(())
    }
}
