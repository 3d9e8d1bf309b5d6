//! Notification transport port - one implementation per delivery channel

use async_trait::async_trait;
use domain::{NotificationChannel, NotificationEvent};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for delivering one notification event
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationTransportPort: Send + Sync {
    /// Channel served by this transport
    fn channel(&self) -> NotificationChannel;

    /// Deliver the event's subject and body to its recipient
    ///
    /// Callers treat every error as non-fatal.
    async fn send(&self, event: &NotificationEvent) -> Result<(), ApplicationError>;
}
