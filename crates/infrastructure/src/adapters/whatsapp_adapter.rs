//! WhatsApp notification adapter
//!
//! Implements `NotificationTransportPort` using the WhatsApp integration crate.

use application::{error::ApplicationError, ports::NotificationTransportPort};
use async_trait::async_trait;
use domain::{NotificationChannel, NotificationEvent};
use integration_whatsapp::{WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
use tracing::{debug, instrument};

/// Sends urgent alerts as WhatsApp text messages
pub struct WhatsAppNotificationAdapter {
    client: WhatsAppClient,
}

impl WhatsAppNotificationAdapter {
    /// Create a new WhatsApp notification adapter
    ///
    /// # Errors
    /// Returns an error if the client configuration is invalid.
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, WhatsAppError> {
        Ok(Self {
            client: WhatsAppClient::new(config)?,
        })
    }

    /// Message text: subject line, blank line, body
    pub fn render(event: &NotificationEvent) -> String {
        format!("*{}*\n\n{}", event.subject, event.body)
    }
}

impl std::fmt::Debug for WhatsAppNotificationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppNotificationAdapter")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationTransportPort for WhatsAppNotificationAdapter {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::WhatsApp
    }

    #[instrument(skip(self, event), fields(reservation_id = %event.reservation_id, recipient = ?event.recipient))]
    async fn send(&self, event: &NotificationEvent) -> Result<(), ApplicationError> {
        let recipient = event.recipient.as_deref().ok_or_else(|| {
            ApplicationError::Notification("WhatsApp event has no recipient".to_string())
        })?;

        let response = self
            .client
            .send_message(recipient, &Self::render(event))
            .await
            .map_err(|e| ApplicationError::Notification(format!("WhatsApp send failed: {e}")))?;

        debug!(message_id = ?response.message_id(), "WhatsApp alert sent");
        Ok(())
    }
}
