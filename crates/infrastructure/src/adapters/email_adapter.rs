//! SMTP notification adapter - Implements NotificationTransportPort using integration_email

use application::{error::ApplicationError, ports::NotificationTransportPort};
use async_trait::async_trait;
use domain::{NotificationChannel, NotificationEvent};
use integration_email::{EmailError, OutgoingEmail, SmtpClient, SmtpConfig};
use tracing::{debug, instrument};

/// Sends urgent alerts by email
#[derive(Debug)]
pub struct SmtpNotificationAdapter {
    client: SmtpClient,
}

impl SmtpNotificationAdapter {
    pub fn new(config: SmtpConfig) -> Result<Self, EmailError> {
        Ok(Self {
            client: SmtpClient::new(config)?,
        })
    }

    fn map_error(e: EmailError) -> ApplicationError {
        ApplicationError::Notification(format!("Email send failed: {e}"))
    }
}

#[async_trait]
impl NotificationTransportPort for SmtpNotificationAdapter {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Email
    }

    #[instrument(skip(self, event), fields(reservation_id = %event.reservation_id, recipient = ?event.recipient))]
    async fn send(&self, event: &NotificationEvent) -> Result<(), ApplicationError> {
        let recipient = event.recipient.as_deref().ok_or_else(|| {
            ApplicationError::Notification("Email event has no recipient".to_string())
        })?;

        let email = OutgoingEmail::new(recipient, &event.subject, &event.body);
        let message_id = self.client.send(&email).await.map_err(Self::map_error)?;

        debug!(message_id = %message_id, "Email alert sent");
        Ok(())
    }
}
