//! Notification channel and delivery status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Delivery channel of a notification event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NotificationChannel {
    /// Audit trail inside the system; always attempted
    InSystem,
    /// External messaging (WhatsApp Business API)
    #[serde(rename = "whatsapp")]
    WhatsApp,
    /// Staff e-mail over SMTP
    Email,
}

impl NotificationChannel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InSystem => "in_system",
            Self::WhatsApp => "whatsapp",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    /// Whether the attempt has finished (successfully or not)
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Sent | Self::Failed)
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Sent => f.write_str("sent"),
            Self::Failed => f.write_str("failed"),
        }
    }
}
