//! Staff alert configuration: recipients plus WhatsApp and SMTP channels.

use application::NotificationTargets;
use integration_email::SmtpConfig;
use integration_whatsapp::WhatsAppClientConfig;
use secrecy::SecretString;
use serde::Deserialize;

use super::default_true;

/// Where urgent alerts go and through which channels
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsConfig {
    /// Staff phone for WhatsApp alerts (E.164)
    #[serde(default)]
    pub staff_phone: Option<String>,

    /// Staff mailbox for email alerts
    #[serde(default)]
    pub staff_email: Option<String>,

    /// WhatsApp Business channel (optional)
    #[serde(default)]
    pub whatsapp: Option<WhatsAppAppConfig>,

    /// SMTP channel (optional)
    #[serde(default)]
    pub email: Option<EmailAppConfig>,
}

impl NotificationsConfig {
    pub fn targets(&self) -> NotificationTargets {
        NotificationTargets {
            staff_phone: self.staff_phone.clone(),
            staff_email: self.staff_email.clone(),
        }
    }
}

/// WhatsApp integration configuration
#[derive(Clone, Deserialize)]
pub struct WhatsAppAppConfig {
    /// Graph API root
    #[serde(default = "default_whatsapp_api_url")]
    pub api_url: String,

    /// Meta Graph API access token (sensitive - uses SecretString)
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Phone number ID from WhatsApp Business
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// API version (default: v18.0)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_whatsapp_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for WhatsAppAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppAppConfig")
            .field("api_url", &self.api_url)
            .field(
                "access_token",
                &if self.access_token.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("phone_number_id", &self.phone_number_id)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

fn default_whatsapp_api_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_api_version() -> String {
    "v18.0".to_string()
}

const fn default_whatsapp_timeout_ms() -> u64 {
    10_000
}

impl Default for WhatsAppAppConfig {
    fn default() -> Self {
        Self {
            api_url: default_whatsapp_api_url(),
            access_token: None,
            phone_number_id: None,
            api_version: default_api_version(),
            timeout_ms: default_whatsapp_timeout_ms(),
        }
    }
}

impl WhatsAppAppConfig {
    /// Client settings, or `None` while the token or phone number id is missing
    pub fn to_client_config(&self) -> Option<WhatsAppClientConfig> {
        let access_token = self.access_token.clone()?;
        let phone_number_id = self
            .phone_number_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?
            .to_string();

        Some(WhatsAppClientConfig {
            access_token,
            phone_number_id,
            api_version: self.api_version.clone(),
            api_base_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
        })
    }
}

/// SMTP configuration
#[derive(Clone, Deserialize)]
pub struct EmailAppConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Sender address
    #[serde(default = "default_from")]
    pub from: String,

    #[serde(default)]
    pub username: String,

    /// SMTP password (sensitive - uses SecretString)
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Upgrade with STARTTLS (ignored on port 465, which uses implicit TLS)
    #[serde(default = "default_true")]
    pub starttls: bool,

    /// Accept self-signed certificates (local relays only)
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_smtp_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for EmailAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailAppConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("from", &self.from)
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("starttls", &self.starttls)
            .finish_non_exhaustive()
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "noreply@emenutables.com".to_string()
}

const fn default_smtp_timeout_ms() -> u64 {
    15_000
}

impl Default for EmailAppConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            from: default_from(),
            username: String::new(),
            password: None,
            starttls: true,
            accept_invalid_certs: false,
            timeout_ms: default_smtp_timeout_ms(),
        }
    }
}

impl EmailAppConfig {
    pub fn to_smtp_config(&self) -> SmtpConfig {
        let mut config = SmtpConfig::new(&self.smtp_host, &self.from)
            .with_port(self.smtp_port)
            .with_starttls(self.starttls)
            .with_timeout_ms(self.timeout_ms);
        config.username.clone_from(&self.username);
        config.password.clone_from(&self.password);
        config.accept_invalid_certs = self.accept_invalid_certs;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_come_from_staff_contacts() {
        let config = NotificationsConfig {
            staff_phone: Some("+15550100".to_string()),
            staff_email: None,
            ..Default::default()
        };
        let targets = config.targets();
        assert_eq!(targets.staff_phone.as_deref(), Some("+15550100"));
        assert!(targets.staff_email.is_none());
    }

    #[test]
    fn whatsapp_needs_token_and_phone_id() {
        let mut config = WhatsAppAppConfig::default();
        assert!(config.to_client_config().is_none());

        config.access_token = Some(SecretString::from("token"));
        assert!(config.to_client_config().is_none());

        config.phone_number_id = Some("  ".to_string());
        assert!(config.to_client_config().is_none());

        config.phone_number_id = Some("1234567890".to_string());
        let client = config.to_client_config().unwrap();
        assert_eq!(client.phone_number_id, "1234567890");
        assert_eq!(client.api_base_url, "https://graph.facebook.com");
    }

    #[test]
    fn email_maps_to_smtp_config() {
        let config = EmailAppConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            username: "alerts".to_string(),
            password: Some(SecretString::from("pw")),
            ..Default::default()
        };
        let smtp = config.to_smtp_config();
        assert_eq!(smtp.host, "smtp.example.com");
        assert!(smtp.uses_implicit_tls());
        assert!(smtp.requires_auth());
        assert!(smtp.validate().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let whatsapp = WhatsAppAppConfig {
            access_token: Some(SecretString::from("wa-secret")),
            ..Default::default()
        };
        let email = EmailAppConfig {
            password: Some(SecretString::from("smtp-secret")),
            ..Default::default()
        };
        let debug = format!("{whatsapp:?} {email:?}");
        assert!(!debug.contains("wa-secret"));
        assert!(!debug.contains("smtp-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
