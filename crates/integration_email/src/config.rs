use std::fmt;

use secrecy::SecretString;
use serde::Deserialize;

use crate::EmailError;

/// Port on which servers expect TLS from the first byte
pub(crate) const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP relay settings
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Envelope and header sender
    pub from: String,

    /// Login name; authentication is skipped when empty
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: Option<SecretString>,

    /// Upgrade the plaintext session with STARTTLS (ignored on port 465)
    #[serde(default = "default_starttls")]
    pub starttls: bool,

    /// Accept self-signed certificates, for local relays only
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_port() -> u16 {
    587
}

const fn default_starttls() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    15_000
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("starttls", &self.starttls)
            .finish_non_exhaustive()
    }
}

impl SmtpConfig {
    /// Creates a config for `host` on the submission port with STARTTLS
    pub fn new(host: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            from: from.into(),
            username: String::new(),
            password: None,
            starttls: default_starttls(),
            accept_invalid_certs: false,
            timeout_ms: default_timeout_ms(),
        }
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = username.into();
        self.password = Some(password);
        self
    }

    #[must_use]
    pub const fn with_starttls(mut self, starttls: bool) -> Self {
        self.starttls = starttls;
        self
    }

    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn uses_implicit_tls(&self) -> bool {
        self.port == IMPLICIT_TLS_PORT
    }

    pub fn requires_auth(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn validate(&self) -> Result<(), EmailError> {
        if self.host.trim().is_empty() {
            return Err(EmailError::ConnectionFailed(
                "SMTP host is required".to_string(),
            ));
        }
        if !is_plausible_address(&self.from) {
            return Err(EmailError::InvalidAddress(self.from.clone()));
        }
        if self.requires_auth() && self.password.is_none() {
            return Err(EmailError::AuthenticationFailed);
        }
        Ok(())
    }
}

/// Loose `local@domain` check; header injection characters are rejected.
pub(crate) fn is_plausible_address(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !address
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | ','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_submission_port_with_starttls() {
        let config = SmtpConfig::new("smtp.example.com", "noreply@emenutables.com");
        assert_eq!(config.port, 587);
        assert!(config.starttls);
        assert!(!config.uses_implicit_tls());
        assert!(!config.requires_auth());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn port_465_means_implicit_tls() {
        let config = SmtpConfig::new("smtp.example.com", "a@b.com").with_port(465);
        assert!(config.uses_implicit_tls());
    }

    #[test]
    fn username_without_password_is_rejected() {
        let mut config = SmtpConfig::new("smtp.example.com", "a@b.com");
        config.username = "alerts".to_string();
        assert!(matches!(
            config.validate(),
            Err(EmailError::AuthenticationFailed)
        ));
    }

    #[test]
    fn bad_sender_is_rejected() {
        let config = SmtpConfig::new("smtp.example.com", "not-an-address");
        assert!(matches!(
            config.validate(),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let config = SmtpConfig::new("smtp.example.com", "a@b.com")
            .with_credentials("alerts", SecretString::from("hunter2"));
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"host":"mail.local","from":"ops@example.com"}"#;
        let config: SmtpConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 587);
        assert_eq!(config.timeout_ms, 15_000);
        assert!(config.password.is_none());
    }

    #[test]
    fn address_check() {
        assert!(is_plausible_address("chef@bistro.com"));
        assert!(!is_plausible_address("chef"));
        assert!(!is_plausible_address("@bistro.com"));
        assert!(!is_plausible_address("a@b@c"));
        assert!(!is_plausible_address("a@b.com\r\nBcc: x@y.com"));
    }
}
