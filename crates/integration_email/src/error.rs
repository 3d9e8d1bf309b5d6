use thiserror::Error;

/// Errors raised while delivering mail
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("SMTP session timed out")]
    Timeout,
}

impl EmailError {
    /// Whether a later attempt could succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout)
    }
}
