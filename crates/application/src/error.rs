//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request failed validation before analysis
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Inference/AI error
    #[error("Inference error: {0}")]
    Inference(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Notification transport failure
    #[error("Notification error: {0}")]
    Notification(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Inference(_) | Self::ExternalService(_) | Self::Notification(_)
        )
    }
}

impl From<validator::ValidationErrors> for ApplicationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ApplicationError::Inference("timeout".into()).is_retryable());
        assert!(ApplicationError::ExternalService("503".into()).is_retryable());
        assert!(ApplicationError::Notification("smtp".into()).is_retryable());
    }

    #[test]
    fn caller_errors_are_not_retryable() {
        assert!(!ApplicationError::NotFound("customer".into()).is_retryable());
        assert!(!ApplicationError::Validation("too long".into()).is_retryable());
        assert!(!ApplicationError::Configuration("missing key".into()).is_retryable());
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::validation("bad").into();
        assert_eq!(err.to_string(), "Validation failed: bad");
    }
}
