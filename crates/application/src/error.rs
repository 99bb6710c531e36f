//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Inference/AI error
    #[error("Inference error: {0}")]
    Inference(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether this error must halt the pipeline before it starts
    ///
    /// Only missing configuration is fatal. Every other failure class is
    /// absorbed by the owning stage and converted into a fallback value.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_is_fatal() {
        let err = ApplicationError::Configuration("missing endpoint".into());
        assert!(err.is_fatal());
    }

    #[test]
    fn service_errors_are_recoverable() {
        assert!(!ApplicationError::Inference("timeout".into()).is_fatal());
        assert!(!ApplicationError::ExternalService("HTTP 503".into()).is_fatal());
        assert!(!ApplicationError::Internal("oops".into()).is_fatal());
    }

    #[test]
    fn domain_error_converts() {
        let err: ApplicationError = DomainError::EmptyTripRequest.into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(!err.is_fatal());
    }
}
