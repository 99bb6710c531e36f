//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to connect to inference server
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to inference server failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during inference
    #[error("Inference timeout after {0}ms")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            InferenceError::Timeout(5000).to_string(),
            "Inference timeout after 5000ms"
        );
        assert!(
            InferenceError::ServerError("HTTP 500".into())
                .to_string()
                .contains("HTTP 500")
        );
    }
}
