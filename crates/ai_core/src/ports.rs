//! Port definitions for inference engine
//!
//! Defines the traits (ports) that inference engines must implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Request for inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Messages in the conversation
    pub messages: Vec<InferenceMessage>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the inference request (OpenAI-compatible format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceMessage {
    pub role: String,
    pub content: String,
}

impl InferenceRequest {
    /// Create a simple single-turn request
    pub fn simple(user_message: impl Into<String>) -> Self {
        Self {
            messages: vec![InferenceMessage {
                role: "user".to_string(),
                content: user_message.into(),
            }],
            max_tokens: None,
            temperature: None,
        }
    }

    /// Create a request with system prompt
    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![
                InferenceMessage {
                    role: "system".to_string(),
                    content: system.into(),
                },
                InferenceMessage {
                    role: "user".to_string(),
                    content: user.into(),
                },
            ],
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set temperature
    #[must_use]
    pub const fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set the token budget
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Generated content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Port for inference engine implementations
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a complete response
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError>;

    /// Check if the inference server is healthy
    async fn health_check(&self) -> Result<bool, InferenceError>;

    /// Get the addressed model deployment
    fn deployment(&self) -> &str;
}
