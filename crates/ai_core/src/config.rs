//! Configuration for inference engine

use serde::{Deserialize, Serialize};

/// Configuration for the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Project endpoint URL of the AI Foundry deployment
    #[serde(default)]
    pub endpoint: String,

    /// Name of the model deployment to address
    #[serde(default)]
    pub deployment: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-p (nucleus) sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

const fn default_max_tokens() -> u32 {
    2048
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_top_p() -> f32 {
    0.9
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            deployment: String::new(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl InferenceConfig {
    /// Create a config for an endpoint and deployment
    pub fn new(endpoint: impl Into<String>, deployment: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            ..Default::default()
        }
    }

    /// Derive a variant tuned for structured JSON output
    ///
    /// Lower temperature keeps the model closer to the requested schema.
    #[must_use]
    pub fn structured_output(&self) -> Self {
        Self {
            temperature: 0.1,
            ..self.clone()
        }
    }
}
