//! Foundry inference adapter - Implements InferencePort using ai_core
//!
//! Talks to an AI Foundry model deployment through its OpenAI-compatible
//! chat-completions endpoint.

use std::time::Instant;

use ai_core::{FoundryInferenceEngine, InferenceConfig, InferenceEngine, InferenceRequest};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter for AI Foundry model deployments
#[derive(Debug)]
pub struct FoundryInferenceAdapter {
    engine: FoundryInferenceEngine,
    structured_temperature: f32,
}

impl FoundryInferenceAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let structured_temperature = config.structured_output().temperature;
        let engine = FoundryInferenceEngine::new(config)
            .map_err(|e| ApplicationError::Inference(e.to_string()))?;

        Ok(Self {
            engine,
            structured_temperature,
        })
    }

    /// Convert ai_core error to application error
    fn map_error(e: ai_core::InferenceError) -> ApplicationError {
        match e {
            ai_core::InferenceError::ConnectionFailed(msg) => {
                ApplicationError::ExternalService(format!("Model connection failed: {msg}"))
            },
            ai_core::InferenceError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Inference timeout after {ms}ms"))
            },
            ai_core::InferenceError::RateLimited => {
                ApplicationError::ExternalService("Model deployment rate limited".to_string())
            },
            other => ApplicationError::Inference(other.to_string()),
        }
    }

    async fn dispatch(&self, request: InferenceRequest) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();

        let response = self
            .engine
            .generate(request)
            .await
            .map_err(Self::map_error)?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            model = %response.model,
            tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            latency_ms = latency_ms,
            "Inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }
}

#[async_trait]
impl InferencePort for FoundryInferenceAdapter {
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    async fn generate(&self, message: &str) -> Result<InferenceResult, ApplicationError> {
        self.dispatch(InferenceRequest::simple(message)).await
    }

    #[instrument(skip(self, system_prompt, message), fields(message_len = message.len()))]
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        // System-prompted calls carry a JSON contract; keep sampling tight.
        let request = InferenceRequest::with_system(system_prompt, message)
            .with_temperature(self.structured_temperature);
        self.dispatch(request).await
    }

    #[instrument(skip(self))]
    async fn is_healthy(&self) -> bool {
        self.engine.health_check().await.unwrap_or(false)
    }

    fn current_model(&self) -> String {
        self.engine.deployment().to_string()
    }
}
