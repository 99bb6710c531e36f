//! AI Foundry client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};

/// Inference engine addressing an AI Foundry model deployment
pub struct FoundryInferenceEngine {
    client: Client,
    config: InferenceConfig,
}

impl std::fmt::Debug for FoundryInferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoundryInferenceEngine")
            .field("endpoint", &self.config.endpoint)
            .field("deployment", &self.config.deployment)
            .finish_non_exhaustive()
    }
}

impl FoundryInferenceEngine {
    /// Create a new engine for the configured deployment
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            deployment = %config.deployment,
            "Initialized Foundry inference engine"
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a given route
    fn api_url(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }
}

/// OpenAI-compatible chat-completions request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI-compatible chat-completions response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[async_trait]
impl InferenceEngine for FoundryInferenceEngine {
    #[instrument(skip(self, request), fields(deployment = %self.config.deployment))]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let chat_request = ChatCompletionRequest {
            model: self.config.deployment.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: request.temperature.unwrap_or(self.config.temperature),
            top_p: self.config.top_p,
        };

        debug!("Sending chat-completions request");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&chat_request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(InferenceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Inference request failed");
            return Err(InferenceError::ServerError(format!("Status {status}: {body}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::InvalidResponse("no choices in response".to_string()))?;

        let usage = completion.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        debug!(tokens = ?usage, "Inference completed");

        Ok(InferenceResponse {
            content: choice.message.content,
            model: completion.model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, InferenceError> {
        let response = self
            .client
            .get(self.api_url("models"))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) if e.is_timeout() || e.is_connect() => Ok(false),
            Err(e) => Err(InferenceError::RequestFailed(e.to_string())),
        }
    }

    fn deployment(&self) -> &str {
        &self.config.deployment
    }
}
