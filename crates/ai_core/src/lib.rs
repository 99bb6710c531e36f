//! AI Core - Inference engine for model deployments
//!
//! Provides abstractions for LLM inference against an AI Foundry model
//! deployment, which exposes an OpenAI-compatible chat-completions API.

pub mod config;
pub mod error;
pub mod foundry;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use foundry::FoundryInferenceEngine;
pub use ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};
