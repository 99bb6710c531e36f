//! AI Foundry inference backend
//!
//! Talks to a model deployment exposing the OpenAI-compatible
//! chat-completions API.

mod client;

pub use client::FoundryInferenceEngine;
