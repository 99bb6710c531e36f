//! Infrastructure layer - Configuration and adapters
//!
//! Wires the application ports to concrete backends: the AI Foundry
//! chat-completions deployment for inference and Open-Meteo for
//! current weather conditions.

pub mod adapters;
pub mod config;

pub use adapters::{FoundryInferenceAdapter, OpenMeteoWeatherAdapter};
pub use config::AppConfig;
