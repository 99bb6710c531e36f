//! Application configuration
//!
//! One immutable `AppConfig` is built at startup and passed by reference.
//! Sources, in increasing precedence: built-in defaults, an optional
//! `packpilot.toml` file, `PACKPILOT_`-prefixed environment variables,
//! and finally the two vendor variables the AI Foundry SDK conventions
//! use (`AZURE_AI_FOUNDRY_ENDPOINT`, `AZURE_AI_MODEL_DEPLOYMENT_NAME`).
//! A `.env` file is loaded through dotenvy before any of this, so it
//! sits strictly below real environment variables.

use ai_core::InferenceConfig;
use application::error::ApplicationError;
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Endpoint of the AI Foundry project, set by the hosting platform
pub const ENV_FOUNDRY_ENDPOINT: &str = "AZURE_AI_FOUNDRY_ENDPOINT";

/// Name of the model deployment to address
pub const ENV_MODEL_DEPLOYMENT: &str = "AZURE_AI_MODEL_DEPLOYMENT_NAME";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Inference configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Weather service configuration
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// # Errors
    ///
    /// Returns an error if a config source is present but malformed.
    pub fn load() -> Result<Self, config::ConfigError> {
        // A .env file is a local-development convenience only.
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("inference.endpoint", "")?
            .set_default("inference.deployment", "")?
            .set_default("weather.base_url", "https://api.open-meteo.com/v1")?
            // Load from file if exists
            .add_source(config::File::with_name("packpilot").required(false))
            // Override with environment variables (e.g., PACKPILOT_INFERENCE_ENDPOINT)
            .add_source(
                config::Environment::with_prefix("PACKPILOT")
                    .separator("_")
                    .try_parsing(true),
            );

        let mut app_config: Self = builder.build()?.try_deserialize()?;
        app_config.apply_vendor_env();
        Ok(app_config)
    }

    /// Overlay the vendor environment variables on top of everything else
    fn apply_vendor_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENV_FOUNDRY_ENDPOINT) {
            if !endpoint.trim().is_empty() {
                debug!(var = ENV_FOUNDRY_ENDPOINT, "Applying vendor endpoint override");
                self.inference.endpoint = endpoint;
            }
        }
        if let Ok(deployment) = std::env::var(ENV_MODEL_DEPLOYMENT) {
            if !deployment.trim().is_empty() {
                debug!(var = ENV_MODEL_DEPLOYMENT, "Applying vendor deployment override");
                self.inference.deployment = deployment;
            }
        }
    }

    /// Validate that the inference backend is addressable
    ///
    /// Missing configuration is the only fatal failure class; everything
    /// downstream degrades to fallbacks instead.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` listing each missing
    /// variable.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let mut missing = Vec::new();

        if self.inference.endpoint.trim().is_empty() {
            missing.push(ENV_FOUNDRY_ENDPOINT);
        }
        if self.inference.deployment.trim().is_empty() {
            missing.push(ENV_MODEL_DEPLOYMENT);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApplicationError::Configuration(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )))
        }
    }

    /// Operator guidance printed when `validate` fails
    #[must_use]
    pub fn setup_instructions() -> &'static str {
        "\
Setup Instructions:

1. AI Foundry Setup:
   - Create an Azure AI Foundry project: https://ai.azure.com
   - Deploy a model (recommended: gpt-4o-mini for cost efficiency)
   - Set environment variable: AZURE_AI_FOUNDRY_ENDPOINT=<your-project-endpoint>
   - Set environment variable: AZURE_AI_MODEL_DEPLOYMENT_NAME=<your-model-deployment-name>

2. Weather data needs no credentials; Open-Meteo is keyless.

Environment variables can also be placed in a .env file in the project
root (local development only).
"
    }
}
