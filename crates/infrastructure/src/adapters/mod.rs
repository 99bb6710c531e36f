//! Adapters implementing the application ports over external services

mod foundry_inference_adapter;
mod weather_adapter;

pub use foundry_inference_adapter::FoundryInferenceAdapter;
pub use weather_adapter::OpenMeteoWeatherAdapter;
