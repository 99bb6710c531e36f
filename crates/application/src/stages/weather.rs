//! Weather stage - geocode, fetch, analyze
//!
//! Runs a small state machine: `Geocoding -> Fetching -> Analyzing ->
//! Done`, with an early exit to `Fallback -> Done` from any failing
//! state. The fallback content is identical regardless of which state
//! failed.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{GeoCoordinates, WeatherInfo, WeatherObservation};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{PipelineContext, PipelineStage};
use crate::contract::load_validated;
use crate::ports::{InferencePort, WeatherPort};

/// System prompt shared by the geocoding and analysis calls
const WEATHER_SYSTEM_PROMPT: &str = "You are a weather analysis expert for travel planning. \
    Analyze weather conditions and provide practical insights for travelers. Always respond \
    with valid JSON as requested, no additional text or formatting.";

const GEOCODE_KEYS: &[&str] = &["latitude", "longitude"];
const ANALYSIS_KEYS: &[&str] = &["weather_summary", "packing_notes"];

/// States of the weather resolution machine
enum WeatherState {
    Geocoding,
    Fetching(GeoCoordinates),
    Analyzing(GeoCoordinates, WeatherObservation),
    Fallback,
    Done(WeatherInfo),
}

/// Resolves destination weather into a `WeatherInfo`
///
/// Never raises past its boundary: every failure path resolves to the
/// deterministic fallback from `WeatherInfo::fallback`.
pub struct WeatherStage {
    inference: Arc<dyn InferencePort>,
    weather: Arc<dyn WeatherPort>,
}

impl WeatherStage {
    /// Create the stage over the inference and weather ports
    #[must_use]
    pub fn new(inference: Arc<dyn InferencePort>, weather: Arc<dyn WeatherPort>) -> Self {
        Self { inference, weather }
    }

    fn geocode_prompt(destination: &str) -> String {
        format!(
            "Provide geographic coordinates for the city \"{destination}\".\n\
             Respond ONLY with JSON containing:\n\
             {{\"latitude\": <decimal>, \"longitude\": <decimal>, \"precision_km\": <approximate precision in km>}}\n\
             Do not include explanations."
        )
    }

    fn analysis_prompt(destination: &str, coordinates: &GeoCoordinates, observation: &WeatherObservation) -> String {
        format!(
            "Analyze travel weather for {destination} at coordinates ({coordinates}):\n\
             - Temperature: {:.1}\u{b0}C\n\
             - Wind speed: {:.1} km/h\n\
             - Conditions: {}\n\n\
             Provide packing insights considering:\n\
             1. Thermal comfort and layering\n\
             2. Wind conditions and protective gear\n\
             3. Any seasonal context typical for this location\n\n\
             Respond with JSON:\n\
             {{\"weather_summary\": \"short description\", \"packing_notes\": [\"item1\", \"item2\", \"item3\"]}}",
            observation.temperature_c, observation.wind_kph, observation.condition
        )
    }

    /// Geocode the destination via the model
    async fn geocode(&self, destination: &str, ctx: &mut PipelineContext) -> WeatherState {
        let prompt = Self::geocode_prompt(destination);
        let response = match self
            .inference
            .generate_with_system(WEATHER_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(result) => result.content,
            Err(e) => {
                ctx.warn(self.name(), format!("geocoding call failed: {e}"));
                return WeatherState::Fallback;
            },
        };

        let validated = load_validated(&response, GEOCODE_KEYS);
        for warning in &validated.warnings {
            ctx.warn(self.name(), warning.clone());
        }

        let latitude = validated.data.get("latitude").and_then(Value::as_f64);
        let longitude = validated.data.get("longitude").and_then(Value::as_f64);
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            ctx.warn(self.name(), "could not resolve numeric coordinates");
            return WeatherState::Fallback;
        };

        match GeoCoordinates::new(latitude, longitude) {
            Ok(mut coordinates) => {
                // Informational only; never gates the fetch
                if let Some(precision) = validated.data.get("precision_km").and_then(Value::as_f64) {
                    coordinates = coordinates.with_precision_km(precision);
                }
                debug!(
                    run_id = %ctx.run_id,
                    coordinates = %coordinates,
                    precision_km = ?coordinates.precision_km(),
                    "Resolved coordinates"
                );
                WeatherState::Fetching(coordinates)
            },
            Err(e) => {
                ctx.warn(self.name(), e.to_string());
                WeatherState::Fallback
            },
        }
    }

    /// Fetch current conditions through the weather port
    async fn fetch(&self, coordinates: GeoCoordinates, ctx: &mut PipelineContext) -> WeatherState {
        match self.weather.fetch_current(&coordinates).await {
            Ok(observation) => {
                debug!(run_id = %ctx.run_id, conditions = %observation.summary(), "Fetched current weather");
                WeatherState::Analyzing(coordinates, observation)
            },
            Err(e) => {
                ctx.warn(self.name(), format!("weather fetch failed: {e}"));
                WeatherState::Fallback
            },
        }
    }

    /// Turn the observation into travel advice via the model
    ///
    /// Partial credit: a present, non-empty `weather_summary` is used
    /// even when `packing_notes` is missing or malformed.
    async fn analyze(
        &self,
        destination: &str,
        coordinates: &GeoCoordinates,
        observation: &WeatherObservation,
        ctx: &mut PipelineContext,
    ) -> WeatherState {
        let prompt = Self::analysis_prompt(destination, coordinates, observation);
        let response = match self
            .inference
            .generate_with_system(WEATHER_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(result) => result.content,
            Err(e) => {
                ctx.warn(self.name(), format!("analysis call failed: {e}"));
                return WeatherState::Fallback;
            },
        };

        let validated = load_validated(&response, ANALYSIS_KEYS);
        for warning in &validated.warnings {
            ctx.warn(self.name(), warning.clone());
        }

        let summary = validated
            .data
            .get("weather_summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        summary.map_or(WeatherState::Fallback, |summary| {
            let notes = validated
                .data
                .get("packing_notes")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default();
            WeatherState::Done(WeatherInfo::new(summary, notes))
        })
    }
}

#[async_trait]
impl PipelineStage for WeatherStage {
    fn name(&self) -> &'static str {
        "weather"
    }

    #[instrument(skip(self, ctx), fields(run_id = %ctx.run_id))]
    async fn apply(&self, mut ctx: PipelineContext) -> PipelineContext {
        let destination = ctx.destination.clone().unwrap_or_default().destination;

        let mut state = WeatherState::Geocoding;
        let info = loop {
            state = match state {
                WeatherState::Geocoding => self.geocode(&destination, &mut ctx).await,
                WeatherState::Fetching(coordinates) => self.fetch(coordinates, &mut ctx).await,
                WeatherState::Analyzing(coordinates, observation) => {
                    self.analyze(&destination, &coordinates, &observation, &mut ctx)
                        .await
                },
                WeatherState::Fallback => WeatherState::Done(WeatherInfo::fallback()),
                WeatherState::Done(info) => break info,
            };
        };

        debug!(run_id = %ctx.run_id, summary = %info.weather_summary, "Weather stage complete");
        ctx.weather = Some(info);
        ctx
    }
}
