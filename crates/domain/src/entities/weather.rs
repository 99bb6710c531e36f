//! Weather entities

use serde::{Deserialize, Serialize};

/// A single current-conditions reading for the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Air temperature in degrees Celsius
    pub temperature_c: f64,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// Human-readable condition, e.g. "partly cloudy"
    pub condition: String,
}

impl WeatherObservation {
    /// Create a new observation
    #[must_use]
    pub fn new(temperature_c: f64, wind_kph: f64, condition: impl Into<String>) -> Self {
        Self {
            temperature_c,
            wind_kph,
            condition: condition.into(),
        }
    }

    /// Compact one-line summary used in prompts and logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:.1}°C, wind {:.1} km/h, {}",
            self.temperature_c, self.wind_kph, self.condition
        )
    }
}

/// Travel-oriented weather assessment for the destination
///
/// Always present after the weather stage: either derived from a live
/// observation plus model analysis, or the deterministic fallback below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInfo {
    /// Short description of expected conditions
    pub weather_summary: String,
    /// Weather-driven packing suggestions, in priority order
    pub packing_notes: Vec<String>,
}

impl WeatherInfo {
    /// Summary used whenever live weather data could not be resolved
    pub const FALLBACK_SUMMARY: &'static str = "Weather data unavailable; pack versatile layers";

    /// Create weather info from analysis output
    #[must_use]
    pub fn new(weather_summary: impl Into<String>, packing_notes: Vec<String>) -> Self {
        Self {
            weather_summary: weather_summary.into(),
            packing_notes,
        }
    }

    /// The fixed substitute used when geocoding, the forecast fetch, or
    /// the analysis fails — identical regardless of which step failed
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            weather_summary: Self::FALLBACK_SUMMARY.to_string(),
            packing_notes: vec![
                "Pack for variable weather conditions".to_string(),
                "Layer clothing appropriately".to_string(),
                "Consider wind-resistant outerwear".to_string(),
            ],
        }
    }

    /// Whether this is the generic fallback rather than live analysis
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.weather_summary == Self::FALLBACK_SUMMARY
    }
}
