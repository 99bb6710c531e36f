//! Weather data models
//!
//! Types for representing current conditions from the Open-Meteo API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition derived from WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    /// Clear sky (WMO 0)
    ClearSky,
    /// Mainly clear (WMO 1)
    MainlyClear,
    /// Partly cloudy (WMO 2)
    PartlyCloudy,
    /// Overcast (WMO 3)
    Overcast,
    /// Fog (WMO 45, 48)
    Fog,
    /// Drizzle (WMO 51, 53, 55)
    Drizzle,
    /// Freezing drizzle (WMO 56, 57)
    FreezingDrizzle,
    /// Rain (WMO 61, 63, 65)
    Rain,
    /// Freezing rain (WMO 66, 67)
    FreezingRain,
    /// Snow (WMO 71, 73, 75)
    Snow,
    /// Snow grains (WMO 77)
    SnowGrains,
    /// Rain showers (WMO 80, 81, 82)
    RainShowers,
    /// Snow showers (WMO 85, 86)
    SnowShowers,
    /// Thunderstorm (WMO 95)
    Thunderstorm,
    /// Thunderstorm with hail (WMO 96, 99)
    ThunderstormWithHail,
    /// Unknown condition
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to `WeatherCondition`
    ///
    /// See: <https://open-meteo.com/en/docs> for WMO code reference.
    /// Unrecognized codes map to `Unknown` rather than failing.
    #[must_use]
    pub const fn from_wmo_code(code: u8) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80..=82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormWithHail,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description of the weather condition
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow grains",
            Self::RainShowers => "Rain showers",
            Self::SnowShowers => "Snow showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormWithHail => "Thunderstorm with hail",
            Self::Unknown => "Unknown conditions",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Current conditions at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Observation time
    pub time: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// WMO weather code
    pub weather_code: u8,
    /// Weather condition derived from the code
    pub condition: WeatherCondition,
}

/// Raw Open-Meteo API response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub current: Option<CurrentData>,
}

/// Raw current-conditions block
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentData {
    pub time: String,
    pub temperature_2m: f64,
    pub wind_speed_10m: f64,
    pub weather_code: u8,
}
