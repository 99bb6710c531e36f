//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo Weather API. Reuses a single network
//! session per client, created lazily on first fetch and released
//! explicitly by `close`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, CurrentConditions, CurrentData, WeatherCondition};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The network session was already released
    #[error("Session closed")]
    SessionClosed,
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for fetching current conditions
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current weather for a location
    async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError>;

    /// Release the underlying session; later fetches fail
    async fn close(&self);

    /// Check if the weather service is healthy
    async fn is_healthy(&self) -> bool;
}

/// Open-Meteo HTTP client implementation
///
/// The session is created on first use and dropped exactly once by
/// `close`; a second close is a no-op.
pub struct OpenMeteoClient {
    session: Mutex<Option<Client>>,
    closed: AtomicBool,
    config: WeatherConfig,
}

impl std::fmt::Debug for OpenMeteoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenMeteoClient")
            .field("base_url", &self.config.base_url)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// No session is opened until the first fetch.
    #[must_use]
    pub const fn new(config: WeatherConfig) -> Self {
        Self {
            session: Mutex::new(None),
            closed: AtomicBool::new(false),
            config,
        }
    }

    /// Create a new client with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(WeatherConfig::default())
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Get the shared session, opening it on first use
    fn session(&self) -> Result<Client, WeatherError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(WeatherError::SessionClosed);
        }

        let mut guard = self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        debug!("Opening weather session");
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Build the API URL for a current-conditions request
    fn build_current_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current={}&timezone=auto",
            self.config.base_url, latitude, longitude, "temperature_2m,wind_speed_10m,weather_code",
        )
    }

    /// Parse current conditions from the raw API block
    fn parse_current(data: &CurrentData) -> Result<CurrentConditions, WeatherError> {
        let time = Self::parse_datetime(&data.time)?;

        Ok(CurrentConditions {
            time,
            temperature: data.temperature_2m,
            wind_speed: data.wind_speed_10m,
            weather_code: data.weather_code,
            condition: WeatherCondition::from_wmo_code(data.weather_code),
        })
    }

    /// Parse datetime string to `DateTime<Utc>`
    fn parse_datetime(s: &str) -> Result<DateTime<Utc>, WeatherError> {
        // ISO 8601 without seconds (2026-02-05T14:00)
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(Utc.from_utc_datetime(&dt));
        }

        // With seconds
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Utc.from_utc_datetime(&dt));
        }

        // RFC 3339
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(WeatherError::ParseError(format!(
            "Invalid datetime format: {s}"
        )))
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let session = self.session()?;
        let url = self.build_current_url(latitude, longitude);
        debug!(url = %url, "Fetching current weather");

        let response = session.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let current = api_response.current.ok_or_else(|| {
            WeatherError::ParseError("No current weather data in response".to_string())
        })?;

        Self::parse_current(&current)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            // Already released
            return;
        }
        let mut guard = self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("Released weather session");
        }
    }

    async fn is_healthy(&self) -> bool {
        // Simple health check using Berlin coordinates
        self.get_current(52.52, 13.41).await.is_ok()
    }
}
