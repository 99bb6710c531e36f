//! Weather adapter - Implements WeatherPort using integration_weather

use application::error::ApplicationError;
use application::ports::WeatherPort;
use async_trait::async_trait;
use domain::{GeoCoordinates, WeatherObservation};
use integration_weather::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
use tracing::{debug, info, instrument};

/// Adapter for weather retrieval using the Open-Meteo API
pub struct OpenMeteoWeatherAdapter {
    client: OpenMeteoClient,
}

impl std::fmt::Debug for OpenMeteoWeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenMeteoWeatherAdapter")
            .field("client", &self.client)
            .finish()
    }
}

impl OpenMeteoWeatherAdapter {
    /// Create a new adapter with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: OpenMeteoClient::with_defaults(),
        }
    }

    /// Create with custom configuration
    #[must_use]
    pub const fn with_config(config: WeatherConfig) -> Self {
        Self {
            client: OpenMeteoClient::new(config),
        }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => ApplicationError::Internal(e),
            WeatherError::InvalidCoordinates => {
                ApplicationError::ExternalService("Invalid coordinates".into())
            },
            WeatherError::RateLimitExceeded => {
                ApplicationError::ExternalService("Weather service rate limited".into())
            },
            WeatherError::SessionClosed => {
                ApplicationError::Internal("Weather session already closed".into())
            },
        }
    }
}

impl Default for OpenMeteoWeatherAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherPort for OpenMeteoWeatherAdapter {
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    async fn fetch_current(
        &self,
        coordinates: &GeoCoordinates,
    ) -> Result<WeatherObservation, ApplicationError> {
        let current = self
            .client
            .get_current(coordinates.latitude(), coordinates.longitude())
            .await
            .map_err(Self::map_error)?;

        info!(
            temperature_c = current.temperature,
            wind_kph = current.wind_speed,
            condition = %current.condition,
            "Weather data by Open-Meteo.com"
        );

        Ok(WeatherObservation::new(
            current.temperature,
            current.wind_speed,
            current.condition.description(),
        ))
    }

    #[instrument(skip(self))]
    async fn close(&self) {
        debug!("Releasing weather session");
        self.client.close().await;
    }

    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
