//! Weather service port
//!
//! Defines the interface for current-conditions retrieval.

use async_trait::async_trait;
use domain::{GeoCoordinates, WeatherObservation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather service operations
///
/// The implementation owns one reusable network session; `close`
/// releases it and is called by the orchestrator exactly once when a
/// pipeline run concludes.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch current conditions for a location
    async fn fetch_current(
        &self,
        coordinates: &GeoCoordinates,
    ) -> Result<WeatherObservation, ApplicationError>;

    /// Release the underlying network session
    ///
    /// Subsequent fetches fail; a second close is a no-op.
    async fn close(&self);

    /// Check if the weather service is available
    async fn is_available(&self) -> bool;
}
