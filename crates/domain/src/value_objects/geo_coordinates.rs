//! Geographic coordinates value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A geocoded position with an optional precision estimate
///
/// The precision is informational only: it describes how exact the
/// geocoding was considered to be and never gates any decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
    /// Approximate geocoding precision in kilometers, if reported
    precision_km: Option<f64>,
}

impl GeoCoordinates {
    /// Create new coordinates with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in
    /// [-90, 90] or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::invalid_coordinates(latitude, longitude));
        }
        Ok(Self {
            latitude,
            longitude,
            precision_km: None,
        })
    }

    /// Create coordinates without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            precision_km: None,
        }
    }

    /// Attach the reported geocoding precision
    #[must_use]
    pub const fn with_precision_km(mut self, precision_km: f64) -> Self {
        self.precision_km = Some(precision_km);
        self
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get the geocoding precision in kilometers, if reported
    #[must_use]
    pub const fn precision_km(&self) -> Option<f64> {
        self.precision_km
    }
}

impl fmt::Display for GeoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Common locations for probes and tests
impl GeoCoordinates {
    /// Berlin, Germany
    #[must_use]
    pub const fn berlin() -> Self {
        Self::new_unchecked(52.52, 13.405)
    }

    /// Lisbon, Portugal
    #[must_use]
    pub const fn lisbon() -> Self {
        Self::new_unchecked(38.7223, -9.1393)
    }
}
