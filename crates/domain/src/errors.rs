//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinate pair outside the valid WGS84 ranges
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Trip description was empty or whitespace-only
    #[error("Trip request must not be empty")]
    EmptyTripRequest,
}

impl DomainError {
    /// Create an invalid-coordinates error for a rejected pair
    pub fn invalid_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinates(format!(
            "latitude {latitude} must be -90 to 90, longitude {longitude} must be -180 to 180"
        ))
    }
}
