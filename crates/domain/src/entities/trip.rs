//! Trip request and destination entities

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A raw free-text travel description, as entered by the traveler
///
/// Immutable for the lifetime of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    text: String,
}

impl TripRequest {
    /// Create a new trip request from free text
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyTripRequest` if the text is empty or
    /// whitespace-only
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyTripRequest);
        }
        Ok(Self { text })
    }

    /// Get the raw description text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TripRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Structured trip attributes extracted from a `TripRequest`
///
/// All three fields are always populated: extraction gaps are filled
/// from the defaults below, so downstream stages never see a hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationInfo {
    /// Destination city or region
    pub destination: String,
    /// Trip duration in days
    pub duration_days: u32,
    /// Travel category such as "business", "vacation", "adventure"
    pub travel_type: String,
}

impl DestinationInfo {
    /// Placeholder used when no destination could be extracted
    pub const DEFAULT_DESTINATION: &'static str = "Unknown";
    /// Duration assumed when the request does not state one
    pub const DEFAULT_DURATION_DAYS: u32 = 7;
    /// Travel category assumed when the request does not state one
    pub const DEFAULT_TRAVEL_TYPE: &'static str = "general";

    /// Create destination info with explicit values
    #[must_use]
    pub fn new(
        destination: impl Into<String>,
        duration_days: u32,
        travel_type: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            duration_days,
            travel_type: travel_type.into(),
        }
    }

    /// One-line description used in progress output and prompts
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{}-day {} trip to {}",
            self.duration_days, self.travel_type, self.destination
        )
    }
}

impl Default for DestinationInfo {
    fn default() -> Self {
        Self {
            destination: Self::DEFAULT_DESTINATION.to_string(),
            duration_days: Self::DEFAULT_DURATION_DAYS,
            travel_type: Self::DEFAULT_TRAVEL_TYPE.to_string(),
        }
    }
}
