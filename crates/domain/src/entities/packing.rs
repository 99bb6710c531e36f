//! Packing context aggregate

use serde::{Deserialize, Serialize};

use super::{DestinationInfo, WeatherInfo};

/// Everything the recommendation step needs, assembled once and never
/// mutated afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingContext {
    /// Extracted trip attributes
    pub destination: DestinationInfo,
    /// Resolved or fallback weather assessment
    pub weather: WeatherInfo,
}

impl PackingContext {
    /// Assemble the aggregate from the two stage outputs
    #[must_use]
    pub const fn new(destination: DestinationInfo, weather: WeatherInfo) -> Self {
        Self {
            destination,
            weather,
        }
    }

    /// Joined packing notes for prompt embedding
    #[must_use]
    pub fn notes_line(&self) -> String {
        self.weather.packing_notes.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> PackingContext {
        PackingContext::new(
            DestinationInfo::new("Lisbon", 5, "beach vacation"),
            WeatherInfo::new(
                "Mild and sunny",
                vec!["Sunscreen".to_string(), "Light jacket".to_string()],
            ),
        )
    }

    #[test]
    fn context_holds_both_parts() {
        let context = sample_context();
        assert_eq!(context.destination.destination, "Lisbon");
        assert_eq!(context.weather.weather_summary, "Mild and sunny");
    }

    #[test]
    fn notes_line_joins_in_order() {
        let context = sample_context();
        assert_eq!(context.notes_line(), "Sunscreen, Light jacket");
    }

    #[test]
    fn notes_line_empty_when_no_notes() {
        let context = PackingContext::new(DestinationInfo::default(), WeatherInfo::new("Dry", vec![]));
        assert_eq!(context.notes_line(), "");
    }

    #[test]
    fn context_serialization() {
        let context = sample_context();
        let json = serde_json::to_string(&context).expect("serialize");
        let parsed: PackingContext = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, context);
    }
}
