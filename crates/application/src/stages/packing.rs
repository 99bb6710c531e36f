//! Packing stage - produces the final narrative recommendation
//!
//! Terminal, unstructured stage: the model response is prose for a
//! human reader and is not run through the contract layer.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{PackingContext, WeatherInfo};
use tracing::{debug, instrument};

use super::{PipelineContext, PipelineStage};
use crate::ports::InferencePort;

/// System prompt for the recommendation call
const PACKING_SYSTEM_PROMPT: &str = "You are a professional travel packing consultant with \
    extensive experience. Create comprehensive, practical packing lists tailored to specific \
    destinations, weather, and trip types. Be detailed, organized, and helpful in your \
    recommendations.";

/// Generates the packing narrative from the aggregated context
///
/// On model failure it degrades to a deterministic narrative assembled
/// from the context, so the pipeline always ends with a report.
pub struct PackingStage {
    inference: Arc<dyn InferencePort>,
}

impl PackingStage {
    /// Create the stage over an inference port
    #[must_use]
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self { inference }
    }

    fn prompt(context: &PackingContext) -> String {
        format!(
            "Create a comprehensive packing list for:\n\
             - Destination: {}\n\
             - Duration: {} days\n\
             - Travel type: {}\n\
             - Weather info: {}\n\
             - Weather notes: {}\n\n\
             Provide a detailed packing list organized by categories:\n\
             1. Clothing (considering weather and trip type)\n\
             2. Essential items (documents, electronics, etc.)\n\
             3. Weather-specific gear\n\
             4. Travel type specific items\n\
             5. Optional items for comfort/convenience\n\n\
             Format as a clear, organized list with explanations where helpful.\n\
             Make it practical and personalized for this specific trip.",
            context.destination.destination,
            context.destination.duration_days,
            context.destination.travel_type,
            context.weather.weather_summary,
            context.notes_line()
        )
    }

    /// Deterministic narrative used when the model call fails
    fn basic_narrative(context: &PackingContext) -> String {
        let mut lines = vec![
            format!(
                "Pack clothing for {} days of {} travel to {}.",
                context.destination.duration_days,
                context.destination.travel_type,
                context.destination.destination
            ),
            format!("Expected conditions: {}.", context.weather.weather_summary),
            "Bring travel documents, chargers, and any medication you need.".to_string(),
        ];
        lines.extend(
            context
                .weather
                .packing_notes
                .iter()
                .map(|note| format!("- {note}")),
        );
        lines.join("\n")
    }

    /// Wrap the narrative in the final travel-planning summary block
    fn render_report(context: &PackingContext, narrative: &str) -> String {
        format!(
            "\u{1f3af} TRAVEL PLANNING SUMMARY\n\
             ==========================\n\
             \u{1f4cd} Destination: {}\n\
             \u{1f4c5} Duration: {} days\n\
             \u{1f3ad} Travel Type: {}\n\
             \u{1f321}\u{fe0f}  Weather: {}\n\n\
             \u{1f392} PACKING RECOMMENDATIONS\n\
             ==========================\n\
             {narrative}\n\n\
             \u{2708}\u{fe0f} Have a wonderful trip!",
            context.destination.destination,
            context.destination.duration_days,
            context.destination.travel_type,
            context.weather.weather_summary
        )
    }
}

#[async_trait]
impl PipelineStage for PackingStage {
    fn name(&self) -> &'static str {
        "packing"
    }

    #[instrument(skip(self, ctx), fields(run_id = %ctx.run_id))]
    async fn apply(&self, mut ctx: PipelineContext) -> PipelineContext {
        let context = PackingContext::new(
            ctx.destination.clone().unwrap_or_default(),
            ctx.weather.clone().unwrap_or_else(WeatherInfo::fallback),
        );

        let prompt = Self::prompt(&context);
        let narrative = match self
            .inference
            .generate_with_system(PACKING_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(result) => result.content,
            Err(e) => {
                ctx.warn(self.name(), format!("model call failed: {e}"));
                Self::basic_narrative(&context)
            },
        };

        debug!(run_id = %ctx.run_id, chars = narrative.len(), "Packing recommendations generated");
        ctx.report = Some(Self::render_report(&context, &narrative));
        ctx
    }
}
