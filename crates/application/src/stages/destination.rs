//! Destination stage - extracts structured trip attributes

use std::sync::Arc;

use async_trait::async_trait;
use domain::DestinationInfo;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{PipelineContext, PipelineStage};
use crate::contract::load_validated;
use crate::ports::InferencePort;

/// System prompt for the destination extraction call
const DESTINATION_SYSTEM_PROMPT: &str = "You are a travel planning specialist focused on \
    destination analysis. Your job is to extract and understand travel destinations from user \
    requests. Always respond with valid JSON as requested, no additional text or formatting.";

const REQUIRED_KEYS: &[&str] = &["destination", "duration", "travel_type"];

/// Extracts `{destination, duration, travel_type}` from the raw request
///
/// This stage cannot fail: a model error or unparseable response fills
/// every field from the defaults on `DestinationInfo`.
pub struct DestinationStage {
    inference: Arc<dyn InferencePort>,
}

impl DestinationStage {
    /// Create the stage over an inference port
    #[must_use]
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self { inference }
    }

    fn prompt(request: &str) -> String {
        format!(
            "Extract the destination city from the user's travel request: \"{request}\"\n\n\
             Respond with a JSON object containing:\n\
             - \"destination\": the city name (string)\n\
             - \"duration\": estimated trip duration in days (integer, default to 7 if not specified)\n\
             - \"travel_type\": type of travel like \"business\", \"vacation\", \"adventure\" (default to \"general\")\n\n\
             Example response:\n\
             {{\"destination\": \"Paris\", \"duration\": 5, \"travel_type\": \"vacation\"}}\n\n\
             Only respond with the JSON object, no additional text."
        )
    }

    /// Coerce a JSON value into a positive day count
    fn coerce_duration(value: Option<&Value>) -> Option<u32> {
        let value = value?;
        if let Some(days) = value.as_u64() {
            return u32::try_from(days).ok().filter(|d| *d > 0);
        }
        // Models occasionally emit floats like 5.0
        if let Some(days) = value.as_f64() {
            if days.fract() == 0.0 && days > 0.0 && days <= f64::from(u32::MAX) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                return Some(days as u32);
            }
        }
        None
    }

    fn coerce_string(value: Option<&Value>) -> Option<String> {
        value
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }
}

#[async_trait]
impl PipelineStage for DestinationStage {
    fn name(&self) -> &'static str {
        "destination"
    }

    #[instrument(skip(self, ctx), fields(run_id = %ctx.run_id))]
    async fn apply(&self, mut ctx: PipelineContext) -> PipelineContext {
        let prompt = Self::prompt(ctx.request.text());

        let info = match self
            .inference
            .generate_with_system(DESTINATION_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(result) => {
                let validated = load_validated(&result.content, REQUIRED_KEYS);
                for warning in &validated.warnings {
                    ctx.warn(self.name(), warning.clone());
                }

                DestinationInfo {
                    destination: Self::coerce_string(validated.data.get("destination"))
                        .unwrap_or_else(|| DestinationInfo::DEFAULT_DESTINATION.to_string()),
                    duration_days: Self::coerce_duration(validated.data.get("duration"))
                        .unwrap_or(DestinationInfo::DEFAULT_DURATION_DAYS),
                    travel_type: Self::coerce_string(validated.data.get("travel_type"))
                        .unwrap_or_else(|| DestinationInfo::DEFAULT_TRAVEL_TYPE.to_string()),
                }
            },
            Err(e) => {
                ctx.warn(self.name(), format!("model call failed: {e}"));
                DestinationInfo::default()
            },
        };

        debug!(run_id = %ctx.run_id, trip = %info.describe(), "Extracted travel info");
        ctx.destination = Some(info);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use domain::TripRequest;

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{InferenceResult, MockInferencePort};

    fn inference_returning(content: &str) -> Arc<dyn InferencePort> {
        let content = content.to_string();
        let mut mock = MockInferencePort::new();
        mock.expect_generate_with_system().returning(move |_, _| {
            Ok(InferenceResult {
                content: content.clone(),
                model: "test".to_string(),
                tokens_used: None,
                latency_ms: 1,
            })
        });
        Arc::new(mock)
    }

    async fn run_stage(inference: Arc<dyn InferencePort>, request: &str) -> PipelineContext {
        let stage = DestinationStage::new(inference);
        let ctx = PipelineContext::new(TripRequest::new(request).expect("valid"));
        stage.apply(ctx).await
    }

    #[tokio::test]
    async fn extracts_all_fields() {
        let inference = inference_returning(
            "{\"destination\": \"Lisbon\", \"duration\": 5, \"travel_type\": \"beach vacation\"}",
        );
        let ctx = run_stage(inference, "5-day beach vacation in Lisbon").await;

        let info = ctx.destination.expect("stage output");
        assert_eq!(info.destination, "Lisbon");
        assert_eq!(info.duration_days, 5);
        assert_eq!(info.travel_type, "beach vacation");
        assert!(ctx.warnings.is_empty());
    }

    #[tokio::test]
    async fn handles_fenced_output() {
        let inference = inference_returning(
            "```json\n{\"destination\": \"Oslo\", \"duration\": 3, \"travel_type\": \"business\"}\n```",
        );
        let ctx = run_stage(inference, "short business trip to Oslo").await;
        assert_eq!(ctx.destination.expect("stage output").destination, "Oslo");
    }

    #[tokio::test]
    async fn garbage_output_fills_all_defaults() {
        let inference = inference_returning("not json at all");
        let ctx = run_stage(inference, "somewhere nice").await;

        let info = ctx.destination.expect("stage output");
        assert_eq!(info.destination, DestinationInfo::DEFAULT_DESTINATION);
        assert_eq!(info.duration_days, DestinationInfo::DEFAULT_DURATION_DAYS);
        assert_eq!(info.travel_type, DestinationInfo::DEFAULT_TRAVEL_TYPE);
        assert!(!ctx.warnings.is_empty());
    }

    #[tokio::test]
    async fn partial_output_defaults_only_gaps() {
        let inference = inference_returning("{\"destination\": \"Kyoto\"}");
        let ctx = run_stage(inference, "trip to Kyoto").await;

        let info = ctx.destination.expect("stage output");
        assert_eq!(info.destination, "Kyoto");
        assert_eq!(info.duration_days, DestinationInfo::DEFAULT_DURATION_DAYS);
        assert_eq!(info.travel_type, DestinationInfo::DEFAULT_TRAVEL_TYPE);
        assert_eq!(ctx.warnings.len(), 2);
    }

    #[tokio::test]
    async fn model_failure_is_absorbed() {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_with_system()
            .returning(|_, _| Err(ApplicationError::Inference("timeout".into())));

        let ctx = run_stage(Arc::new(mock), "anywhere").await;
        assert_eq!(
            ctx.destination.expect("stage output"),
            DestinationInfo::default()
        );
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn duration_coercion() {
        let five = serde_json::json!(5);
        let five_float = serde_json::json!(5.0);
        assert_eq!(DestinationStage::coerce_duration(Some(&five)), Some(5));
        assert_eq!(DestinationStage::coerce_duration(Some(&five_float)), Some(5));

        for junk in [
            serde_json::json!("five"),
            serde_json::json!(0),
            serde_json::json!(-3),
            serde_json::json!(2.5),
            serde_json::json!(null),
        ] {
            assert_eq!(DestinationStage::coerce_duration(Some(&junk)), None);
        }
        assert_eq!(DestinationStage::coerce_duration(None), None);
    }

    #[test]
    fn string_coercion_rejects_blank() {
        let blank = serde_json::json!("   ");
        let number = serde_json::json!(7);
        assert_eq!(DestinationStage::coerce_string(Some(&blank)), None);
        assert_eq!(DestinationStage::coerce_string(Some(&number)), None);
    }
}
