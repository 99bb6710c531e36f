//! Packing planner service - orchestrates the three-stage pipeline

use std::sync::Arc;

use domain::TripRequest;
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::{InferencePort, WeatherPort};
use crate::stages::{DestinationStage, PackingStage, PipelineContext, PipelineStage, WeatherStage};

/// Orchestrator for one packing-recommendation pipeline run
///
/// Holds the stage order as data and folds the context through it.
/// Stages are total, so the fold has a single exit path; the shared
/// weather session is released there, exactly once per run.
pub struct PackingPlannerService {
    stages: Vec<Box<dyn PipelineStage>>,
    weather: Arc<dyn WeatherPort>,
}

impl std::fmt::Debug for PackingPlannerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackingPlannerService")
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}

impl PackingPlannerService {
    /// Wire the pipeline over the two ports
    #[must_use]
    pub fn new(inference: Arc<dyn InferencePort>, weather: Arc<dyn WeatherPort>) -> Self {
        let stages: Vec<Box<dyn PipelineStage>> = vec![
            Box::new(DestinationStage::new(Arc::clone(&inference))),
            Box::new(WeatherStage::new(
                Arc::clone(&inference),
                Arc::clone(&weather),
            )),
            Box::new(PackingStage::new(inference)),
        ];
        Self { stages, weather }
    }

    /// Run the full pipeline for one trip request
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Internal` only if the terminal stage
    /// produced no report, which the stage contract rules out.
    #[instrument(skip(self, request), fields(request_len = request.text().len()))]
    pub async fn run(&self, request: TripRequest) -> Result<String, ApplicationError> {
        let mut ctx = PipelineContext::new(request);
        info!(run_id = %ctx.run_id, "Starting packing pipeline");

        for stage in &self.stages {
            info!(run_id = %ctx.run_id, stage = stage.name(), "Running pipeline stage");
            ctx = stage.apply(ctx).await;
        }

        // Single exit path after the fold; stages never raise past it
        self.weather.close().await;

        info!(
            run_id = %ctx.run_id,
            warnings = ctx.warnings.len(),
            "Pipeline complete"
        );

        ctx.report
            .ok_or_else(|| ApplicationError::Internal("pipeline produced no report".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{InferenceResult, MockInferencePort, MockWeatherPort};
    use domain::WeatherObservation;

    const DESTINATION_JSON: &str =
        "{\"destination\": \"Lisbon\", \"duration\": 5, \"travel_type\": \"beach vacation\"}";
    const GEO_JSON: &str = "{\"latitude\": 38.7223, \"longitude\": -9.1393, \"precision_km\": 5}";
    const ANALYSIS_JSON: &str = "{\"weather_summary\": \"Warm and sunny\", \
        \"packing_notes\": [\"Sunscreen\", \"Light layers\"]}";
    const NARRATIVE: &str = "Pack swimwear, sandals, a sun hat and light layers.";

    /// Scripted inference answering the four pipeline calls in order
    fn scripted_inference() -> Arc<dyn InferencePort> {
        let mut mock = MockInferencePort::new();
        let mut calls = 0u32;
        mock.expect_generate_with_system().returning(move |_, _| {
            calls += 1;
            let content = match calls {
                1 => DESTINATION_JSON,
                2 => GEO_JSON,
                3 => ANALYSIS_JSON,
                _ => NARRATIVE,
            };
            Ok(InferenceResult {
                content: content.to_string(),
                model: "test".to_string(),
                tokens_used: None,
                latency_ms: 1,
            })
        });
        Arc::new(mock)
    }

    /// Inference that fails every call
    fn broken_inference() -> Arc<dyn InferencePort> {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_with_system()
            .returning(|_, _| Err(ApplicationError::Inference("model unreachable".into())));
        Arc::new(mock)
    }

    fn request() -> TripRequest {
        TripRequest::new("5-day beach vacation in Lisbon").expect("valid")
    }

    #[tokio::test]
    async fn end_to_end_lisbon() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .times(1)
            .returning(|_| Ok(WeatherObservation::new(24.0, 10.0, "Clear sky")));
        weather.expect_close().times(1).return_const(());

        let service = PackingPlannerService::new(scripted_inference(), Arc::new(weather));
        let report = service.run(request()).await.expect("report");

        assert!(report.contains("Lisbon"));
        assert!(report.contains("5 days"));
        assert!(report.contains("Warm and sunny"));
        assert!(report.contains("sun hat"));
    }

    #[tokio::test]
    async fn network_outage_still_produces_report() {
        // Forecast service unreachable: geocode succeeds, fetch fails
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .returning(|_| Err(ApplicationError::ExternalService("connection refused".into())));
        weather.expect_close().times(1).return_const(());

        let service = PackingPlannerService::new(scripted_inference(), Arc::new(weather));
        let report = service.run(request()).await.expect("report");

        assert!(report.contains("Weather data unavailable"));
        assert!(report.contains("versatile layers"));
    }

    #[tokio::test]
    async fn every_model_call_failing_still_produces_report() {
        let mut weather = MockWeatherPort::new();
        weather.expect_close().times(1).return_const(());

        let service = PackingPlannerService::new(broken_inference(), Arc::new(weather));
        let report = service.run(request()).await.expect("report");

        // Degraded output beats no output
        assert!(report.contains("TRAVEL PLANNING SUMMARY"));
        assert!(report.contains("versatile layers"));
    }

    #[tokio::test]
    async fn session_released_exactly_once_on_success() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .returning(|_| Ok(WeatherObservation::new(10.0, 20.0, "Rain")));
        weather.expect_close().times(1).return_const(());

        let service = PackingPlannerService::new(scripted_inference(), Arc::new(weather));
        service.run(request()).await.expect("report");
        // times(1) on close is checked when the mock drops
    }

    #[tokio::test]
    async fn session_released_exactly_once_on_injected_failure() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_fetch_current()
            .returning(|_| Err(ApplicationError::ExternalService("injected".into())));
        weather.expect_close().times(1).return_const(());

        let service = PackingPlannerService::new(broken_inference(), Arc::new(weather));
        service.run(request()).await.expect("report");
    }

    #[test]
    fn debug_impl_names_stage_count() {
        let weather = MockWeatherPort::new();
        let service = PackingPlannerService::new(broken_inference(), Arc::new(weather));
        let debug = format!("{service:?}");
        assert!(debug.contains("PackingPlannerService"));
        assert!(debug.contains('3'));
    }
}
