//! Pipeline stages
//!
//! The packing pipeline is an ordered list of stages folded over a
//! shared context. Every stage is total: failures inside a stage are
//! absorbed into defaults or fallbacks and recorded as warnings, so the
//! fold itself never branches on errors.

mod destination;
mod packing;
mod weather;

use async_trait::async_trait;
use domain::{DestinationInfo, TripRequest, WeatherInfo};
use tracing::warn;
use uuid::Uuid;

pub use destination::DestinationStage;
pub use packing::PackingStage;
pub use weather::WeatherStage;

/// Context threaded through the stage fold
///
/// Each stage fills in exactly one output slot; nothing is mutated after
/// it has been produced.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Correlation id for one pipeline run
    pub run_id: Uuid,
    /// The raw travel description, immutable for the whole run
    pub request: TripRequest,
    /// Output of the destination stage
    pub destination: Option<DestinationInfo>,
    /// Output of the weather stage
    pub weather: Option<WeatherInfo>,
    /// Final human-readable report from the packing stage
    pub report: Option<String>,
    /// Advisory warnings collected across all stages
    pub warnings: Vec<String>,
}

impl PipelineContext {
    /// Create a fresh context for one run
    #[must_use]
    pub fn new(request: TripRequest) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            request,
            destination: None,
            weather: None,
            report: None,
            warnings: Vec::new(),
        }
    }

    /// Record a stage warning and log it
    pub fn warn(&mut self, stage: &str, message: impl Into<String>) {
        let message = message.into();
        warn!(run_id = %self.run_id, stage, warning = %message, "Pipeline warning");
        self.warnings.push(format!("{stage}: {message}"));
    }
}

/// A single transform step in the pipeline
///
/// `apply` is total by contract: it must return a context on every
/// input, converting internal failures into warnings plus defaults.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Stage name used for logging and warning prefixes
    fn name(&self) -> &'static str;

    /// Transform the context, filling in this stage's output slot
    async fn apply(&self, ctx: PipelineContext) -> PipelineContext;
}
