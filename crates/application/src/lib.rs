//! Application layer - Pipeline stages and orchestration
//!
//! Contains the JSON contract layer for model output, the port definitions
//! implemented by infrastructure adapters, and the three-stage packing
//! pipeline with its orchestrating service.

pub mod contract;
pub mod error;
pub mod ports;
pub mod services;
pub mod stages;

pub use contract::{ContractError, ValidationResult, extract_json, load_validated, parse_payload, validate_keys};
pub use error::ApplicationError;
pub use ports::*;
pub use services::PackingPlannerService;
pub use stages::{DestinationStage, PackingStage, PipelineContext, PipelineStage, WeatherStage};
