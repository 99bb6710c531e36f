//! Domain entities - Request-scoped pipeline data
//!
//! All entities are transient: produced once during a single pipeline run,
//! threaded forward, and never persisted.

mod packing;
mod trip;
mod weather;

pub use packing::PackingContext;
pub use trip::{DestinationInfo, TripRequest};
pub use weather::{WeatherInfo, WeatherObservation};
