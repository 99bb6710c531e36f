//! Application services - Use case implementations

mod packing_planner;

pub use packing_planner::PackingPlannerService;
