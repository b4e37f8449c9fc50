//! Data sources for the dashboard.
//!
//! - `planner`: blocking HTTP client for the external planning API
//! - `sample`: the built-in fleet snapshot and fallback plan

pub mod planner;
pub mod sample;

pub use planner::PlannerClient;
pub use sample::{fallback_plan, fleet, prediction_for, TRAIN_IDS};
