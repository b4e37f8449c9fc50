//! Domain types shared by the TUI, the CLI reports and the API client.
//!
//! This module defines:
//!
//! - the objective weights and the planning request (`WeightConfig`, `PlanRequest`)
//! - the planner's response (`PlanResponse`, `InductionRow`)
//! - fleet and maintenance view models (`FleetRecord`, `RiskLevel`, `MaintenancePrediction`)

pub mod types;

pub use types::*;
