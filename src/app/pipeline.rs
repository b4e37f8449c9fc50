//! Shared "plan pipeline" used by both the CLI and the TUI front-ends.
//!
//! One render pass resolves its plan exactly once:
//! trigger? -> POST weights -> decode -> pair reasons; otherwise the fallback plan.
//!
//! The front-ends then only deal with presentation (printing vs widgets).

use crate::data::{PlannerClient, fallback_plan};
use crate::domain::{InductionRow, PlanRequest, PlanResponse, PlanSource, WeightConfig};
use crate::error::AppError;

/// Everything a render pass needs to show the plan views.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub source: PlanSource,
    pub request: PlanRequest,
    pub response: PlanResponse,
    pub rows: Vec<InductionRow>,
}

/// Resolve the plan for one render pass.
///
/// With `generate` set this performs one blocking POST and propagates any
/// failure; otherwise it returns the fallback plan without touching the network.
pub fn resolve_plan(
    weights: &WeightConfig,
    generate: bool,
    client: &PlannerClient,
) -> Result<PlanOutcome, AppError> {
    let request = weights.to_request();
    if !generate {
        return sample_outcome(request);
    }

    let response = client.request_plan(&request)?;
    let rows = response.induction_rows()?;
    Ok(PlanOutcome {
        source: PlanSource::Live {
            endpoint: client.endpoint().to_string(),
        },
        request,
        response,
        rows,
    })
}

/// The fallback plan for a render pass without a trigger.
pub fn sample_outcome(request: PlanRequest) -> Result<PlanOutcome, AppError> {
    let response = fallback_plan();
    let rows = response.induction_rows()?;
    Ok(PlanOutcome {
        source: PlanSource::Sample,
        request,
        response,
        rows,
    })
}
