//! Export a plan snapshot to JSON.
//!
//! The snapshot records what was asked (weights + capacity), what came back
//! and where it came from, so a plan can be compared or replayed later.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::{PlanRequest, PlanResponse, PlanSource};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct PlanSnapshot<'a> {
    pub generated_at: DateTime<Local>,
    pub source: &'a str,
    pub request: &'a PlanRequest,
    pub response: &'a PlanResponse,
}

/// Write a plan snapshot as pretty JSON.
pub fn write_plan_json(
    path: &Path,
    source: &PlanSource,
    request: &PlanRequest,
    response: &PlanResponse,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create plan export '{}': {e}", path.display()))
    })?;

    let snapshot = PlanSnapshot {
        generated_at: Local::now(),
        source: source.display_name(),
        request,
        response,
    };

    serde_json::to_writer_pretty(file, &snapshot)
        .map_err(|e| AppError::input(format!("Failed to write plan export: {e}")))?;

    tracing::info!(path = %path.display(), "plan exported");
    Ok(())
}

/// Default export file name in `dir`: `induction_plan_<YYYYmmdd_HHMMSS>.json`.
pub fn default_export_path(dir: &Path) -> PathBuf {
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("induction_plan_{ts}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample;
    use crate::domain::WeightConfig;
    use tempfile::tempdir;

    #[test]
    fn writes_snapshot_with_kpi_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let request = WeightConfig::default().to_request();
        let plan = sample::fallback_plan();

        write_plan_json(&path, &PlanSource::Sample, &request, &plan).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["source"], "sample");
        assert_eq!(value["request"]["required_capacity"], 10);
        assert_eq!(value["response"]["selected"][1], "T15");
        assert!(value["generated_at"].is_string());

        let risk = text.find("failure_risk_avg").unwrap();
        let capacity = text.find("capacity_achieved").unwrap();
        assert!(risk < capacity);

        let reloaded: PlanResponse = serde_json::from_value(value["response"].clone()).unwrap();
        assert_eq!(reloaded, plan);
    }

    #[test]
    fn unwritable_path_is_an_input_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("plan.json");
        let err = write_plan_json(
            &path,
            &PlanSource::Sample,
            &WeightConfig::default().to_request(),
            &sample::fallback_plan(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn default_path_is_timestamped() {
        let path = default_export_path(Path::new("out"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("induction_plan_") && name.ends_with(".json"));
        assert_eq!(path.parent().unwrap(), Path::new("out"));
    }
}
