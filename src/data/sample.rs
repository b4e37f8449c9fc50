//! Built-in sample data.
//!
//! This is the only place the static fleet snapshot lives. The fleet table, the
//! maintenance drill-down and the fallback plan are all derived from it.

use std::collections::BTreeMap;

use crate::domain::{
    CleaningStatus, FleetRecord, MaintenancePrediction, NamedValue, PlanResponse,
};

/// Train IDs offered by the drill-down selector, in display order.
pub const TRAIN_IDS: [&str; 3] = ["T12", "T15", "T19"];

struct TrainSample {
    train_id: &'static str,
    mileage: u32,
    certificate_days_left: u32,
    failure_prob: f64,
    cleaning_status: CleaningStatus,
    days_since_last_service: f64,
    rolling_mileage_30d: f64,
    fault_count_30d: f64,
}

const SAMPLES: [TrainSample; 3] = [
    TrainSample {
        train_id: "T12",
        mileage: 124_500,
        certificate_days_left: 120,
        failure_prob: 0.03,
        cleaning_status: CleaningStatus::Clean,
        days_since_last_service: 12.0,
        rolling_mileage_30d: 5000.0,
        fault_count_30d: 0.0,
    },
    TrainSample {
        train_id: "T15",
        mileage: 132_000,
        certificate_days_left: 15,
        failure_prob: 0.12,
        cleaning_status: CleaningStatus::Due,
        days_since_last_service: 30.0,
        rolling_mileage_30d: 6500.0,
        fault_count_30d: 2.0,
    },
    TrainSample {
        train_id: "T19",
        mileage: 110_400,
        certificate_days_left: 250,
        failure_prob: 0.07,
        cleaning_status: CleaningStatus::Clean,
        days_since_last_service: 18.0,
        rolling_mileage_30d: 4200.0,
        fault_count_30d: 1.0,
    },
];

/// The static fleet snapshot.
pub fn fleet() -> Vec<FleetRecord> {
    SAMPLES
        .iter()
        .map(|s| FleetRecord {
            train_id: s.train_id.to_string(),
            mileage: s.mileage,
            certificate_days_left: s.certificate_days_left,
            failure_prob: s.failure_prob,
            cleaning_status: s.cleaning_status,
        })
        .collect()
}

/// Static maintenance predictions for every sample train.
#[cfg(test)]
pub fn predictions() -> Vec<MaintenancePrediction> {
    SAMPLES.iter().map(prediction_from_sample).collect()
}

/// Static maintenance prediction for `train_id`, if it is a sample train.
pub fn prediction_for(train_id: &str) -> Option<MaintenancePrediction> {
    SAMPLES
        .iter()
        .find(|s| s.train_id == train_id)
        .map(prediction_from_sample)
}

fn prediction_from_sample(s: &TrainSample) -> MaintenancePrediction {
    MaintenancePrediction {
        train_id: s.train_id.to_string(),
        failure_prob: s.failure_prob,
        features: vec![
            NamedValue::new("days_since_last_service", s.days_since_last_service),
            NamedValue::new("rolling_mileage_30d", s.rolling_mileage_30d),
            NamedValue::new("fault_count_30d", s.fault_count_30d),
        ],
    }
}

/// Plan shown whenever generation was not triggered on this render pass.
pub fn fallback_plan() -> PlanResponse {
    let reasons = BTreeMap::from([
        (
            "T12".to_string(),
            "Low risk, valid certificate, minimal shunting".to_string(),
        ),
        (
            "T15".to_string(),
            "Medium risk but branding requirement".to_string(),
        ),
        ("T19".to_string(), "Balanced mileage".to_string()),
    ]);

    PlanResponse {
        selected: vec!["T12".to_string(), "T15".to_string(), "T19".to_string()],
        reasons,
        kpis: vec![
            NamedValue::new("failure_risk_avg", 0.05),
            NamedValue::new("shunting_time", 120.0),
            NamedValue::new("branding_coverage", 0.9),
            NamedValue::new("capacity_achieved", 12.0),
        ],
    }
}
