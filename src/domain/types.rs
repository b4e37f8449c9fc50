//! Shared view-model types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - sent to / decoded from the planning API
//! - rendered by the TUI and the plain-text reports
//! - exported to JSON

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Default planning endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/plan";

pub const WEIGHT_MIN: f64 = 0.0;
pub const WEIGHT_MAX: f64 = 1.0;
pub const CAPACITY_MIN: u32 = 5;
pub const CAPACITY_MAX: u32 = 20;

/// Fine slider step, matching a float slider's default resolution.
pub const WEIGHT_STEP: f64 = 0.01;
pub const WEIGHT_STEP_COARSE: f64 = 0.1;

/// One of the four objective weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightField {
    Safety,
    Shunting,
    Branding,
    MileageBalance,
}

impl WeightField {
    pub const ALL: [WeightField; 4] = [
        WeightField::Safety,
        WeightField::Shunting,
        WeightField::Branding,
        WeightField::MileageBalance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeightField::Safety => "Safety (Failure Risk)",
            WeightField::Shunting => "Shunting Cost",
            WeightField::Branding => "Branding",
            WeightField::MileageBalance => "Mileage Balance",
        }
    }
}

/// User-adjustable objective weights plus the required capacity.
///
/// Recreated from widget state on every render pass; the only invariants are
/// the slider ranges (`[0.0, 1.0]` for weights, `[5, 20]` for capacity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    pub safety: f64,
    pub shunting: f64,
    pub branding: f64,
    pub mileage_balance: f64,
    pub capacity: u32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            safety: 0.6,
            shunting: 0.2,
            branding: 0.1,
            mileage_balance: 0.1,
            capacity: 10,
        }
    }
}

impl WeightConfig {
    pub fn weight(&self, field: WeightField) -> f64 {
        match field {
            WeightField::Safety => self.safety,
            WeightField::Shunting => self.shunting,
            WeightField::Branding => self.branding,
            WeightField::MileageBalance => self.mileage_balance,
        }
    }

    /// Set a weight, clamped to the slider range and rounded to two decimals.
    pub fn set_weight(&mut self, field: WeightField, value: f64) {
        let value = round_hundredths(value.clamp(WEIGHT_MIN, WEIGHT_MAX));
        match field {
            WeightField::Safety => self.safety = value,
            WeightField::Shunting => self.shunting = value,
            WeightField::Branding => self.branding = value,
            WeightField::MileageBalance => self.mileage_balance = value,
        }
    }

    pub fn adjust_weight(&mut self, field: WeightField, delta: f64) {
        self.set_weight(field, self.weight(field) + delta);
    }

    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity.clamp(CAPACITY_MIN, CAPACITY_MAX);
    }

    pub fn adjust_capacity(&mut self, delta: i32) {
        let next = (self.capacity as i64 + delta as i64)
            .clamp(CAPACITY_MIN as i64, CAPACITY_MAX as i64);
        self.capacity = next as u32;
    }

    /// Build the wire request for the current widget values.
    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            required_capacity: self.capacity,
            weights: Weights {
                w1: self.safety,
                w2: self.shunting,
                w3: self.branding,
                w4: self.mileage_balance,
            },
        }
    }
}

fn round_hundredths(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Wire weights: `w1` safety, `w2` shunting, `w3` branding, `w4` mileage balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub w1: f64,
    pub w2: f64,
    pub w3: f64,
    pub w4: f64,
}

/// Body of `POST {endpoint}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub required_capacity: u32,
    pub weights: Weights,
}

/// A named numeric value (a KPI or a feature contribution).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The planner's answer: selected trains, per-train reasons and KPIs.
///
/// KPIs keep the key order of the JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub selected: Vec<String>,
    pub reasons: BTreeMap<String, String>,
    #[serde(with = "ordered_values")]
    pub kpis: Vec<NamedValue>,
}

/// One row of the induction plan table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InductionRow {
    pub train_id: String,
    pub reason: String,
}

impl PlanResponse {
    /// Pair every selected train with its reason, in selection order.
    ///
    /// A selected train without a reason is an error, never a blank row.
    pub fn induction_rows(&self) -> Result<Vec<InductionRow>, AppError> {
        self.selected
            .iter()
            .map(|train_id| {
                let reason = self.reasons.get(train_id).ok_or_else(|| {
                    AppError::runtime(format!(
                        "Plan response has no reason for selected train '{train_id}'."
                    ))
                })?;
                Ok(InductionRow {
                    train_id: train_id.clone(),
                    reason: reason.clone(),
                })
            })
            .collect()
    }
}

/// Where the displayed plan came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Sample,
    Live { endpoint: String },
}

impl PlanSource {
    pub fn display_name(&self) -> &str {
        match self {
            PlanSource::Sample => "sample",
            PlanSource::Live { endpoint } => endpoint,
        }
    }
}

/// Depot cleaning status of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningStatus {
    Clean,
    Due,
}

impl CleaningStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CleaningStatus::Clean => "clean",
            CleaningStatus::Due => "due",
        }
    }
}

/// Failure-risk band derived from a failure probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Half-open bands: `[.., 0.05)` Low, `[0.05, 0.10)` Medium, otherwise High.
    pub fn from_probability(prob: f64) -> Self {
        if prob < 0.05 {
            RiskLevel::Low
        } else if prob < 0.10 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Static per-train fleet snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetRecord {
    pub train_id: String,
    pub mileage: u32,
    pub certificate_days_left: u32,
    pub failure_prob: f64,
    pub cleaning_status: CleaningStatus,
}

impl FleetRecord {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(self.failure_prob)
    }
}

/// Failure probability plus SHAP-style feature contributions for one train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    #[serde(default, skip_serializing)]
    pub train_id: String,
    pub failure_prob: f64,
    #[serde(rename = "shap_top_features", with = "ordered_values")]
    pub features: Vec<NamedValue>,
}

impl MaintenancePrediction {
    pub fn failure_prob_label(&self) -> String {
        format_percent(self.failure_prob)
    }
}

/// Format a probability as a percentage with one decimal (`0.12` → `12.0%`).
pub fn format_percent(prob: f64) -> String {
    format!("{:.1}%", prob * 100.0)
}

/// Format a value the way it appears in the source data (`120`, `0.05`).
pub fn format_literal(value: f64) -> String {
    format!("{value}")
}

/// (De)serialize `Vec<NamedValue>` as a JSON object, keeping document order.
mod ordered_values {
    use super::*;

    pub fn serialize<S>(values: &[NamedValue], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(values.len()))?;
        for v in values {
            map.serialize_entry(&v.name, &v.value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NamedValue>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedVisitor)
    }

    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<NamedValue>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of name -> number")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, value)) = access.next_entry::<String, f64>()? {
                out.push(NamedValue { name, value });
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_sliders() {
        let w = WeightConfig::default();
        assert_eq!(w.safety, 0.6);
        assert_eq!(w.shunting, 0.2);
        assert_eq!(w.branding, 0.1);
        assert_eq!(w.mileage_balance, 0.1);
        assert_eq!(w.capacity, 10);
    }

    #[test]
    fn adjustments_clamp_and_do_not_drift() {
        let mut w = WeightConfig::default();
        for _ in 0..100 {
            w.adjust_weight(WeightField::Safety, WEIGHT_STEP);
        }
        assert_eq!(w.safety, 1.0);

        for _ in 0..3 {
            w.adjust_weight(WeightField::Branding, -WEIGHT_STEP);
        }
        assert_eq!(w.branding, 0.07);

        w.adjust_weight(WeightField::Shunting, -5.0);
        assert_eq!(w.shunting, 0.0);

        w.adjust_capacity(50);
        assert_eq!(w.capacity, CAPACITY_MAX);
        w.adjust_capacity(-50);
        assert_eq!(w.capacity, CAPACITY_MIN);
    }

    #[test]
    fn request_serializes_wire_shape() {
        let req = WeightConfig::default().to_request();
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "required_capacity": 10,
                "weights": {"w1": 0.6, "w2": 0.2, "w3": 0.1, "w4": 0.1}
            })
        );
    }

    #[test]
    fn risk_bands_are_half_open() {
        assert_eq!(RiskLevel::from_probability(0.03), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.07), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.12), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.05), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.10), RiskLevel::High);
    }

    #[test]
    fn response_keeps_kpi_document_order() {
        let body = r#"{
            "selected": ["A1"],
            "reasons": {"A1": "ok"},
            "kpis": {"zeta": 1, "alpha": 0.5, "mid": 3}
        }"#;
        let plan: PlanResponse = serde_json::from_str(body).unwrap();
        let names: Vec<&str> = plan.kpis.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);

        let round = serde_json::to_string(&plan).unwrap();
        assert!(round.find("zeta").unwrap() < round.find("alpha").unwrap());
    }

    #[test]
    fn response_missing_key_fails_to_decode() {
        let body = r#"{"selected": [], "reasons": {}}"#;
        assert!(serde_json::from_str::<PlanResponse>(body).is_err());

        let body = r#"{"selected": [], "reasons": {}, "kpis": {"x": "high"}}"#;
        assert!(serde_json::from_str::<PlanResponse>(body).is_err());
    }

    #[test]
    fn selected_train_without_reason_is_an_error() {
        let plan = PlanResponse {
            selected: vec!["T1".into(), "T2".into()],
            reasons: BTreeMap::from([("T1".to_string(), "fine".to_string())]),
            kpis: Vec::new(),
        };
        let err = plan.induction_rows().unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
        assert!(err.message().contains("T2"));
    }

    #[test]
    fn percent_and_literal_formatting() {
        assert_eq!(format_percent(0.12), "12.0%");
        assert_eq!(format_percent(0.03), "3.0%");
        assert_eq!(format_literal(120.0), "120");
        assert_eq!(format_literal(0.05), "0.05");
    }
}
