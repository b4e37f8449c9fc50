//! Formatted terminal output.
//!
//! We keep formatting code in one place so output changes are localized and the
//! CLI handlers stay focused on dispatch.

use crate::domain::{
    FleetRecord, InductionRow, MaintenancePrediction, PlanSource, WeightConfig, WeightField,
};

/// Format the weight configuration sent (or that would be sent) to the planner.
pub fn format_weights(weights: &WeightConfig) -> String {
    let mut out = String::new();
    out.push_str("Objective weights:\n");
    for field in WeightField::ALL {
        out.push_str(&format!("  {:<22} {:.2}\n", field.label(), weights.weight(field)));
    }
    out.push_str(&format!("  {:<22} {}\n", "Required Capacity", weights.capacity));
    out
}

/// Format the fleet snapshot with its derived risk level.
pub fn format_fleet_table(records: &[FleetRecord]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<8} {:>9} {:>21} {:>12} {:<15} {:<10}",
            "train_id", "mileage", "certificate_days_left", "failure_prob", "cleaning_status", "Risk Level"
        ),
    );
    push_row(
        &mut out,
        format!("{:-<8} {:-<9} {:-<21} {:-<12} {:-<15} {:-<10}", "", "", "", "", "", ""),
    );

    for r in records {
        push_row(
            &mut out,
            format!(
                "{:<8} {:>9} {:>21} {:>12} {:<15} {:<10}",
                truncate(&r.train_id, 8),
                r.mileage,
                r.certificate_days_left,
                r.failure_prob,
                r.cleaning_status.as_str(),
                r.risk_level().label(),
            ),
        );
    }
    out
}

/// Format the induction plan as `Train | Reason`.
pub fn format_plan_table(rows: &[InductionRow], source: &PlanSource) -> String {
    let mut out = String::new();
    out.push_str(&format!("Smart Induction Plan (source: {})\n", source.display_name()));

    let width = rows
        .iter()
        .map(|r| r.train_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("Train".len());

    push_row(&mut out, format!("{:<width$} Reason", "Train"));
    push_row(&mut out, format!("{:-<width$} {:-<6}", "", ""));
    for r in rows {
        push_row(&mut out, format!("{:<width$} {}", r.train_id, r.reason));
    }
    if rows.is_empty() {
        out.push_str("(no trains selected)\n");
    }
    out
}

/// Format the maintenance drill-down header for one train.
pub fn format_drill_down(prediction: &MaintenancePrediction) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Failure Probability (next 7 days) for {}: {}\n",
        prediction.train_id,
        prediction.failure_prob_label()
    ));
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
