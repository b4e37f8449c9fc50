//! Command-line parsing for the induction planning dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! rendering and API code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CAPACITY_MAX, CAPACITY_MIN, WEIGHT_MAX, WEIGHT_MIN, WeightConfig};
use crate::graph::DEFAULT_LAYOUT_SEED;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Train induction planning dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Print the induction plan and its KPIs (fallback plan unless --generate).
    Plan(PlanArgs),
    /// Print the fleet status table with risk levels.
    Fleet,
    /// Print the maintenance drill-down for one train.
    Drill(DrillArgs),
    /// Print the depot diagram.
    Depot(DepotArgs),
}

#[derive(Debug, Args, Clone)]
pub struct EndpointArgs {
    /// Planning endpoint (overrides PLANNER_API_URL).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Initial seed for the depot layout.
    #[arg(long, default_value_t = DEFAULT_LAYOUT_SEED)]
    pub seed: u64,
}

/// Objective weights and capacity, with the dashboard's defaults.
#[derive(Debug, Args, Clone)]
pub struct WeightArgs {
    /// Safety (failure risk) weight, w1.
    #[arg(long, default_value_t = 0.6, value_parser = parse_weight)]
    pub safety: f64,

    /// Shunting cost weight, w2.
    #[arg(long, default_value_t = 0.2, value_parser = parse_weight)]
    pub shunting: f64,

    /// Branding weight, w3.
    #[arg(long, default_value_t = 0.1, value_parser = parse_weight)]
    pub branding: f64,

    /// Mileage balance weight, w4.
    #[arg(long, default_value_t = 0.1, value_parser = parse_weight)]
    pub mileage_balance: f64,

    /// Required capacity (number of trains).
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(CAPACITY_MIN as i64..=CAPACITY_MAX as i64))]
    pub capacity: u32,
}

impl WeightArgs {
    pub fn to_config(&self) -> WeightConfig {
        WeightConfig {
            safety: self.safety,
            shunting: self.shunting,
            branding: self.branding,
            mileage_balance: self.mileage_balance,
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct PlanArgs {
    /// Send the weights to the planning API instead of showing the fallback plan.
    #[arg(short = 'g', long)]
    pub generate: bool,

    #[command(flatten)]
    pub weights: WeightArgs,

    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Export the plan snapshot to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// KPI bar width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DrillArgs {
    /// Train to inspect (T12, T15, T19).
    #[arg(short = 't', long)]
    pub train: String,

    /// Fetch the prediction from the planning API instead of the built-in data.
    #[arg(long)]
    pub live: bool,

    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Feature bar width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DepotArgs {
    /// Layout seed.
    #[arg(long, default_value_t = DEFAULT_LAYOUT_SEED)]
    pub seed: u64,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

fn parse_weight(raw: &str) -> Result<f64, String> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("'{raw}' is not a number: {e}"))?;
    if !(WEIGHT_MIN..=WEIGHT_MAX).contains(&v) {
        return Err(format!("weight must be within {WEIGHT_MIN:.1}..={WEIGHT_MAX:.1}"));
    }
    Ok(v)
}
