//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads settings and starts file logging
//! - dispatches to the TUI or to one of the plain-text reports

use clap::Parser;

use crate::cli::{Command, DepotArgs, DrillArgs, PlanArgs, TuiArgs};
use crate::config::Settings;
use crate::data::{PlannerClient, TRAIN_IDS};
use crate::error::AppError;
use crate::graph::{DepotGraph, spring_layout};

pub mod pipeline;

/// Entry point for the `planner` binary.
pub fn run() -> Result<(), AppError> {
    // `planner` and `planner --endpoint URL` behave like `planner tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Plan(args) => handle_plan(args),
        Command::Fleet => handle_fleet(),
        Command::Drill(args) => handle_drill(args),
        Command::Depot(args) => handle_depot(args),
    }
}

/// Load settings and start logging; logging problems only warn.
fn init(endpoint_override: Option<&str>) -> Result<Settings, AppError> {
    let settings = Settings::from_env(endpoint_override)?;
    if let Err(err) = crate::logging::init(&settings.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    tracing::info!(endpoint = %settings.endpoint, "settings loaded");
    Ok(settings)
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let settings = init(args.endpoint.endpoint.as_deref())?;
    let client = PlannerClient::new(settings.endpoint)?;
    crate::tui::run(client, args.seed)
}

fn handle_plan(args: PlanArgs) -> Result<(), AppError> {
    let settings = init(args.endpoint.endpoint.as_deref())?;
    let client = PlannerClient::new(settings.endpoint)?;
    let weights = args.weights.to_config();

    let outcome = pipeline::resolve_plan(&weights, args.generate, &client)?;

    println!("{}", crate::report::format_weights(&weights));
    println!("{}", crate::report::format_plan_table(&outcome.rows, &outcome.source));
    println!(
        "{}",
        crate::plot::render_bar_chart("KPI Dashboard", &outcome.response.kpis, args.width)
    );

    if let Some(path) = &args.export {
        crate::io::write_plan_json(path, &outcome.source, &outcome.request, &outcome.response)?;
        println!("Exported plan to {}", path.display());
    }
    Ok(())
}

fn handle_fleet() -> Result<(), AppError> {
    init(None)?;
    println!("Fleet Dashboard");
    println!("{}", crate::report::format_fleet_table(&crate::data::fleet()));
    Ok(())
}

fn handle_drill(args: DrillArgs) -> Result<(), AppError> {
    let settings = init(args.endpoint.endpoint.as_deref())?;

    let prediction = if args.live {
        PlannerClient::new(settings.endpoint)?.fetch_prediction(&args.train)?
    } else {
        crate::data::prediction_for(&args.train).ok_or_else(|| {
            AppError::input(format!(
                "Unknown train '{}'. Choose one of: {}.",
                args.train,
                TRAIN_IDS.join(", ")
            ))
        })?
    };

    print!("{}", crate::report::format_drill_down(&prediction));
    println!(
        "{}",
        crate::plot::render_bar_chart("Feature contributions", &prediction.features, args.width)
    );
    Ok(())
}

fn handle_depot(args: DepotArgs) -> Result<(), AppError> {
    init(None)?;
    let graph = DepotGraph::toy();
    let layout = spring_layout(&graph, args.seed);

    println!("Depot Simulator (seed {})", args.seed);
    for (name, (x, y)) in graph.nodes.iter().zip(layout.points()) {
        println!("  {name:<8} ({x:>6.3}, {y:>6.3})");
    }
    for &(a, b) in &graph.edges {
        println!("  {} -- {}", graph.nodes[a], graph.nodes[b]);
    }
    println!();
    print!("{}", crate::plot::render_depot(&graph, &layout, args.width, args.height));
    Ok(())
}

/// Rewrite argv so `planner` defaults to `planner tui`.
///
/// Rules:
/// - `planner`                      -> `planner tui`
/// - `planner --endpoint URL ...`   -> `planner tui --endpoint URL ...`
/// - `planner --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "plan" | "fleet" | "drill" | "depot"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
