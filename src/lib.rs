//! `induction-planner` library crate.
//!
//! The binary (`planner`) is a thin wrapper around this library so that:
//!
//! - rendering and API code is testable without spawning processes
//! - the plain-text reports and the TUI share one plan pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod graph;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
