//! Terminal plotting for the CLI subcommands.

pub mod ascii;

pub use ascii::{render_bar_chart, render_depot};
