//! Input/output helpers.
//!
//! - plan snapshot export to JSON (`export`)

pub mod export;

pub use export::*;
