//! Nurikabe Exact-Cover Model Compiler
//!
//! This library turns Nurikabe instances into generalized exact-cover models
//! for a dancing-links solver, pruning the rows with a reachability analysis
//! of every island.

pub mod config;
pub mod cover;
pub mod error;
pub mod nurikabe;
pub mod reach;
pub mod utils;

pub use config::Settings;
pub use cover::{Model, ModelEncoder};
pub use nurikabe::Puzzle;

use anyhow::Result;

/// Main entry point: compile an instance into the rendered wire format
pub fn compile_model(puzzle: Puzzle, settings: Settings) -> Result<String> {
    let encoder = ModelEncoder::new(puzzle, settings)?;
    let (model, _) = encoder.encode()?;
    Ok(model.render())
}
