//! Internal invariant violations raised while building a model

use thiserror::Error;

/// A programming error detected during analysis or row generation.
///
/// These never describe a bad instance (see [`crate::nurikabe::InstanceError`]);
/// they abort compilation rather than let an incorrect row reach the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("internal error: min and max sweeps from {origin} disagree at {cell}")]
    SweepMismatch { origin: String, cell: String },

    #[error("internal error: item {item} is given both colors {first} and {second} in one row")]
    ConflictingColor { item: String, first: String, second: String },

    #[error("internal error: color {color} does not fit item {item}")]
    ColorKind { item: String, color: String },

    #[error("internal error: level {level} exceeds the palette limit {limit}")]
    LevelOutOfRange { level: usize, limit: usize },

    #[error("internal error: cell {cell} lies outside the grid")]
    CellOutOfGrid { cell: String },

    #[error("internal error: row without a primary item: {0}")]
    NoPrimary(String),
}
