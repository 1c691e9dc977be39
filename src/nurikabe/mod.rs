//! Nurikabe instances: geometry, islands and the input format

pub mod grid;
pub mod io;
pub mod puzzle;

pub use grid::{Cell, Grid};
pub use io::{load_puzzle_from_file, load_puzzle_from_reader, parse_puzzle, save_puzzle_to_file};
pub use puzzle::{InstanceError, Island, IslandId, Puzzle, MAX_ISLANDS, MAX_ISLAND_SIZE};
