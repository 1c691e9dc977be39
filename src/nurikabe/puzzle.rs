//! Island definitions and instance validation

use super::grid::{Cell, Grid, MAX_SIDE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Islands are addressed by their position in the input, `0..n`.
pub type IslandId = usize;

/// Island codes in item names are single characters, `a..z` then `A..Z`.
pub const MAX_ISLANDS: usize = 52;

/// Tree depths are spelled with two letters of the same alphabet, which keeps
/// `u<g><cell><d>` within the solver's eight-character names.
pub const MAX_ISLAND_SIZE: usize = MAX_ISLANDS * MAX_ISLANDS;

/// Reasons an instance is rejected before any analysis runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("grid dimensions {height}x{width} must lie between 1 and {max} on each side")]
    Dimensions { height: usize, width: usize, max: usize },

    #[error("{count} islands given, at most {max} are supported")]
    TooManyIslands { count: usize, max: usize },

    #[error("island {island} has its seed {seed} outside the {height}x{width} grid")]
    SeedOutOfBounds { island: IslandId, seed: Cell, height: usize, width: usize },

    #[error("island {island} has size zero")]
    EmptyIsland { island: IslandId },

    #[error("island {island} has size {size}, at most {max} is supported")]
    IslandTooLarge { island: IslandId, size: usize, max: usize },

    #[error("islands {first} and {second} share the seed {seed}")]
    OverlappingSeeds { first: IslandId, second: IslandId, seed: Cell },

    #[error("island sizes add up to {total}, more than the {cells} cells of the grid")]
    Oversubscribed { total: usize, cells: usize },
}

/// A numbered clue: the seed cell and the exact size of its region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Island {
    pub seed: Cell,
    pub size: usize,
}

impl Island {
    pub fn new(row: usize, col: usize, size: usize) -> Self {
        Self { seed: Cell::new(row, col), size }
    }
}

/// A validated Nurikabe instance; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    grid: Grid,
    islands: Vec<Island>,
}

impl Puzzle {
    /// Validate the instance and build it
    pub fn new(grid: Grid, islands: Vec<Island>) -> Result<Self, InstanceError> {
        if grid.height == 0 || grid.width == 0 || grid.height > MAX_SIDE || grid.width > MAX_SIDE {
            return Err(InstanceError::Dimensions {
                height: grid.height,
                width: grid.width,
                max: MAX_SIDE,
            });
        }

        if islands.len() > MAX_ISLANDS {
            return Err(InstanceError::TooManyIslands {
                count: islands.len(),
                max: MAX_ISLANDS,
            });
        }

        let mut seeds: HashMap<Cell, IslandId> = HashMap::new();
        for (id, island) in islands.iter().enumerate() {
            if !grid.contains(island.seed) {
                return Err(InstanceError::SeedOutOfBounds {
                    island: id,
                    seed: island.seed,
                    height: grid.height,
                    width: grid.width,
                });
            }
            if island.size == 0 {
                return Err(InstanceError::EmptyIsland { island: id });
            }
            // Sizes beyond the grid are reported as oversubscription below
            if island.size > MAX_ISLAND_SIZE && island.size <= grid.len() {
                return Err(InstanceError::IslandTooLarge {
                    island: id,
                    size: island.size,
                    max: MAX_ISLAND_SIZE,
                });
            }
            if let Some(&first) = seeds.get(&island.seed) {
                return Err(InstanceError::OverlappingSeeds {
                    first,
                    second: id,
                    seed: island.seed,
                });
            }
            seeds.insert(island.seed, id);
        }

        // Sizes come straight from the input; a saturated sum still exceeds the grid
        let total = islands
            .iter()
            .fold(0usize, |total, island| total.saturating_add(island.size));
        if total > grid.len() {
            return Err(InstanceError::Oversubscribed {
                total,
                cells: grid.len(),
            });
        }

        Ok(Self { grid, islands })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    pub fn island(&self, id: IslandId) -> &Island {
        &self.islands[id]
    }

    pub fn island_ids(&self) -> std::ops::Range<IslandId> {
        0..self.islands.len()
    }

    /// Number of cells left unclaimed by every island
    pub fn empty_size(&self) -> usize {
        self.grid.len() - self.islands.iter().map(|island| island.size).sum::<usize>()
    }

    /// The island seeded at `cell`, if any
    pub fn seed_at(&self, cell: Cell) -> Option<IslandId> {
        self.islands.iter().position(|island| island.seed == cell)
    }

    /// The largest island size, zero without islands
    pub fn largest_island(&self) -> usize {
        self.islands.iter().map(|island| island.size).max().unwrap_or(0)
    }
}
