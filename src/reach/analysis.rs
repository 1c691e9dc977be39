//! Whole-instance reachability: per-island maps, candidate sets, sea metadata

use super::distance::{DistanceMap, Span};
use super::forbidden::{seed_halos, ForbiddenMatrix};
use super::histogram::TreeHistogram;
use crate::config::{AnalysisConfig, SeaRootPolicy};
use crate::error::ModelError;
use crate::nurikabe::{Cell, Grid, Island, IslandId, Puzzle};
use rayon::prelude::*;
use serde::Serialize;

/// Who may own a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Owner {
    Island(IslandId),
    Sea,
}

/// Named cell predicates used to filter neighbourhoods during row generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Any in-grid cell
    Exists,
    /// Some island may claim the cell
    IsFilled,
    /// The cell may be sea
    IsEmpty,
    /// The given island may claim the cell
    Reaches(IslandId),
}

/// Reachability results for a single island
#[derive(Debug, Clone)]
pub struct IslandReach {
    pub id: IslandId,
    pub island: Island,
    pub forbidden: ForbiddenMatrix,
    pub distances: DistanceMap,
    pub histogram: TreeHistogram,
}

impl IslandReach {
    fn analyze(grid: Grid, id: IslandId, island: Island, forbidden: ForbiddenMatrix) -> Result<Self, ModelError> {
        let distances = DistanceMap::sweep(grid, island.seed, island.size, |cell| forbidden.contains(cell))?;
        let histogram = TreeHistogram::build(island.size, &distances);

        let reachable = distances.reachable_count();
        if reachable < island.size {
            log::warn!(
                "island {} at {} reaches only {} cells but needs {}",
                id, island.seed, reachable, island.size
            );
        } else {
            log::debug!(
                "island {} at {}: {} forbidden, {} reachable cells for size {}",
                id, island.seed, forbidden.count(), reachable, island.size
            );
        }

        Ok(Self { id, island, forbidden, distances, histogram })
    }

    pub fn span(&self, cell: Cell) -> Option<&Span> {
        self.distances.span(cell)
    }

    pub fn seed(&self) -> Cell {
        self.island.seed
    }
}

/// Where the sea's spanning tree is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeaRoot {
    /// No sea cells at all
    Absent,
    /// A provably empty cell closest to the centre
    Fixed(Cell),
    /// Any sea cell may act as the root
    Free,
}

/// Metadata of the unclaimed region
#[derive(Debug, Clone)]
pub struct SeaReach {
    pub size: usize,
    pub root: SeaRoot,
    pub levels: Option<DistanceMap>,
}

impl SeaReach {
    pub fn span(&self, cell: Cell) -> Option<&Span> {
        self.levels.as_ref().and_then(|levels| levels.span(cell))
    }
}

/// Everything row generation needs to know about an instance
#[derive(Debug, Clone)]
pub struct Analysis {
    grid: Grid,
    islands: Vec<IslandReach>,
    candidates: Vec<Vec<Owner>>,
    sea: SeaReach,
}

impl Analysis {
    pub fn new(puzzle: &Puzzle, config: &AnalysisConfig) -> Result<Self, ModelError> {
        let grid = puzzle.grid();
        let halos = seed_halos(puzzle);

        let analyze = |id: IslandId| {
            let forbidden = ForbiddenMatrix::for_island(grid, &halos, id);
            IslandReach::analyze(grid, id, *puzzle.island(id), forbidden)
        };
        let islands = if config.parallel {
            puzzle.island_ids().into_par_iter().map(analyze).collect::<Result<Vec<_>, _>>()?
        } else {
            puzzle.island_ids().map(analyze).collect::<Result<Vec<_>, _>>()?
        };

        let island_owners: Vec<Vec<Owner>> = grid
            .cells()
            .map(|cell| {
                islands
                    .iter()
                    .filter(|reach| reach.distances.contains(cell))
                    .map(|reach| Owner::Island(reach.id))
                    .collect()
            })
            .collect();

        let sea = Self::analyze_sea(puzzle, config, &island_owners)?;

        let candidates = grid
            .cells()
            .zip(island_owners)
            .map(|(cell, mut owners)| {
                if sea.span(cell).is_some() {
                    owners.push(Owner::Sea);
                }
                if owners.is_empty() {
                    log::warn!("cell {} can be neither island nor sea", cell);
                }
                owners
            })
            .collect();

        Ok(Self { grid, islands, candidates, sea })
    }

    fn analyze_sea(
        puzzle: &Puzzle,
        config: &AnalysisConfig,
        island_owners: &[Vec<Owner>],
    ) -> Result<SeaReach, ModelError> {
        let grid = puzzle.grid();
        let size = puzzle.empty_size();
        if size == 0 {
            return Ok(SeaReach { size, root: SeaRoot::Absent, levels: None });
        }

        let is_seed = |cell: Cell| puzzle.seed_at(cell).is_some();
        let fixed = match config.sea_root {
            SeaRootPolicy::Center => grid
                .cells()
                .filter(|&cell| !is_seed(cell) && island_owners[grid.index(cell)].is_empty())
                .min_by_key(|&cell| grid.centre_distance(cell)),
            SeaRootPolicy::Free => None,
        };

        let (root, levels) = match fixed {
            Some(origin) => (SeaRoot::Fixed(origin), DistanceMap::sweep(grid, origin, size, is_seed)?),
            None => {
                // Any non-seed cell may be the root, so nothing narrows the levels
                let spans = grid
                    .cells()
                    .map(|cell| {
                        (!is_seed(cell)).then_some(Span { min: 0, max: size - 1, parity: None })
                    })
                    .collect();
                (SeaRoot::Free, DistanceMap::from_spans(grid, spans))
            }
        };

        log::debug!(
            "sea of {} cells rooted at {:?}, {} cells may be sea",
            size,
            root,
            levels.reachable_count()
        );
        Ok(SeaReach { size, root, levels: Some(levels) })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn islands(&self) -> &[IslandReach] {
        &self.islands
    }

    pub fn island(&self, id: IslandId) -> &IslandReach {
        &self.islands[id]
    }

    pub fn sea(&self) -> &SeaReach {
        &self.sea
    }

    /// Cells the region of `owner` must occupy
    pub fn region_size(&self, owner: Owner) -> usize {
        match owner {
            Owner::Island(id) => self.islands[id].island.size,
            Owner::Sea => self.sea.size,
        }
    }

    /// Candidate owners of a cell, islands ascending then the sea
    pub fn candidates(&self, cell: Cell) -> &[Owner] {
        &self.candidates[self.grid.index(cell)]
    }

    /// Islands other than `except` that may claim `cell`
    pub fn rival_islands(&self, cell: Cell, except: Option<IslandId>) -> impl Iterator<Item = IslandId> + '_ {
        self.candidates(cell).iter().filter_map(move |owner| match owner {
            Owner::Island(id) if Some(*id) != except => Some(*id),
            _ => None,
        })
    }

    pub fn holds(&self, predicate: Predicate, cell: Cell) -> bool {
        match predicate {
            Predicate::Exists => self.grid.contains(cell),
            Predicate::IsFilled => self
                .candidates(cell)
                .iter()
                .any(|owner| matches!(owner, Owner::Island(_))),
            Predicate::IsEmpty => self.candidates(cell).contains(&Owner::Sea),
            Predicate::Reaches(id) => self.islands[id].distances.contains(cell),
        }
    }

    /// Orthogonal neighbours of `cell` satisfying `predicate`
    pub fn neighbours(&self, cell: Cell, predicate: Predicate) -> impl Iterator<Item = Cell> + '_ {
        self.grid
            .neighbours(cell)
            .filter(move |&next| self.holds(predicate, next))
    }

    /// The cell can only be filled
    pub fn forced_filled(&self, cell: Cell) -> bool {
        !self.holds(Predicate::IsEmpty, cell)
    }

    /// The cell can only be sea
    pub fn forced_empty(&self, cell: Cell) -> bool {
        !self.holds(Predicate::IsFilled, cell)
    }
}
