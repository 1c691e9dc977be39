//! Option generation: every row family of the exact-cover model

use super::color::Color;
use super::item::{Item, Row, Slot};
use crate::config::EncodingConfig;
use crate::nurikabe::{Cell, IslandId};
use crate::reach::{Analysis, IslandReach, Owner, Predicate, SeaRoot};
use itertools::{iproduct, Itertools};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

/// The kinds of rows the model is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Seed,
    Tail,
    Empty,
    SeaTree,
    Square,
    Adjacency,
    Dimensions,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Seed => "seed",
            Family::Tail => "tail",
            Family::Empty => "empty cell",
            Family::SeaTree => "sea tree",
            Family::Square => "anti-pool",
            Family::Adjacency => "adjacency",
            Family::Dimensions => "dimension",
        };
        f.write_str(name)
    }
}

/// Rows of one family, before normalization
#[derive(Debug, Clone)]
pub struct RowBatch {
    pub family: Family,
    pub rows: Vec<Row>,
}

/// The secondary color recording who owns a cell
pub fn owner_color(owner: Owner) -> Color {
    match owner {
        Owner::Island(id) => Color::Island(id),
        Owner::Sea => Color::Off,
    }
}

/// Same-owner adjacent pairs a connected region of `size` cells can have.
///
/// At least a spanning tree; at most `2n - ceil(2 sqrt n)`, reached by the
/// most compact polyomino.
pub fn edge_bounds(size: usize) -> (usize, usize) {
    let mut perimeter = 0;
    while perimeter * perimeter < 4 * size {
        perimeter += 1;
    }
    (size.saturating_sub(1), (2 * size).saturating_sub(perimeter))
}

/// Generates the rows of the model from a finished analysis
pub struct OptionCompiler<'a> {
    analysis: &'a Analysis,
    encoding: EncodingConfig,
    parallel: bool,
}

impl<'a> OptionCompiler<'a> {
    pub fn new(analysis: &'a Analysis, encoding: EncodingConfig, parallel: bool) -> Self {
        Self { analysis, encoding, parallel }
    }

    /// Generate every row family
    pub fn compile_all(&self) -> Vec<RowBatch> {
        let mut batches = vec![
            RowBatch { family: Family::Seed, rows: self.seed_rows() },
            RowBatch { family: Family::Tail, rows: self.tail_rows() },
        ];

        if self.analysis.sea().root != SeaRoot::Absent {
            batches.push(RowBatch { family: Family::Empty, rows: self.empty_rows() });
            batches.push(RowBatch { family: Family::SeaTree, rows: self.sea_tree_rows() });
        }

        batches.push(RowBatch { family: Family::Square, rows: self.square_rows() });
        batches.push(RowBatch { family: Family::Adjacency, rows: self.adjacency_rows() });
        batches.push(RowBatch { family: Family::Dimensions, rows: self.dimension_rows() });

        for batch in &batches {
            log::debug!("generated {} {} rows", batch.rows.len(), batch.family);
        }
        batches
    }

    /// Primary items that must be in the header even if no row covers them
    pub fn required_items(&self) -> Vec<Item> {
        let grid = self.analysis.grid();
        let mut items: Vec<Item> = grid.cells().map(Item::Site).collect();

        for reach in self.analysis.islands() {
            items.push(Item::Island(reach.id));
            if self.encoding.layer_hints {
                items.extend(
                    (0..reach.island.size)
                        .filter(|&depth| reach.histogram.bounds(depth).0 > 0)
                        .map(|depth| Item::Layer(reach.id, depth)),
                );
            }
            if self.encoding.edge_hints && reach.island.size > 1 {
                items.push(Item::Edges(Owner::Island(reach.id)));
            }
        }

        let sea = self.analysis.sea();
        if sea.root != SeaRoot::Absent {
            items.push(Item::Sea);
            if self.encoding.edge_hints && sea.size > 1 {
                items.push(Item::Edges(Owner::Sea));
            }
        }
        if sea.root == SeaRoot::Free {
            items.push(Item::SeaRoot);
        }

        items.extend(grid.squares().map(Item::Square));
        items.extend(grid.cells().filter(|&cell| grid.right(cell).is_some()).map(Item::Horizontal));
        items.extend(grid.cells().filter(|&cell| grid.below(cell).is_some()).map(Item::Vertical));
        items.push(Item::Height(grid.height));
        items.push(Item::Width(grid.width));
        items
    }

    /// `t<g>:0` for every island other than `except` that may claim `cell`
    fn rule_out_rivals(&self, cell: Cell, except: Option<IslandId>) -> Vec<(Slot, Color)> {
        self.analysis
            .rival_islands(cell, except)
            .map(|other| (Slot::Depth(other, cell), Color::Off))
            .collect()
    }

    /// One row per island placing its seed at depth zero
    pub fn seed_rows(&self) -> Vec<Row> {
        self.analysis
            .islands()
            .iter()
            .map(|reach| {
                let seed = reach.seed();
                Row::new()
                    .cover(Item::Site(seed))
                    .cover(Item::Island(reach.id))
                    .cover_if(self.encoding.layer_hints, Item::Layer(reach.id, 0))
                    .assign(Slot::Filled(seed), Color::On)
                    .assign(Slot::Owner(seed), owner_color(Owner::Island(reach.id)))
                    .assign(Slot::Depth(reach.id, seed), Color::Level(0))
                    .assign_all(self.rule_out_rivals(seed, Some(reach.id)))
            })
            .collect()
    }

    /// Parent-selection rows of every island
    pub fn tail_rows(&self) -> Vec<Row> {
        let islands = self.analysis.islands();
        if self.parallel {
            islands
                .par_iter()
                .flat_map_iter(|reach| self.island_tail_rows(reach))
                .collect()
        } else {
            islands
                .iter()
                .flat_map(|reach| self.island_tail_rows(reach))
                .collect()
        }
    }

    fn island_tail_rows(&self, reach: &IslandReach) -> Vec<Row> {
        let id = reach.id;
        let mut rows = Vec::new();

        for (cell, span) in reach.distances.iter() {
            if cell == reach.seed() {
                continue;
            }
            let rivals = self.rule_out_rivals(cell, Some(id));

            for depth in span.depths().filter(|&depth| depth > 0) {
                let parents: Vec<Cell> = self
                    .analysis
                    .neighbours(cell, Predicate::Reaches(id))
                    .filter(|&next| reach.span(next).is_some_and(|next| next.admits(depth - 1)))
                    .collect();

                for &parent in &parents {
                    let mut row = Row::new()
                        .cover(Item::Site(cell))
                        .cover(Item::Island(id))
                        .cover_if(self.encoding.layer_hints, Item::Layer(id, depth))
                        .assign(Slot::Filled(cell), Color::On)
                        .assign(Slot::Owner(cell), owner_color(Owner::Island(id)))
                        .assign(Slot::Depth(id, cell), Color::Level(depth))
                        .assign(Slot::Depth(id, parent), Color::Level(depth - 1))
                        .assign_all(rivals.iter().copied());

                    if self.encoding.exclusive_parents {
                        // The seed is the only cell at depth zero
                        let others = parents
                            .iter()
                            .filter(|&&other| other != parent && depth > 1)
                            .map(|&other| (Slot::DepthFlag(id, other, depth - 1), Color::Off));
                        row = row
                            .assign(Slot::DepthFlag(id, cell, depth), Color::On)
                            .assign_all(others);
                    }
                    rows.push(row);
                }
            }
        }

        if rows.is_empty() && reach.island.size > 1 {
            log::warn!("island {} has no room to grow beyond its seed", id);
        }
        rows
    }

    /// One "this cell is sea" row per cell that may be empty
    pub fn empty_rows(&self) -> Vec<Row> {
        let grid = self.analysis.grid();
        grid.cells()
            .filter(|&cell| self.analysis.holds(Predicate::IsEmpty, cell))
            .map(|cell| {
                Row::new()
                    .cover(Item::Site(cell))
                    .assign(Slot::Filled(cell), Color::Off)
                    .assign(Slot::Owner(cell), owner_color(Owner::Sea))
                    .assign_all(self.rule_out_rivals(cell, None))
            })
            .collect()
    }

    /// Root and parent-selection rows of the sea's spanning tree
    pub fn sea_tree_rows(&self) -> Vec<Row> {
        let sea = self.analysis.sea();
        let Some(levels) = sea.levels.as_ref() else {
            return Vec::new();
        };
        let free_root = sea.root == SeaRoot::Free;
        let mut rows = Vec::new();

        for (cell, span) in levels.iter() {
            let base = || {
                Row::new()
                    .cover(Item::SeaSite(cell))
                    .cover(Item::Sea)
                    .assign(Slot::Filled(cell), Color::Off)
            };

            if span.admits(0) {
                rows.push(
                    base()
                        .cover_if(free_root, Item::SeaRoot)
                        .assign(Slot::SeaLevel(cell), Color::Level(0)),
                );
            }

            for level in span.depths().filter(|&level| level > 0) {
                let parents: Vec<Cell> = self
                    .analysis
                    .neighbours(cell, Predicate::IsEmpty)
                    .filter(|&next| sea.span(next).is_some_and(|next| next.admits(level - 1)))
                    .collect();

                for &parent in &parents {
                    let mut row = base()
                        .assign(Slot::SeaLevel(cell), Color::Level(level))
                        .assign(Slot::Filled(parent), Color::Off)
                        .assign(Slot::SeaLevel(parent), Color::Level(level - 1));

                    if self.encoding.exclusive_parents {
                        // Only the root sits at level zero
                        let others = parents
                            .iter()
                            .filter(|&&other| other != parent && level > 1)
                            .map(|&other| (Slot::SeaFlag(other, level - 1), Color::Off));
                        row = row
                            .assign(Slot::SeaFlag(cell, level), Color::On)
                            .assign_all(others);
                    }
                    rows.push(row);
                }
            }
        }

        rows
    }

    /// Fill patterns of every 2x2 block, except the all-sea pool
    pub fn square_rows(&self) -> Vec<Row> {
        let grid = self.analysis.grid();
        let mut rows = Vec::new();

        for corner in grid.squares() {
            let block = [
                corner,
                Cell::new(corner.row, corner.col + 1),
                Cell::new(corner.row + 1, corner.col),
                Cell::new(corner.row + 1, corner.col + 1),
            ];

            let choices = block.iter().map(|&cell| {
                let mut colors = Vec::with_capacity(2);
                if self.analysis.holds(Predicate::IsEmpty, cell) {
                    colors.push(Color::Off);
                }
                if self.analysis.holds(Predicate::IsFilled, cell) {
                    colors.push(Color::On);
                }
                colors
            });

            for pattern in choices.multi_cartesian_product() {
                if pattern.iter().all(|&color| color == Color::Off) {
                    continue;
                }
                rows.push(
                    Row::new().cover(Item::Square(corner)).assign_all(
                        block
                            .iter()
                            .zip(pattern)
                            .map(|(&cell, color)| (Slot::Filled(cell), color)),
                    ),
                );
            }
        }

        rows
    }

    /// The single row recording the grid size, so every solution carries it
    pub fn dimension_rows(&self) -> Vec<Row> {
        let grid = self.analysis.grid();
        vec![Row::new().cover(Item::Height(grid.height)).cover(Item::Width(grid.width))]
    }

    /// Owner combinations of every adjacent pair; distinct islands never touch
    pub fn adjacency_rows(&self) -> Vec<Row> {
        let grid = self.analysis.grid();
        let mut rows = Vec::new();

        for cell in grid.cells() {
            let pairs = [
                (grid.right(cell), Item::Horizontal(cell)),
                (grid.below(cell), Item::Vertical(cell)),
            ];
            for (next, item) in pairs {
                let Some(next) = next else { continue };

                let owners = iproduct!(
                    self.analysis.candidates(cell).iter().copied(),
                    self.analysis.candidates(next).iter().copied()
                );
                for (first, second) in owners {
                    let same = first == second;
                    if !same && first != Owner::Sea && second != Owner::Sea {
                        continue;
                    }
                    if same && edge_bounds(self.analysis.region_size(first)).1 == 0 {
                        continue;
                    }

                    rows.push(
                        Row::new()
                            .cover(item)
                            .cover_if(same && self.encoding.edge_hints, Item::Edges(first))
                            .assign(Slot::Owner(cell), owner_color(first))
                            .assign(Slot::Owner(next), owner_color(second)),
                    );
                }
            }
        }

        rows
    }
}
