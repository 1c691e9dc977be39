//! Typed items, rows and their serialization to item names

use super::color::{island_code, Color, Palette};
use crate::error::ModelError;
use crate::nurikabe::{Cell, Grid, IslandId, Puzzle};
use crate::reach::Owner;

/// Primary items: each must be covered a bounded number of times
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Item {
    /// `S<cell>`: exactly one ownership row per cell
    Site(Cell),
    /// `G<g>`: one row per island cell
    Island(IslandId),
    /// `T<g><d>`: island cells at one tree depth
    Layer(IslandId, usize),
    /// `E`: one tree row per sea cell
    Sea,
    /// `R<cell>`: at most one sea-tree row per cell
    SeaSite(Cell),
    /// `ROOT`: the one root of a freely rooted sea
    SeaRoot,
    /// `Q<cell>`: the 2x2 block with this top-left corner
    Square(Cell),
    /// `H<cell>`: the pair of this cell and its right neighbour
    Horizontal(Cell),
    /// `V<cell>`: the pair of this cell and the one below
    Vertical(Cell),
    /// `EDGE<g>` / `EDGE0`: same-owner adjacent pairs of a region
    Edges(Owner),
    /// `_W<h>`: the number of grid rows, read back by drawing tools
    Height(usize),
    /// `_H<w>`: the number of grid columns
    Width(usize),
}

/// Secondary items: every row mentioning one must agree on its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// `p<cell>`: filled or empty
    Filled(Cell),
    /// `g<cell>`: owning island, `0` for sea
    Owner(Cell),
    /// `t<g><cell>`: depth in the island's tree, `0` outside it
    Depth(IslandId, Cell),
    /// `u<g><cell><d>`: the cell sits at depth `d` of the island's tree
    DepthFlag(IslandId, Cell, usize),
    /// `r<cell>`: level in the sea tree
    SeaLevel(Cell),
    /// `y<cell><l>`: the cell sits at level `l` of the sea tree
    SeaFlag(Cell, usize),
}

/// One option of the exact-cover model
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row {
    pub primary: Vec<Item>,
    pub secondary: Vec<(Slot, Color)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cover(mut self, item: Item) -> Self {
        self.primary.push(item);
        self
    }

    pub fn cover_if(self, condition: bool, item: Item) -> Self {
        if condition {
            self.cover(item)
        } else {
            self
        }
    }

    pub fn assign(mut self, slot: Slot, color: Color) -> Self {
        self.secondary.push((slot, color));
        self
    }

    pub fn assign_all<I>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = (Slot, Color)>,
    {
        self.secondary.extend(assignments);
        self
    }

    /// Sort and deduplicate the tokens, rejecting contradictory colors
    pub fn normalize(mut self, codec: &Codec) -> Result<Self, ModelError> {
        self.primary.sort_unstable();
        self.primary.dedup();
        self.secondary.sort_unstable();
        self.secondary.dedup();

        if self.primary.is_empty() {
            return Err(ModelError::NoPrimary(codec.render(&self)?));
        }

        for pair in self.secondary.windows(2) {
            let ((slot, first), (next, second)) = (pair[0], pair[1]);
            if slot == next {
                return Err(ModelError::ConflictingColor {
                    item: codec.slot(slot)?,
                    first: format!("{:?}", first),
                    second: format!("{:?}", second),
                });
            }
        }

        Ok(self)
    }
}

/// Lookup tables for every name and color of one instance
#[derive(Debug, Clone)]
pub struct Codec {
    grid: Grid,
    cells: Vec<String>,
    depths: Palette,
    levels: Palette,
}

impl Codec {
    pub fn new(grid: Grid, depth_limit: usize, level_limit: usize) -> Self {
        let cells = grid
            .cells()
            .map(|cell| format!("{:02}{:02}", cell.row, cell.col))
            .collect();

        Self {
            grid,
            cells,
            depths: Palette::new(depth_limit),
            levels: Palette::new(level_limit),
        }
    }

    /// Depths reach one less than the largest island, levels one less than the sea
    pub fn for_puzzle(puzzle: &Puzzle) -> Self {
        Self::new(
            puzzle.grid(),
            puzzle.largest_island().saturating_sub(1),
            puzzle.empty_size().saturating_sub(1),
        )
    }

    pub fn depths(&self) -> &Palette {
        &self.depths
    }

    pub fn levels(&self) -> &Palette {
        &self.levels
    }

    pub fn cell(&self, cell: Cell) -> Result<&str, ModelError> {
        if !self.grid.contains(cell) {
            return Err(ModelError::CellOutOfGrid { cell: cell.to_string() });
        }
        Ok(&self.cells[self.grid.index(cell)])
    }

    pub fn item(&self, item: Item) -> Result<String, ModelError> {
        Ok(match item {
            Item::Site(cell) => format!("S{}", self.cell(cell)?),
            Item::Island(id) => format!("G{}", island_code(id)),
            Item::Layer(id, depth) => format!("T{}{}", island_code(id), self.depths.code(depth)?),
            Item::Sea => "E".to_string(),
            Item::SeaSite(cell) => format!("R{}", self.cell(cell)?),
            Item::SeaRoot => "ROOT".to_string(),
            Item::Square(cell) => format!("Q{}", self.cell(cell)?),
            Item::Horizontal(cell) => format!("H{}", self.cell(cell)?),
            Item::Vertical(cell) => format!("V{}", self.cell(cell)?),
            Item::Edges(Owner::Island(id)) => format!("EDGE{}", island_code(id)),
            Item::Edges(Owner::Sea) => "EDGE0".to_string(),
            Item::Height(rows) => format!("_W{}", rows),
            Item::Width(cols) => format!("_H{}", cols),
        })
    }

    pub fn slot(&self, slot: Slot) -> Result<String, ModelError> {
        Ok(match slot {
            Slot::Filled(cell) => format!("p{}", self.cell(cell)?),
            Slot::Owner(cell) => format!("g{}", self.cell(cell)?),
            Slot::Depth(id, cell) => format!("t{}{}", island_code(id), self.cell(cell)?),
            Slot::DepthFlag(id, cell, depth) => {
                format!("u{}{}{}", island_code(id), self.cell(cell)?, self.depths.code(depth)?)
            }
            Slot::SeaLevel(cell) => format!("r{}", self.cell(cell)?),
            Slot::SeaFlag(cell, level) => format!("y{}{}", self.cell(cell)?, self.levels.code(level)?),
        })
    }

    /// Spell a color, checking that it fits the slot
    pub fn color(&self, slot: Slot, color: Color) -> Result<String, ModelError> {
        let spelled = match (slot, color) {
            (_, Color::Off) if !matches!(slot, Slot::SeaLevel(_)) => Some("0".to_string()),
            (Slot::Filled(_) | Slot::DepthFlag(..) | Slot::SeaFlag(..), Color::On) => Some("1".to_string()),
            (Slot::Owner(_), Color::Island(id)) => Some(island_code(id).to_string()),
            (Slot::Depth(..), Color::Level(depth)) => Some(self.depths.code(depth)?.to_string()),
            (Slot::SeaLevel(_), Color::Level(level)) => Some(self.levels.code(level)?.to_string()),
            _ => None,
        };

        spelled.ok_or_else(|| ModelError::ColorKind {
            item: self.slot(slot).unwrap_or_else(|err| err.to_string()),
            color: format!("{:?}", color),
        })
    }

    /// Primary names then `name:color` pairs, space separated
    pub fn render(&self, row: &Row) -> Result<String, ModelError> {
        let mut tokens = Vec::with_capacity(row.primary.len() + row.secondary.len());
        for &item in &row.primary {
            tokens.push(self.item(item)?);
        }
        for &(slot, color) in &row.secondary {
            tokens.push(format!("{}:{}", self.slot(slot)?, self.color(slot, color)?));
        }
        Ok(tokens.join(" "))
    }
}
