//! Exclusion halos and per-island forbidden matrices
//!
//! Built in two phases: every island's own halo first, then one union of the
//! other islands' halos per island. No phase reads the output of another
//! island's second phase.

use crate::nurikabe::{Cell, Grid, IslandId, Puzzle};

/// The seed of an island plus its orthogonal neighbours.
///
/// Any other island touching these cells would touch the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halo {
    pub island: IslandId,
    pub cells: Vec<Cell>,
}

impl Halo {
    pub fn around(grid: Grid, island: IslandId, seed: Cell) -> Self {
        let mut cells = vec![seed];
        cells.extend(grid.neighbours(seed));
        Self { island, cells }
    }
}

/// Phase one: one halo per island, independent of the others
pub fn seed_halos(puzzle: &Puzzle) -> Vec<Halo> {
    puzzle
        .islands()
        .iter()
        .enumerate()
        .map(|(id, island)| Halo::around(puzzle.grid(), id, island.seed))
        .collect()
}

/// Cells an island may never occupy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenMatrix {
    grid: Grid,
    cells: Vec<bool>,
}

impl ForbiddenMatrix {
    /// Phase two: the union of every other island's halo
    pub fn for_island(grid: Grid, halos: &[Halo], island: IslandId) -> Self {
        let mut cells = vec![false; grid.len()];
        for halo in halos.iter().filter(|halo| halo.island != island) {
            for &cell in &halo.cells {
                cells[grid.index(cell)] = true;
            }
        }
        Self { grid, cells }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells[self.grid.index(cell)]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

/// Both phases for every island
pub fn forbidden_matrices(puzzle: &Puzzle) -> Vec<ForbiddenMatrix> {
    let halos = seed_halos(puzzle);
    puzzle
        .island_ids()
        .map(|id| ForbiddenMatrix::for_island(puzzle.grid(), &halos, id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurikabe::Island;

    fn two_islands() -> Puzzle {
        Puzzle::new(
            Grid::new(5, 5),
            vec![Island::new(2, 1, 3), Island::new(2, 3, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_halo_clipped_at_border() {
        let halo = Halo::around(Grid::new(3, 3), 0, Cell::new(0, 0));
        assert_eq!(halo.cells.len(), 3);
    }

    #[test]
    fn test_forbidden_is_union_of_other_halos() {
        let puzzle = two_islands();
        let matrices = forbidden_matrices(&puzzle);

        // Island 0 may not use island 1's seed or any cell next to it
        assert!(matrices[0].contains(Cell::new(2, 3)));
        assert!(matrices[0].contains(Cell::new(2, 2)));
        assert!(matrices[0].contains(Cell::new(1, 3)));
        assert!(matrices[0].contains(Cell::new(2, 4)));
        assert!(!matrices[0].contains(Cell::new(2, 1)));
        assert!(!matrices[0].contains(Cell::new(1, 1)));
        assert_eq!(matrices[0].count(), 5);

        assert!(matrices[1].contains(Cell::new(2, 1)));
        assert!(matrices[1].contains(Cell::new(2, 2)));
    }

    #[test]
    fn test_single_island_has_nothing_forbidden() {
        let puzzle = Puzzle::new(Grid::new(4, 4), vec![Island::new(1, 1, 4)]).unwrap();
        assert_eq!(forbidden_matrices(&puzzle)[0].count(), 0);
    }
}
