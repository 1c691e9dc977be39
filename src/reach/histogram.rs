//! Per-depth counts of cells an island can place in its tree

use super::distance::DistanceMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Layer {
    /// Cells whose span admits this depth
    pub reachable: usize,
    /// Cells a widest-first tree of the island's size places at this depth
    pub used: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeHistogram {
    size: usize,
    layers: Vec<Layer>,
}

impl TreeHistogram {
    pub fn build(size: usize, distances: &DistanceMap) -> Self {
        let mut layers = vec![Layer::default(); size];
        for (_, span) in distances.iter() {
            for depth in span.depths() {
                layers[depth].reachable += 1;
            }
        }

        let mut remaining = size;
        for layer in &mut layers {
            layer.used = layer.reachable.min(remaining);
            remaining -= layer.used;
        }

        Self { size, layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, depth: usize) -> Layer {
        self.layers.get(depth).copied().unwrap_or_default()
    }

    /// Cells placed by the widest-first fill; equals the size whenever the
    /// island has room for itself.
    pub fn used_total(&self) -> usize {
        self.layers.iter().map(|layer| layer.used).sum()
    }

    /// Bounds on how many island cells sit at `depth`.
    ///
    /// Every layer the widest fill touches is needed by any tree, since no
    /// tree can be shallower. A tree with a cell at `depth` has at least one
    /// cell at each shallower depth.
    pub fn bounds(&self, depth: usize) -> (usize, usize) {
        let layer = self.layer(depth);
        let lower = usize::from(layer.used > 0);
        let upper = layer.reachable.min(self.size.saturating_sub(depth));
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurikabe::{Cell, Grid};

    #[test]
    fn test_histogram_of_open_centre() {
        let grid = Grid::new(5, 5);
        let map = DistanceMap::sweep(grid, Cell::new(2, 2), 5, |_| false).unwrap();
        let histogram = TreeHistogram::build(5, &map);

        assert_eq!(histogram.layer(0), Layer { reachable: 1, used: 1 });
        assert_eq!(histogram.layer(1), Layer { reachable: 4, used: 4 });
        assert_eq!(histogram.layer(2).used, 0);
        assert_eq!(histogram.used_total(), 5);

        assert_eq!(histogram.bounds(0), (1, 1));
        assert_eq!(histogram.bounds(1), (1, 4));
        assert_eq!(histogram.bounds(4).1, 1);
    }

    #[test]
    fn test_histogram_of_corridor() {
        let grid = Grid::new(1, 4);
        let map = DistanceMap::sweep(grid, Cell::new(0, 0), 3, |_| false).unwrap();
        let histogram = TreeHistogram::build(3, &map);

        let used: Vec<_> = histogram.layers().iter().map(|layer| layer.used).collect();
        assert_eq!(used, vec![1, 1, 1]);
        assert_eq!(histogram.bounds(2), (1, 1));
        assert_eq!(histogram.bounds(7), (0, 0));
    }

    #[test]
    fn test_cramped_island_falls_short() {
        let grid = Grid::new(1, 2);
        let map = DistanceMap::sweep(grid, Cell::new(0, 0), 2, |_| false).unwrap();
        let histogram = TreeHistogram::build(2, &map);
        assert_eq!(histogram.used_total(), 2);

        let blocked = DistanceMap::sweep(grid, Cell::new(0, 0), 2, |cell| cell.col == 1).unwrap();
        assert_eq!(TreeHistogram::build(2, &blocked).used_total(), 1);
    }
}
