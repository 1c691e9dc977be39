//! Nearest and farthest tree depths reachable from an origin cell

use crate::error::ModelError;
use crate::nurikabe::{Cell, Grid};
use serde::Serialize;
use std::collections::VecDeque;

/// Feasible depth range of one cell.
///
/// With a parity, only depths matching the Manhattan distance from the
/// origin modulo two are admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub min: usize,
    pub max: usize,
    pub parity: Option<usize>,
}

impl Span {
    pub fn admits(&self, depth: usize) -> bool {
        self.min <= depth
            && depth <= self.max
            && self.parity.map_or(true, |parity| depth % 2 == parity)
    }

    /// Every admitted depth, ascending
    pub fn depths(&self) -> impl Iterator<Item = usize> + '_ {
        (self.min..=self.max).filter(move |&depth| self.admits(depth))
    }
}

/// Shortest tree depth of every cell reachable from `origin`.
///
/// Cells at depth `k` are only expanded while `k + 2 <= budget`, so no depth
/// exceeds `budget - 1`.
pub fn min_sweep<F>(grid: Grid, origin: Cell, budget: usize, blocked: F) -> Vec<Option<usize>>
where
    F: Fn(Cell) -> bool,
{
    let mut depth = vec![None; grid.len()];
    depth[grid.index(origin)] = Some(0);

    let mut queue = VecDeque::from([(origin, 0usize)]);
    while let Some((cell, current)) = queue.pop_front() {
        if current + 2 > budget {
            continue;
        }
        for next in grid.neighbours(cell) {
            let slot = &mut depth[grid.index(next)];
            if slot.is_none() && !blocked(next) {
                *slot = Some(current + 1);
                queue.push_back((next, current + 1));
            }
        }
    }

    depth
}

/// Latest layer in which every cell can still be claimed.
///
/// The sweep advances a whole layer of walk states `(cell, previous)` at a
/// time. A state steps to every unblocked neighbour except the cell it came
/// from and the origin, so every simple path from the origin is one of the
/// walks. Cells reappearing in a later layer are overwritten: the last layer
/// wins, which may move a cell close to the origin far out.
pub fn max_sweep<F>(grid: Grid, origin: Cell, budget: usize, blocked: F) -> Vec<Option<usize>>
where
    F: Fn(Cell) -> bool,
{
    let mut depth = vec![None; grid.len()];
    depth[grid.index(origin)] = Some(0);

    let mut frontier: Vec<(Cell, Option<Cell>)> = vec![(origin, None)];
    for layer in 1..budget {
        let mut next = Vec::with_capacity(frontier.len() * 3);
        for &(cell, previous) in &frontier {
            for step in grid.neighbours(cell) {
                if Some(step) != previous && step != origin && !blocked(step) {
                    next.push((step, Some(cell)));
                }
            }
        }
        next.sort_unstable();
        next.dedup();
        if next.is_empty() {
            break;
        }

        for &(cell, _) in &next {
            depth[grid.index(cell)] = Some(layer);
        }
        frontier = next;
    }

    depth
}

/// Per-cell depth ranges from one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    grid: Grid,
    spans: Vec<Option<Span>>,
}

impl DistanceMap {
    /// Run both sweeps and pair them up
    pub fn sweep<F>(grid: Grid, origin: Cell, budget: usize, blocked: F) -> Result<Self, ModelError>
    where
        F: Fn(Cell) -> bool,
    {
        let nearest = min_sweep(grid, origin, budget, &blocked);
        let farthest = max_sweep(grid, origin, budget, &blocked);

        let spans = grid
            .cells()
            .zip(nearest.into_iter().zip(farthest))
            .map(|(cell, pair)| match pair {
                (Some(min), Some(max)) if min <= max => Ok(Some(Span {
                    min,
                    max,
                    parity: Some(origin.manhattan(cell) % 2),
                })),
                (None, None) => Ok(None),
                _ => Err(ModelError::SweepMismatch {
                    origin: origin.to_string(),
                    cell: cell.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { grid, spans })
    }

    /// A map without sweeps, used when the origin is not fixed
    pub fn from_spans(grid: Grid, spans: Vec<Option<Span>>) -> Self {
        Self { grid, spans }
    }

    pub fn span(&self, cell: Cell) -> Option<&Span> {
        self.spans[self.grid.index(cell)].as_ref()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.span(cell).is_some()
    }

    /// Reachable cells with their spans, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Span)> + '_ {
        self.spans
            .iter()
            .enumerate()
            .filter_map(move |(index, span)| span.as_ref().map(|span| (self.grid.cell(index), span)))
    }

    pub fn reachable_count(&self) -> usize {
        self.spans.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(_: Cell) -> bool {
        false
    }

    #[test]
    fn test_min_sweep_respects_budget() {
        let grid = Grid::new(5, 5);
        let depth = min_sweep(grid, Cell::new(2, 2), 3, open);

        assert_eq!(depth[grid.index(Cell::new(2, 2))], Some(0));
        assert_eq!(depth[grid.index(Cell::new(1, 2))], Some(1));
        assert_eq!(depth[grid.index(Cell::new(1, 1))], Some(2));
        assert_eq!(depth[grid.index(Cell::new(0, 2))], Some(2));
        assert_eq!(depth[grid.index(Cell::new(0, 1))], None);
    }

    #[test]
    fn test_min_sweep_routes_around_blocked_cells() {
        let grid = Grid::new(3, 3);
        let wall = |cell: Cell| cell == Cell::new(0, 1) || cell == Cell::new(1, 1);
        let depth = min_sweep(grid, Cell::new(0, 0), 9, wall);

        assert_eq!(depth[grid.index(Cell::new(0, 1))], None);
        assert_eq!(depth[grid.index(Cell::new(0, 2))], Some(6));
    }

    #[test]
    fn test_size_one_reaches_only_origin() {
        let grid = Grid::new(3, 3);
        let map = DistanceMap::sweep(grid, Cell::new(1, 1), 1, open).unwrap();
        assert_eq!(map.reachable_count(), 1);
        assert_eq!(map.span(Cell::new(1, 1)).map(|span| (span.min, span.max)), Some((0, 0)));
    }

    #[test]
    fn test_max_sweep_stops_in_dead_ends() {
        // A 1x4 corridor with the origin second from the left
        let grid = Grid::new(1, 4);
        let depth = max_sweep(grid, Cell::new(0, 1), 4, open);

        assert_eq!(depth, vec![Some(1), Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_max_sweep_last_layer_wins() {
        // 2x3 block, origin in the corner, enough budget to cover it all
        let grid = Grid::new(2, 3);
        let depth = max_sweep(grid, Cell::new(0, 0), 6, open);

        assert_eq!(
            depth,
            vec![Some(0), Some(5), Some(4), Some(5), Some(4), Some(5)]
        );
    }

    #[test]
    fn test_distance_map_spans() {
        let grid = Grid::new(2, 3);
        let map = DistanceMap::sweep(grid, Cell::new(0, 0), 6, open).unwrap();

        let span = map.span(Cell::new(1, 2)).unwrap();
        assert_eq!((span.min, span.max), (3, 5));
        assert_eq!(span.depths().collect::<Vec<_>>(), vec![3, 5]);
        assert!(!span.admits(4));
        assert_eq!(map.reachable_count(), 6);
    }

    #[test]
    fn test_unparitied_span_admits_every_depth() {
        let span = Span { min: 1, max: 4, parity: None };
        assert_eq!(span.depths().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
