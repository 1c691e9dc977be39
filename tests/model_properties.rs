//! Property-based and scenario tests for the analysis and the compiled model.
//!
//! Properties checked over random small instances:
//!
//! 1. The widest-first histogram fills every island that has room.
//! 2. Distance spans are ordered, bounded by the size, and zero at the seed.
//! 3. Every depth placed in a tree row matches the Manhattan parity.
//! 4. No island reaches another island's seed halo.
//! 5. Every row covers a primary item and only names header items.
//! 6. Compiling twice gives the same model.

use nurikabe_xcc::config::{AnalysisConfig, EncodingConfig, SeaRootPolicy, Settings};
use nurikabe_xcc::cover::{Color, ModelEncoder, OptionCompiler, Slot};
use nurikabe_xcc::nurikabe::{Cell, Grid, Island, Puzzle};
use nurikabe_xcc::reach::distance::max_sweep;
use nurikabe_xcc::reach::{seed_halos, Analysis, Layer};
use proptest::prelude::*;
use std::collections::HashSet;

// ── Helpers ─────────────────────────────────────────────────────────────

fn puzzle_strategy() -> impl Strategy<Value = Puzzle> {
    (2usize..=6, 2usize..=6)
        .prop_flat_map(|(height, width)| {
            let seeds = proptest::sample::subsequence((0..height * width).collect::<Vec<_>>(), 1..=4);
            let sizes = proptest::collection::vec(1usize..=5, 4);
            (Just(height), Just(width), seeds, sizes)
        })
        .prop_filter_map("island sizes must fit the grid", |(height, width, seeds, sizes)| {
            let islands = seeds
                .iter()
                .zip(&sizes)
                .map(|(&index, &size)| Island::new(index / width, index % width, size))
                .collect();
            Puzzle::new(Grid::new(height, width), islands).ok()
        })
}

fn policy_strategy() -> impl Strategy<Value = SeaRootPolicy> {
    prop_oneof![Just(SeaRootPolicy::Center), Just(SeaRootPolicy::Free)]
}

fn analyze(puzzle: &Puzzle, sea_root: SeaRootPolicy) -> Analysis {
    Analysis::new(puzzle, &AnalysisConfig { sea_root, parallel: false }).unwrap()
}

fn compile(puzzle: &Puzzle, settings: Settings) -> String {
    let encoder = ModelEncoder::new(puzzle.clone(), settings).unwrap();
    encoder.encode().unwrap().0.render()
}

/// Strip the `u:v|` multiplicity prefix of a header item
fn item_name(token: &str) -> &str {
    token.rsplit('|').next().unwrap_or(token)
}

// ── 1. Tree-size conservation ───────────────────────────────────────────

proptest! {
    #[test]
    fn histogram_fills_islands_with_room(puzzle in puzzle_strategy()) {
        let analysis = analyze(&puzzle, SeaRootPolicy::Center);
        for reach in analysis.islands() {
            let placements: usize = reach.histogram.layers().iter().map(|layer| layer.reachable).sum();
            prop_assert_eq!(reach.histogram.used_total(), reach.island.size.min(placements));
            if reach.distances.reachable_count() >= reach.island.size {
                prop_assert_eq!(reach.histogram.used_total(), reach.island.size);
            }
        }
    }
}

// ── 2. Distance map soundness ───────────────────────────────────────────

proptest! {
    #[test]
    fn spans_are_ordered_and_bounded(puzzle in puzzle_strategy()) {
        let analysis = analyze(&puzzle, SeaRootPolicy::Center);
        for reach in analysis.islands() {
            let seed = reach.distances.span(reach.seed()).unwrap();
            prop_assert_eq!((seed.min, seed.max), (0, 0));

            for (cell, span) in reach.distances.iter() {
                prop_assert!(span.min <= span.max, "{} has span {:?}", cell, span);
                prop_assert!(span.max < reach.island.size, "{} has span {:?}", cell, span);
                prop_assert!(span.min >= reach.seed().manhattan(cell));
            }
        }
    }
}

// ── 3. Parity invariant ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn tree_depths_match_parity(puzzle in puzzle_strategy()) {
        let analysis = analyze(&puzzle, SeaRootPolicy::Center);
        let compiler = OptionCompiler::new(&analysis, EncodingConfig::default(), false);

        for row in compiler.seed_rows().into_iter().chain(compiler.tail_rows()) {
            for &(slot, color) in &row.secondary {
                if let (Slot::Depth(id, cell), Color::Level(depth)) = (slot, color) {
                    let seed = puzzle.island(id).seed;
                    prop_assert_eq!(seed.manhattan(cell) % 2, depth % 2);
                }
            }
        }
    }
}

// ── 4. Mutual exclusion ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn islands_stay_out_of_other_halos(puzzle in puzzle_strategy()) {
        let analysis = analyze(&puzzle, SeaRootPolicy::Center);
        let halos = seed_halos(&puzzle);

        for reach in analysis.islands() {
            for halo in halos.iter().filter(|halo| halo.island != reach.id) {
                // Touching seeds leave an island's own seed inside a rival halo
                for &cell in halo.cells.iter().filter(|&&cell| cell != reach.seed()) {
                    prop_assert!(!reach.distances.contains(cell));
                    prop_assert!(reach.forbidden.contains(cell));
                }
            }
        }
    }
}

// ── 5. Row well-formedness ──────────────────────────────────────────────

proptest! {
    #[test]
    fn rows_only_use_header_items(puzzle in puzzle_strategy(), sea_root in policy_strategy()) {
        let mut settings = Settings::default();
        settings.analysis.sea_root = sea_root;
        let model = compile(&puzzle, settings);

        let mut lines = model.lines();
        let header = lines.next().unwrap();
        let (primary, secondary) = header.split_once(" |").unwrap();
        let primary: HashSet<&str> = primary.split_whitespace().map(item_name).collect();
        let secondary: HashSet<&str> = secondary.split_whitespace().collect();

        for row in lines {
            let tokens: Vec<&str> = row.split(' ').collect();
            prop_assert!(tokens.iter().any(|token| !token.contains(':')), "no primary item in {}", row);

            for token in tokens {
                match token.split_once(':') {
                    Some((name, _)) => prop_assert!(secondary.contains(name), "{} missing from header", name),
                    None => prop_assert!(primary.contains(token), "{} missing from header", token),
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn secondary_cells_lie_in_the_grid(puzzle in puzzle_strategy()) {
        let analysis = analyze(&puzzle, SeaRootPolicy::Center);
        let compiler = OptionCompiler::new(&analysis, EncodingConfig::default(), false);
        let grid = puzzle.grid();

        for batch in compiler.compile_all() {
            for row in batch.rows {
                prop_assert!(!row.primary.is_empty());
                for (slot, _) in row.secondary {
                    let cell = match slot {
                        Slot::Filled(cell) | Slot::Owner(cell) | Slot::SeaLevel(cell) => cell,
                        Slot::Depth(_, cell) | Slot::DepthFlag(_, cell, _) => cell,
                        Slot::SeaFlag(cell, _) => cell,
                    };
                    prop_assert!(grid.contains(cell));
                }
            }
        }
    }
}

// ── 6. Idempotence ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn compiling_is_reproducible(puzzle in puzzle_strategy()) {
        let parallel = compile(&puzzle, Settings::default());

        let mut sequential = Settings::default();
        sequential.analysis.parallel = false;
        prop_assert_eq!(parallel, compile(&puzzle, sequential));
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn open_centre_island() {
    let puzzle = Puzzle::new(Grid::new(5, 5), vec![Island::new(2, 2, 5)]).unwrap();
    let analysis = analyze(&puzzle, SeaRootPolicy::Center);
    let reach = &analysis.islands()[0];

    for cell in [Cell::new(1, 2), Cell::new(2, 1), Cell::new(2, 3), Cell::new(3, 2)] {
        assert!(reach.span(cell).unwrap().admits(1));
    }
    assert_eq!(reach.histogram.layer(0), Layer { reachable: 1, used: 1 });

    let compiler = OptionCompiler::new(&analysis, EncodingConfig::default(), false);
    assert_eq!(compiler.seed_rows().len(), 1);
    assert_eq!(compiler.empty_rows().len(), 24);

    let first_layer = compiler
        .tail_rows()
        .into_iter()
        .filter(|row| row.secondary.iter().any(|&(slot, color)| {
            matches!(slot, Slot::DepthFlag(0, _, 1)) && color == Color::On
        }))
        .count();
    assert_eq!(first_layer, 4);
}

#[test]
fn neighbouring_islands_exclude_each_other() {
    let puzzle = Puzzle::new(
        Grid::new(5, 5),
        vec![Island::new(2, 1, 3), Island::new(2, 3, 3)],
    )
    .unwrap();
    let analysis = analyze(&puzzle, SeaRootPolicy::Center);

    let (first, second) = (&analysis.islands()[0], &analysis.islands()[1]);
    for cell in [Cell::new(2, 3), Cell::new(1, 3), Cell::new(3, 3), Cell::new(2, 2), Cell::new(2, 4)] {
        assert!(!first.distances.contains(cell));
    }
    for cell in [Cell::new(2, 1), Cell::new(1, 1), Cell::new(3, 1), Cell::new(2, 2), Cell::new(2, 0)] {
        assert!(!second.distances.contains(cell));
    }

    // No row names both islands as owners
    let model = compile(&puzzle, Settings::default());
    for row in model.lines().skip(1) {
        let owners: HashSet<&str> = row
            .split(' ')
            .filter(|token| token.starts_with('g'))
            .filter_map(|token| token.split_once(':').map(|(_, color)| color))
            .collect();
        assert!(!(owners.contains("a") && owners.contains("b")), "{}", row);
    }
}

#[test]
fn max_sweep_last_layer_wins() {
    let grid = Grid::new(2, 3);
    let depth = max_sweep(grid, Cell::new(0, 0), 6, |_| false);
    assert_eq!(depth, vec![Some(0), Some(5), Some(4), Some(5), Some(4), Some(5)]);
}

#[test]
fn sample_instance_compiles() {
    let puzzle = nurikabe_xcc::nurikabe::io::sample_puzzle().unwrap();
    let model = nurikabe_xcc::compile_model(puzzle, Settings::default()).unwrap();

    let header = model.lines().next().unwrap();
    assert!(header.contains(" | "));
    assert!(header.split(' ').any(|item| item == "35|E"));
}
