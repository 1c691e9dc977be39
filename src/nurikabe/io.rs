//! Reading and writing the line-oriented instance format
//!
//! ```text
//! <h> <w>
//! <n>
//! <seed_row> <seed_col> <size>    (n lines)
//! ```

use super::grid::Grid;
use super::puzzle::{InstanceError, Island, Puzzle};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Load an instance from a file
pub fn load_puzzle_from_file<P: AsRef<Path>>(path: P) -> Result<Puzzle> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read instance file: {}", path.as_ref().display()))?;

    parse_puzzle(&content)
        .with_context(|| format!("Failed to parse instance from file: {}", path.as_ref().display()))
}

/// Load an instance from any reader, typically standard input
pub fn load_puzzle_from_reader<R: Read>(mut reader: R) -> Result<Puzzle> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Failed to read instance")?;

    parse_puzzle(&content).context("Failed to parse instance")
}

/// Parse an instance from its text form
pub fn parse_puzzle(content: &str) -> Result<Puzzle, InstanceError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line, header) = lines.next().ok_or_else(|| InstanceError::Parse {
        line: 1,
        message: "missing grid dimensions".to_string(),
    })?;
    let [height, width] = parse_fields::<2>(line, header)?;

    let (line, count) = lines.next().ok_or_else(|| InstanceError::Parse {
        line: line + 1,
        message: "missing island count".to_string(),
    })?;
    let [count] = parse_fields::<1>(line, count)?;

    let mut islands = Vec::with_capacity(count.min(super::puzzle::MAX_ISLANDS + 1));
    let mut last_line = line;
    for island_idx in 0..count {
        let (line, text) = lines.next().ok_or_else(|| InstanceError::Parse {
            line: last_line + 1,
            message: format!("expected {} islands, found {}", count, island_idx),
        })?;
        let [row, col, size] = parse_fields::<3>(line, text)?;
        islands.push(Island::new(row, col, size));
        last_line = line;
    }

    if let Some((line, _)) = lines.next() {
        return Err(InstanceError::Parse {
            line,
            message: "unexpected data after the last island".to_string(),
        });
    }

    Puzzle::new(Grid::new(height, width), islands)
}

fn parse_fields<const N: usize>(line: usize, text: &str) -> Result<[usize; N], InstanceError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != N {
        return Err(InstanceError::Parse {
            line,
            message: format!("expected {} integers, found {} fields", N, fields.len()),
        });
    }

    let mut values = [0usize; N];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = field.parse().map_err(|_| InstanceError::Parse {
            line,
            message: format!("'{}' is not a non-negative integer", field),
        })?;
    }
    Ok(values)
}

/// Convert an instance back to its text form
pub fn puzzle_to_string(puzzle: &Puzzle) -> String {
    let grid = puzzle.grid();
    let mut result = format!("{} {}\n{}\n", grid.height, grid.width, puzzle.islands().len());
    for island in puzzle.islands() {
        result.push_str(&format!("{} {} {}\n", island.seed.row, island.seed.col, island.size));
    }
    result
}

/// Save an instance to a file, creating parent directories
pub fn save_puzzle_to_file<P: AsRef<Path>>(puzzle: &Puzzle, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, puzzle_to_string(puzzle))
        .with_context(|| format!("Failed to write instance to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// A small 7x7 instance used by `setup`
pub fn sample_puzzle() -> Result<Puzzle, InstanceError> {
    Puzzle::new(
        Grid::new(7, 7),
        vec![
            Island::new(0, 0, 2),
            Island::new(1, 4, 3),
            Island::new(3, 2, 4),
            Island::new(5, 5, 3),
            Island::new(6, 1, 2),
        ],
    )
}
