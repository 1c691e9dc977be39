//! Primary-item bounds, header ordering and wire-format rendering

use super::compiler::{edge_bounds, Family, RowBatch};
use super::item::{Codec, Item, Slot};
use crate::error::ModelError;
use crate::reach::Analysis;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// How often a primary item must be covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bounds {
    pub lo: usize,
    pub hi: usize,
}

impl Bounds {
    pub fn exact(count: usize) -> Self {
        Self { lo: count, hi: count }
    }

    pub fn slack(&self) -> usize {
        self.hi - self.lo
    }

    /// The item with its multiplicity prefix, bare when covered exactly once
    pub fn tag(&self, name: &str) -> String {
        match (self.lo, self.hi) {
            (1, 1) => name.to_string(),
            (lo, hi) if lo == hi => format!("{}|{}", hi, name),
            (lo, hi) => format!("{}:{}|{}", lo, hi, name),
        }
    }
}

/// A finished model: header plus sorted, distinct rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub rows: Vec<String>,
}

impl Model {
    pub fn header(&self) -> String {
        let mut header = self.primary.join(" ");
        header.push_str(" |");
        for name in &self.secondary {
            header.push(' ');
            header.push_str(name);
        }
        header
    }

    /// The whole model as one string, ready to be written in one go
    pub fn render(&self) -> String {
        let capacity = self.rows.iter().map(|row| row.len() + 1).sum::<usize>() + 64;
        let mut output = String::with_capacity(capacity);
        output.push_str(&self.header());
        output.push('\n');
        for row in &self.rows {
            output.push_str(row);
            output.push('\n');
        }
        output
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

/// Attaches bounds to primary items and serializes the model
pub struct Assembler<'a> {
    analysis: &'a Analysis,
    codec: &'a Codec,
}

impl<'a> Assembler<'a> {
    pub fn new(analysis: &'a Analysis, codec: &'a Codec) -> Self {
        Self { analysis, codec }
    }

    /// Coverage bounds implied by the puzzle for each kind of item
    pub fn bounds(&self, item: Item) -> Bounds {
        match item {
            Item::Site(_) | Item::SeaRoot | Item::Square(_) => Bounds::exact(1),
            Item::Horizontal(_) | Item::Vertical(_) => Bounds::exact(1),
            Item::Height(_) | Item::Width(_) => Bounds::exact(1),
            Item::Island(id) => Bounds::exact(self.analysis.island(id).island.size),
            Item::Layer(id, depth) => {
                let (lo, hi) = self.analysis.island(id).histogram.bounds(depth);
                Bounds { lo, hi }
            }
            Item::Sea => Bounds::exact(self.analysis.sea().size),
            Item::SeaSite(_) => Bounds { lo: 0, hi: 1 },
            Item::Edges(owner) => {
                let (lo, hi) = edge_bounds(self.analysis.region_size(owner));
                Bounds { lo, hi }
            }
        }
    }

    /// Normalize, render, sort and deduplicate every row, then build the header
    pub fn assemble(&self, batches: Vec<RowBatch>, required: &[Item]) -> Result<Model, ModelError> {
        let mut primary: BTreeSet<Item> = required.iter().copied().collect();
        let mut secondary: BTreeSet<Slot> = BTreeSet::new();
        let mut rows = Vec::with_capacity(batches.iter().map(|batch| batch.rows.len()).sum());

        for batch in batches {
            for row in batch.rows {
                let row = row.normalize(self.codec)?;
                primary.extend(row.primary.iter().copied());
                secondary.extend(row.secondary.iter().map(|&(slot, _)| slot));
                rows.push(self.codec.render(&row)?);
            }
        }

        rows.sort_unstable();
        rows.dedup();

        let mut keyed = Vec::with_capacity(primary.len());
        for item in primary {
            let bounds = self.bounds(item);
            if bounds.hi == 0 {
                continue;
            }
            keyed.push((bounds.slack(), bounds.hi, self.codec.item(item)?, bounds));
        }
        keyed.sort();

        let primary = keyed
            .into_iter()
            .map(|(_, _, name, bounds)| bounds.tag(&name))
            .collect();

        let secondary = secondary
            .into_iter()
            .map(|slot| self.codec.slot(slot))
            .collect::<Result<BTreeSet<_>, _>>()?
            .into_iter()
            .collect();

        Ok(Model { primary, secondary, rows })
    }
}

/// Row counts per family, keyed for stable reporting
pub fn family_counts(batches: &[RowBatch]) -> BTreeMap<Family, usize> {
    let mut counts = BTreeMap::new();
    for batch in batches {
        *counts.entry(batch.family).or_insert(0) += batch.rows.len();
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, EncodingConfig};
    use crate::cover::compiler::OptionCompiler;
    use crate::nurikabe::{Grid, Island, Puzzle};
    use crate::reach::Owner;

    fn model_for(puzzle: &Puzzle) -> Model {
        let analysis = Analysis::new(puzzle, &AnalysisConfig::default()).unwrap();
        let codec = Codec::for_puzzle(puzzle);
        let compiler = OptionCompiler::new(&analysis, EncodingConfig::default(), false);
        Assembler::new(&analysis, &codec)
            .assemble(compiler.compile_all(), &compiler.required_items())
            .unwrap()
    }

    #[test]
    fn test_bounds_tags() {
        assert_eq!(Bounds::exact(1).tag("S0000"), "S0000");
        assert_eq!(Bounds::exact(5).tag("Ga"), "5|Ga");
        assert_eq!(Bounds { lo: 0, hi: 1 }.tag("R0101"), "0:1|R0101");
    }

    #[test]
    fn test_item_bounds() {
        let puzzle = Puzzle::new(Grid::new(5, 5), vec![Island::new(2, 2, 5)]).unwrap();
        let analysis = Analysis::new(&puzzle, &AnalysisConfig::default()).unwrap();
        let codec = Codec::for_puzzle(&puzzle);
        let assembler = Assembler::new(&analysis, &codec);

        assert_eq!(assembler.bounds(Item::Island(0)), Bounds::exact(5));
        assert_eq!(assembler.bounds(Item::Sea), Bounds::exact(20));
        assert_eq!(assembler.bounds(Item::Layer(0, 0)), Bounds::exact(1));
        assert_eq!(assembler.bounds(Item::Layer(0, 1)), Bounds { lo: 1, hi: 4 });
        assert_eq!(assembler.bounds(Item::Edges(Owner::Island(0))), Bounds { lo: 4, hi: 5 });
    }

    #[test]
    fn test_header_layout() {
        let puzzle = Puzzle::new(Grid::new(2, 2), vec![Island::new(0, 0, 1)]).unwrap();
        let model = model_for(&puzzle);
        let header = model.header();

        let (primary, secondary) = header.split_once(" | ").unwrap();
        assert!(primary.split(' ').any(|item| item == "S0000"));
        assert!(primary.split(' ').any(|item| item == "3|E"));
        assert!(primary.split(' ').any(|item| item == "0:1|R0101"));
        assert!(primary.split(' ').any(|item| item == "Ga"));
        assert!(secondary.split(' ').all(|name| !name.contains(':')));
        assert!(secondary.split(' ').any(|name| name == "p0000"));

        // Ordered by slack, then by the upper bound
        let position = |name: &str| model.primary.iter().position(|item| item == name).unwrap();
        assert!(position("S0000") < position("2|EDGE0"));
        assert!(position("2|EDGE0") < position("3|E"));
        assert!(position("3|E") < position("0:1|R0101"));
    }

    #[test]
    fn test_rows_are_sorted_and_distinct() {
        let puzzle = Puzzle::new(Grid::new(4, 4), vec![Island::new(1, 1, 3), Island::new(3, 3, 2)]).unwrap();
        let model = model_for(&puzzle);

        assert!(model.rows.windows(2).all(|pair| pair[0] < pair[1]));
        let rendered = model.render();
        assert_eq!(rendered.lines().count(), model.rows.len() + 1);
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_write_to_buffer() {
        let puzzle = Puzzle::new(Grid::new(2, 3), vec![Island::new(0, 0, 2)]).unwrap();
        let model = model_for(&puzzle);

        let mut buffer = Vec::new();
        model.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), model.render());
    }
}
