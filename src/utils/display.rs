//! Display and output formatting utilities

use crate::config::ReportFormat;
use crate::cover::color::island_code;
use crate::cover::{EncodingStatistics, ModelEncoder};
use crate::nurikabe::{Cell, Grid};
use crate::reach::{Analysis, Layer, Owner, SeaRoot, Span};
use anyhow::{Context, Result};
use serde::Serialize;

/// Everything `analyze` prints about one instance
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub height: usize,
    pub width: usize,
    pub palettes: PaletteReport,
    pub islands: Vec<IslandReport>,
    pub sea: SeaReport,
    pub cells: Vec<CellReport>,
    pub statistics: EncodingStatistics,
}

/// Largest depth and sea level the color codes must spell, and their width
#[derive(Debug, Clone, Serialize)]
pub struct PaletteReport {
    pub depth_limit: usize,
    pub depth_width: usize,
    pub level_limit: usize,
    pub level_width: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IslandReport {
    pub code: char,
    pub seed: Cell,
    pub size: usize,
    pub forbidden: usize,
    pub reachable: usize,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeaReport {
    pub size: usize,
    pub root: SeaRoot,
    pub reachable: usize,
    pub certain_sea: usize,
    pub certain_land: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub cell: Cell,
    pub candidates: Vec<Owner>,
    pub spans: Vec<(Owner, Span)>,
}

/// Format analysis reports for display
pub struct ReportFormatter;

impl ReportFormatter {
    /// Collect the report from a finished encoder
    pub fn build(encoder: &ModelEncoder, statistics: EncodingStatistics) -> AnalysisReport {
        let analysis = encoder.analysis();
        let grid = encoder.puzzle().grid();
        let codec = encoder.codec();
        let palettes = PaletteReport {
            depth_limit: codec.depths().limit(),
            depth_width: codec.depths().width(),
            level_limit: codec.levels().limit(),
            level_width: codec.levels().width(),
        };

        let islands = analysis
            .islands()
            .iter()
            .map(|reach| IslandReport {
                code: island_code(reach.id),
                seed: reach.seed(),
                size: reach.island.size,
                forbidden: reach.forbidden.count(),
                reachable: reach.distances.reachable_count(),
                layers: reach.histogram.layers().to_vec(),
            })
            .collect();

        let sea = analysis.sea();
        let sea = SeaReport {
            size: sea.size,
            root: sea.root,
            reachable: sea.levels.as_ref().map_or(0, |levels| levels.reachable_count()),
            certain_sea: grid.cells().filter(|&cell| analysis.forced_empty(cell)).count(),
            certain_land: grid.cells().filter(|&cell| analysis.forced_filled(cell)).count(),
        };

        let cells = grid
            .cells()
            .map(|cell| CellReport {
                cell,
                candidates: analysis.candidates(cell).to_vec(),
                spans: Self::spans(analysis, cell),
            })
            .collect();

        AnalysisReport {
            height: grid.height,
            width: grid.width,
            palettes,
            islands,
            sea,
            cells,
            statistics,
        }
    }

    fn spans(analysis: &Analysis, cell: Cell) -> Vec<(Owner, Span)> {
        analysis
            .candidates(cell)
            .iter()
            .filter_map(|&owner| {
                let span = match owner {
                    Owner::Island(id) => analysis.island(id).span(cell),
                    Owner::Sea => analysis.sea().span(cell),
                };
                span.map(|span| (owner, *span))
            })
            .collect()
    }

    /// Render the report in the requested format
    pub fn format(report: &AnalysisReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(Self::format_text(report)),
            ReportFormat::Json => {
                let mut json = serde_json::to_string_pretty(report)
                    .context("Failed to serialize the analysis report")?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Human-readable report
    pub fn format_text(report: &AnalysisReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Instance {}x{} ===\n", report.height, report.width));
        output.push_str(&format!(
            "Color codes: depths up to {} in {} letter(s), sea levels up to {} in {} letter(s)\n\n",
            report.palettes.depth_limit,
            report.palettes.depth_width,
            report.palettes.level_limit,
            report.palettes.level_width
        ));
        output.push_str("Island | Seed     | Size | Forbidden | Reachable | Layers (used/reachable)\n");
        output.push_str("-------|----------|------|-----------|-----------|------------------------\n");
        for island in &report.islands {
            let layers = island
                .layers
                .iter()
                .map(|layer| format!("{}/{}", layer.used, layer.reachable))
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!(
                "{:6} | {:8} | {:4} | {:9} | {:9} | {}\n",
                island.code,
                island.seed.to_string(),
                island.size,
                island.forbidden,
                island.reachable,
                layers
            ));
        }
        output.push('\n');

        let root = match report.sea.root {
            SeaRoot::Absent => "none".to_string(),
            SeaRoot::Fixed(cell) => format!("fixed at {}", cell),
            SeaRoot::Free => "free".to_string(),
        };
        output.push_str(&format!(
            "Sea: {} cells, root {}, {} cells may be sea\n",
            report.sea.size, root, report.sea.reachable
        ));
        output.push_str(&format!(
            "Certain: {} sea, {} land\n\n",
            report.sea.certain_sea, report.sea.certain_land
        ));

        output.push_str("Candidates:\n");
        output.push_str(&Self::format_candidate_map(report));
        output.push('\n');

        output.push_str(&report.statistics.to_string());
        output
    }

    /// One character per cell: the island code when only one island may claim
    /// it, `.` for certain sea, `#` for seeds and a digit counting the
    /// candidates otherwise.
    pub fn format_candidate_map(report: &AnalysisReport) -> String {
        let grid = Grid::new(report.height, report.width);
        let mut output = String::new();

        for row in 0..grid.height {
            output.push_str(&format!("{:2} ", row));
            for col in 0..grid.width {
                let cell = &report.cells[grid.index(Cell::new(row, col))];
                let symbol = if report.islands.iter().any(|island| island.seed == cell.cell) {
                    '#'
                } else {
                    match cell.candidates.as_slice() {
                        [] => 'x',
                        [Owner::Sea] => '.',
                        [Owner::Island(id)] => island_code(*id),
                        owners => char::from_digit(owners.len().min(9) as u32, 10).unwrap_or('+'),
                    }
                };
                output.push(symbol);
            }
            output.push('\n');
        }

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Green,
    Yellow,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Green => 32,
            Color::Yellow => 33,
        }
    }
}
