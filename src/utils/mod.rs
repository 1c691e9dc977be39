//! Reporting helpers for the command line

pub mod display;

pub use display::{AnalysisReport, ColorOutput, ReportFormatter};
