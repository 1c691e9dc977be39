//! Configuration management for the Nurikabe model compiler

pub mod settings;

pub use settings::{
    AnalysisConfig, CliOverrides, EncodingConfig, InputConfig, OutputConfig, ReportFormat,
    SeaRootPolicy, Settings,
};
