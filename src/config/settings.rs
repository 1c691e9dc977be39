//! Configuration settings for the Nurikabe model compiler

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub analysis: AnalysisConfig,
    pub encoding: EncodingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Instance to compile; standard input when absent
    pub instance_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the model goes; standard output when absent
    pub model_file: Option<PathBuf>,
    pub report_format: ReportFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sea_root: SeaRootPolicy,
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sea_root: SeaRootPolicy::Center,
            parallel: true,
        }
    }
}

/// How the sea's spanning tree picks its root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeaRootPolicy {
    /// Anchor at the provably empty cell nearest the centre, if there is one
    #[default]
    Center,
    /// Let the solver choose any sea cell
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Bound the number of island cells per tree depth
    pub layer_hints: bool,
    /// Bound the number of same-owner adjacent pairs per region
    pub edge_hints: bool,
    /// Give every tree cell exactly one neighbour one level up
    pub exclusive_parents: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            layer_hints: true,
            edge_hints: true,
            exclusive_parents: true,
        }
    }
}

impl EncodingConfig {
    /// Only the rows and items needed for correctness
    pub fn plain() -> Self {
        Self {
            layer_hints: false,
            edge_hints: false,
            exclusive_parents: false,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if let Some(ref instance) = self.input.instance_file {
            if !instance.exists() {
                anyhow::bail!("Instance file does not exist: {}", instance.display());
            }
        }

        if let (Some(instance), Some(model)) = (&self.input.instance_file, &self.output.model_file) {
            if instance == model {
                anyhow::bail!("Model file would overwrite the instance: {}", model.display());
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref instance_file) = cli_overrides.instance_file {
            self.input.instance_file = Some(instance_file.clone());
        }
        if let Some(ref model_file) = cli_overrides.model_file {
            self.output.model_file = Some(model_file.clone());
        }
        if let Some(format) = cli_overrides.report_format {
            self.output.report_format = format;
        }
        if cli_overrides.free_root {
            self.analysis.sea_root = SeaRootPolicy::Free;
        }
        if cli_overrides.sequential {
            self.analysis.parallel = false;
        }
        if cli_overrides.plain {
            self.encoding = EncodingConfig::plain();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub instance_file: Option<PathBuf>,
    pub model_file: Option<PathBuf>,
    pub report_format: Option<ReportFormat>,
    pub free_root: bool,
    pub sequential: bool,
    pub plain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.analysis.sea_root = SeaRootPolicy::Free;
        settings.output.report_format = ReportFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.analysis.sea_root, SeaRootPolicy::Free);
        assert_eq!(loaded.output.report_format, ReportFormat::Json);
        assert_eq!(loaded.encoding, EncodingConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("partial.yaml");
        std::fs::write(&path, "encoding:\n  edge_hints: false\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert!(!settings.encoding.edge_hints);
        assert!(settings.encoding.layer_hints);
        assert!(settings.analysis.parallel);
        assert!(settings.input.instance_file.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_instance() {
        let mut settings = Settings::default();
        settings.input.instance_file = Some(PathBuf::from("/definitely/not/here.txt"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            model_file: Some(PathBuf::from("out.dlx")),
            free_root: true,
            plain: true,
            ..Default::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.output.model_file, Some(PathBuf::from("out.dlx")));
        assert_eq!(settings.analysis.sea_root, SeaRootPolicy::Free);
        assert_eq!(settings.encoding, EncodingConfig::plain());
        assert!(settings.analysis.parallel);
    }
}
