//! Main CLI application for the Nurikabe model compiler

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nurikabe_xcc::{
    config::{CliOverrides, EncodingConfig, ReportFormat, SeaRootPolicy, Settings},
    cover::ModelEncoder,
    nurikabe::{io::sample_puzzle, load_puzzle_from_file, load_puzzle_from_reader, save_puzzle_to_file, Puzzle},
    utils::{ColorOutput, ReportFormatter},
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "nurikabe_xcc")]
#[command(about = "Nurikabe exact-cover model compiler")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an instance into a dlx3 model
    Compile {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file (overrides config, standard input by default)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Model file (overrides config, standard output by default)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Let any sea cell be the root of the sea tree
        #[arg(long)]
        free_root: bool,

        /// Leave out the layer, edge and exclusive-parent refinements
        #[arg(long)]
        plain: bool,

        /// Analyze islands one at a time
        #[arg(long)]
        sequential: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report the reachability analysis of an instance
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file (overrides config, standard input by default)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report format (overrides config)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<ReportFormat>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a default configuration and a sample instance
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_format(value: &str) -> Result<ReportFormat, String> {
    match value {
        "text" => Ok(ReportFormat::Text),
        "json" => Ok(ReportFormat::Json),
        other => Err(format!("unknown report format '{}', expected text or json", other)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            config, input, output, free_root, plain, sequential, verbose
        } => {
            init_logging(verbose);
            let overrides = CliOverrides {
                instance_file: input,
                model_file: output,
                free_root,
                plain,
                sequential,
                ..Default::default()
            };
            compile_command(config, &overrides)
        }
        Commands::Analyze { config, input, format, verbose } => {
            init_logging(verbose);
            let overrides = CliOverrides {
                instance_file: input,
                report_format: format,
                ..Default::default()
            };
            analyze_command(config, &overrides)
        }
        Commands::Setup { directory, force } => {
            init_logging(false);
            setup_command(directory, force)
        }
    }
}

/// Diagnostics go to standard error; `RUST_LOG` takes precedence
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        log::warn!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate()
        .context("Configuration validation failed")?;
    Ok(settings)
}

fn load_puzzle(settings: &Settings) -> Result<Puzzle> {
    match settings.input.instance_file {
        Some(ref path) => load_puzzle_from_file(path),
        None => load_puzzle_from_reader(std::io::stdin().lock()),
    }
}

fn compile_command(config_path: PathBuf, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(&config_path, overrides)?;
    let puzzle = load_puzzle(&settings)?;

    let start_time = Instant::now();
    let encoder = ModelEncoder::new(puzzle, settings.clone())
        .context("Failed to prepare the encoder")?;
    let (model, statistics) = encoder.encode()
        .context("Failed to compile the model")?;
    log::debug!("Compiled in {:.3}s\n{}", start_time.elapsed().as_secs_f64(), statistics);

    // Nothing is written until the whole model exists
    let rendered = model.render();
    match settings.output.model_file {
        Some(ref path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write model to {}", path.display()))?;
            eprintln!("{}", ColorOutput::success(&format!(
                "Wrote {} rows to {}", statistics.distinct_rows, path.display()
            )));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write model to standard output")?;
        }
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(&config_path, overrides)?;
    let puzzle = load_puzzle(&settings)?;

    let encoder = ModelEncoder::new(puzzle, settings.clone())
        .context("Failed to analyze the instance")?;
    let (_, statistics) = encoder.encode()
        .context("Failed to compile the model")?;

    let report = ReportFormatter::build(&encoder, statistics);
    let rendered = ReportFormatter::format(&report, settings.output.report_format)?;
    print!("{}", rendered);

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    let instance_dir = directory.join("instances");

    for dir in [&config_dir, &instance_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Skipped: {} (already exists)", config_path.display()
        )));
    }

    // Sample instance
    let sample_path = instance_dir.join("sample.txt");
    if !sample_path.exists() || force {
        let sample = sample_puzzle().context("Failed to build the sample instance")?;
        save_puzzle_to_file(&sample, &sample_path)?;
        println!("Created: {}", sample_path.display());
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Skipped: {} (already exists)", sample_path.display()
        )));
    }

    // Configuration variants
    let variants_dir = config_dir.join("variants");
    let mut free_root = Settings::default();
    free_root.input.instance_file = Some(PathBuf::from("instances/sample.txt"));
    free_root.analysis.sea_root = SeaRootPolicy::Free;
    free_root.to_file(&variants_dir.join("free_root.yaml"))?;

    let mut plain = Settings::default();
    plain.input.instance_file = Some(PathBuf::from("instances/sample.txt"));
    plain.encoding = EncodingConfig::plain();
    plain.to_file(&variants_dir.join("plain.yaml"))?;

    println!("Created configuration variants in: {}", variants_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: nurikabe_xcc compile --input {} > sample.dlx", sample_path.display());

    Ok(())
}
