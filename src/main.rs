use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use sheet_slicer::cli::{CliArgs, CompressionLevel};
use sheet_slicer::config::{LoadedConfig, OptimizerConfig, SlicerConfig};
use sheet_slicer::extract::{SliceOptions, detect_optimizer, run_batch};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(&cli)?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Sheet slicer v{}", env!("CARGO_PKG_VERSION"));

    let optimizer = detect_optimizer(&merged.optimizer);

    let options = SliceOptions {
        input_dir: merged.input_dir,
        output_dir: merged.output_dir,
        prefix: merged.prefix,
        extensions: merged.extensions,
        compress: merged.compress,
        optimizer,
    };

    run_batch(&options).context("sprite extraction failed")?;

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    prefix: String,
    extensions: Vec<String>,
    compress: Option<CompressionLevel>,
    optimizer: OptimizerConfig,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CliArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let defaults = SlicerConfig::default();

    // Directories: CLI > config > default
    let input_dir = args.input_dir.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_input_dir())
            .unwrap_or_else(|| PathBuf::from(&defaults.input_dir))
    });

    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from(&defaults.output_dir))
    });

    let config = loaded_config
        .map(|lc| lc.config)
        .unwrap_or(defaults);

    let prefix = args.prefix.clone().unwrap_or(config.prefix);

    // Compress: CLI option overrides config; an explicit null in config disables it
    let compress = if args.compress.is_some() {
        args.compress
    } else {
        match &config.compress {
            Some(c) => Some(c.to_level().ok_or_else(|| {
                anyhow::anyhow!(
                    "invalid compress value {:?} in config file. Valid values: 0-6, \"max\"",
                    c
                )
            })?),
            None => None,
        }
    };

    let mut optimizer = config.optimizer;
    if args.no_optimizer {
        optimizer.enabled = false;
    }

    Ok(MergedConfig {
        input_dir,
        output_dir,
        prefix,
        extensions: config.extensions,
        compress,
        optimizer,
        verbose: args.verbose,
    })
}
