use std::path::PathBuf;

use log::info;

use super::{SheetExtractor, SheetReport};
use crate::cli::CompressionLevel;
use crate::config::OptimizerConfig;
use crate::error::SlicerError;
use crate::output::Optimizer;
use crate::sheet::find_sheets;

/// Settings for one run over a directory of sheets.
#[derive(Debug, Clone)]
pub struct SliceOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub extensions: Vec<String>,
    pub compress: Option<CompressionLevel>,
    pub optimizer: Option<Optimizer>,
}

/// Result of a whole run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub sheets: Vec<SheetReport>,
}

impl BatchReport {
    /// Total number of files written across all sheets
    pub fn files_written(&self) -> usize {
        self.sheets.iter().map(|s| s.written.len()).sum()
    }
}

/// Resolve the external optimizer from config, logging whether it will be used.
pub fn detect_optimizer(config: &OptimizerConfig) -> Option<Optimizer> {
    if !config.enabled {
        info!("External PNG optimizer disabled");
        return None;
    }

    match Optimizer::detect(&config.program, config.level) {
        Some(optimizer) => {
            info!(
                "{} detected - will use for additional optimization",
                config.program
            );
            Some(optimizer)
        }
        None => {
            info!(
                "{} not found - using built-in PNG compression only",
                config.program
            );
            info!("  Install optipng for better compression:");
            info!("    macOS:   brew install optipng");
            info!("    Linux:   apt-get install optipng  (or yum/pacman)");
            info!("    Windows: choco install optipng");
            None
        }
    }
}

/// Slice every matching sheet in `options.input_dir`, in sorted order.
///
/// Returns an empty report without touching the output directory when no
/// sheet matches. The first failing sheet aborts the run.
pub fn run_batch(options: &SliceOptions) -> Result<BatchReport, SlicerError> {
    let sheets = find_sheets(&options.input_dir, &options.prefix, &options.extensions)?;

    if sheets.is_empty() {
        info!(
            "No sprite sheets found matching pattern '{}*' in {}",
            options.prefix,
            options.input_dir.display()
        );
        info!("Usage: sheet-slicer [output_directory]");
        return Ok(BatchReport::default());
    }

    info!("Found {} sprite sheet(s)", sheets.len());
    info!("Output directory: {}", options.output_dir.display());

    let extractor = SheetExtractor::new()
        .compress(options.compress)
        .optimizer(options.optimizer.clone());

    let mut report = BatchReport::default();
    for sheet in &sheets {
        report
            .sheets
            .push(extractor.extract(sheet, &options.output_dir)?);
    }

    info!(
        "All done! Extracted sprites saved to '{}/' directory",
        options.output_dir.display()
    );

    Ok(report)
}
