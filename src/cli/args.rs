use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "sheet-slicer")]
#[command(
    version,
    about = "Slice NPC sprite sheets into face sprites and portraits",
    long_about = None
)]
pub struct CliArgs {
    /// Output directory for extracted images [default: extracted_sprites]
    pub output_dir: Option<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to scan for sprite sheets [default: .]
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Filename prefix that identifies sprite sheets [default: npc-sprites-]
    #[arg(long)]
    pub prefix: Option<String>,

    /// In-process PNG compression (0-6 or 'max') [default: 2]
    #[arg(long, value_name = "LEVEL")]
    pub compress: Option<CompressionLevel>,

    /// Never run the external PNG optimizer, even if it is installed
    #[arg(long)]
    pub no_optimizer: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
