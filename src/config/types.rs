use serde::{Deserialize, Serialize};

use crate::cli::CompressionLevel;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

impl CompressConfig {
    /// Convert to a compression level, rejecting out-of-range values.
    pub fn to_level(&self) -> Option<CompressionLevel> {
        match self {
            CompressConfig::Level(n) if *n <= 6 => Some(CompressionLevel::Level(*n)),
            CompressConfig::Max(s) if s.eq_ignore_ascii_case("max") => Some(CompressionLevel::Max),
            _ => None,
        }
    }
}

/// External optimizer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Run the optimizer when it can be found on PATH
    pub enabled: bool,
    /// Program name or path
    pub program: String,
    /// Value passed as `-o<level>`
    pub level: u8,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "optipng".to_string(),
            level: 2,
        }
    }
}

/// Slicer configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlicerConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Directory scanned for sprite sheets
    pub input_dir: String,
    /// Directory extracted images are written to
    pub output_dir: String,
    /// Filename prefix that identifies a sprite sheet
    pub prefix: String,
    /// Accepted sheet extensions (case-sensitive, without the dot)
    pub extensions: Vec<String>,
    /// In-process PNG compression (optional)
    pub compress: Option<CompressConfig>,
    /// External optimizer settings
    pub optimizer: OptimizerConfig,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input_dir: ".".to_string(),
            output_dir: "extracted_sprites".to_string(),
            prefix: "npc-sprites-".to_string(),
            extensions: vec!["png".to_string(), "webp".to_string(), "jpg".to_string()],
            compress: Some(CompressConfig::Level(2)),
            optimizer: OptimizerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: SlicerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SlicerConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: SlicerConfig = serde_json::from_str(
            r#"{ "prefix": "hero-", "compress": "max", "optimizer": { "enabled": false } }"#,
        )
        .unwrap();
        assert_eq!(config.prefix, "hero-");
        assert_eq!(config.output_dir, "extracted_sprites");
        assert_eq!(
            config.compress.and_then(|c| c.to_level()),
            Some(CompressionLevel::Max)
        );
        assert!(!config.optimizer.enabled);
        assert_eq!(config.optimizer.program, "optipng");
        assert_eq!(config.optimizer.level, 2);
    }

    #[test]
    fn test_null_compress_disables_compression() {
        let config: SlicerConfig = serde_json::from_str(r#"{ "compress": null }"#).unwrap();
        assert!(config.compress.is_none());
    }

    #[test]
    fn test_compress_config_range() {
        assert_eq!(
            CompressConfig::Level(6).to_level(),
            Some(CompressionLevel::Level(6))
        );
        assert_eq!(CompressConfig::Level(9).to_level(), None);
        assert_eq!(CompressConfig::Max("fast".to_string()).to_level(), None);
    }
}
