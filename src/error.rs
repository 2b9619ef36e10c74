use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlicerError {
    #[error("Failed to load sheet '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read name file '{path}': {source}")]
    NameFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to scan for sheets with pattern '{pattern}': {message}")]
    SheetScan { pattern: String, message: String },

    #[error("Optimizer '{program}' failed on '{path}': {reason}")]
    Optimizer {
        program: String,
        path: PathBuf,
        reason: String,
    },
}
