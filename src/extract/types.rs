use std::path::PathBuf;

use image::DynamicImage;

use crate::sheet::Slot;
use crate::sheet::geometry::SHEET_SIZE;

/// A cropped sheet region and the filename it will be written under.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub slot: Slot,
    pub filename: String,
    pub image: DynamicImage,
}

/// Outcome of slicing one sheet
#[derive(Debug, Clone, Default)]
pub struct SheetReport {
    /// Sheet that was processed
    pub sheet: PathBuf,
    /// Decoded sheet width
    pub width: u32,
    /// Decoded sheet height
    pub height: u32,
    /// Names loaded from the sidecar file, if it existed
    pub names_loaded: Option<usize>,
    /// Every file written, in extraction order
    pub written: Vec<PathBuf>,
    /// Files the external optimizer failed on (left unoptimized)
    pub optimizer_failures: usize,
}

impl SheetReport {
    /// Whether the sheet had the expected 160x160 size
    pub fn has_expected_dimensions(&self) -> bool {
        (self.width, self.height) == (SHEET_SIZE, SHEET_SIZE)
    }
}
