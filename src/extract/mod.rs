mod batch;
mod extractor;
mod types;

pub use batch::{BatchReport, SliceOptions, detect_optimizer, run_batch};
pub use extractor::{SheetExtractor, output_filename, sheet_base_name, slice_sheet};
pub use types::{ExtractedImage, SheetReport};
