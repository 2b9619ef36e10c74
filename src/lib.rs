pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod sheet;

pub use cli::{CliArgs, CompressionLevel};
pub use error::SlicerError;
pub use extract::{BatchReport, SheetExtractor, SheetReport, SliceOptions, run_batch};
pub use sheet::{CharacterNames, Slot, SlotKind, sanitize_filename};
