mod discover;
pub mod geometry;
mod names;

pub use discover::find_sheets;
pub use geometry::{Region, Slot, SlotKind, crop_region, has_expected_dimensions, sheet_slots};
pub use names::{CharacterNames, load_character_names, name_file_path, sanitize_filename};
