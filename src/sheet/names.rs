use std::path::{Path, PathBuf};

use log::warn;

use super::geometry::CHARACTER_SLOTS;
use crate::error::SlicerError;

/// Character names read from a sheet's sidecar file, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterNames {
    names: Vec<String>,
}

impl CharacterNames {
    /// Parse one name per line, skipping blank lines and trimming whitespace.
    pub fn parse(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    /// Name for a character index, if the file provided one.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Sidecar name file for a sheet: same path with a `.txt` extension.
pub fn name_file_path(sheet_path: &Path) -> PathBuf {
    sheet_path.with_extension("txt")
}

/// Load character names for a sheet.
///
/// Returns `Ok(None)` when the sidecar file does not exist. A count other than
/// the number of character slots is reported but not corrected.
pub fn load_character_names(sheet_path: &Path) -> Result<Option<CharacterNames>, SlicerError> {
    let path = name_file_path(sheet_path);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| SlicerError::NameFileRead {
        path: path.clone(),
        source: e,
    })?;
    let names = CharacterNames::parse(&content);

    if names.len() != CHARACTER_SLOTS {
        warn!(
            "Expected {} names in {}, found {}",
            CHARACTER_SLOTS,
            path.display(),
            names.len()
        );
        warn!("Names should be provided for all 20 characters (5 rows x 4 sprites)");
    }

    Ok(Some(names))
}

/// Make a character name safe for use in a filename.
///
/// Spaces become underscores; anything else that is not alphanumeric, `_` or
/// `-` is dropped. Distinct names may map to the same result.
pub fn sanitize_filename(name: &str) -> String {
    name.replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
