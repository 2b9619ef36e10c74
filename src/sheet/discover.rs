use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::SlicerError;

/// Find sprite sheets directly inside `dir` whose filename starts with
/// `prefix` and ends with one of `extensions`.
///
/// Matching is case-sensitive and non-recursive. The result is sorted and
/// free of duplicates.
pub fn find_sheets(
    dir: &Path,
    prefix: &str,
    extensions: &[String],
) -> Result<Vec<PathBuf>, SlicerError> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let prefix = Pattern::escape(prefix);
    let mut sheets = Vec::new();

    for ext in extensions {
        let pattern = Path::new(&base)
            .join(format!("{}*.{}", prefix, Pattern::escape(ext)))
            .to_string_lossy()
            .into_owned();

        let entries = glob::glob(&pattern).map_err(|e| SlicerError::SheetScan {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = entry.map_err(|e| SlicerError::SheetScan {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            if path.is_file() {
                sheets.push(path);
            }
        }
    }

    sheets.sort();
    sheets.dedup();
    Ok(sheets)
}
