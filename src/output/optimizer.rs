use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::error::SlicerError;

/// An external PNG optimizer such as `optipng`, run once per output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimizer {
    program: PathBuf,
    level: u8,
}

impl Optimizer {
    pub fn new(program: impl Into<PathBuf>, level: u8) -> Self {
        Self {
            program: program.into(),
            level,
        }
    }

    /// Look up `program` on `PATH`. Returns `None` when it is not installed.
    pub fn detect(program: &str, level: u8) -> Option<Self> {
        match which::which(program) {
            Ok(path) => {
                debug!("Found {} at {}", program, path.display());
                Some(Self::new(path, level))
            }
            Err(e) => {
                debug!("{} not available: {}", program, e);
                None
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed before the file path.
    pub fn args(&self) -> Vec<String> {
        vec![format!("-o{}", self.level), "-quiet".to_string()]
    }

    /// Optimize one file in place. All output of the tool is discarded.
    pub fn optimize(&self, path: &Path) -> Result<(), SlicerError> {
        let status = Command::new(&self.program)
            .args(self.args())
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| SlicerError::Optimizer {
                program: self.program.display().to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(SlicerError::Optimizer {
                program: self.program.display().to_string(),
                path: path.to_path_buf(),
                reason: format!("exited with {}", status),
            });
        }

        Ok(())
    }

    /// Optimize every file, logging and skipping failures.
    ///
    /// The files were already written, so a failed run leaves the
    /// unoptimized PNG in place. Returns the number of failures.
    pub fn optimize_all(&self, paths: &[PathBuf]) -> usize {
        let mut failures = 0;
        for path in paths {
            if let Err(e) = self.optimize(path) {
                warn!("{}", e);
                failures += 1;
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let opt = Optimizer::new("optipng", 2);
        assert_eq!(opt.args(), vec!["-o2", "-quiet"]);
        assert_eq!(opt.program(), Path::new("optipng"));
    }

    #[test]
    fn test_detect_missing_program() {
        assert_eq!(
            Optimizer::detect("definitely-not-a-real-png-optimizer-binary", 2),
            None
        );
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let opt = Optimizer::new("/nonexistent/optipng", 2);
        let err = opt.optimize(Path::new("x.png")).unwrap_err();
        assert!(matches!(err, SlicerError::Optimizer { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failures_are_counted_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"png").unwrap();

        let opt = Optimizer::new("false", 2);
        assert_eq!(opt.optimize_all(&[file.clone(), file.clone()]), 2);
        assert_eq!(std::fs::read(&file).unwrap(), b"png");
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run() {
        let opt = Optimizer::new("true", 2);
        assert!(opt.optimize(Path::new("whatever.png")).is_ok());
        assert_eq!(opt.optimize_all(&[PathBuf::from("a.png")]), 0);
    }
}
