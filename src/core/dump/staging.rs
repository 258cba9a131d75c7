//! Scratch file lifetime
//!
//! [`StagingFiles`] owns the scratch files of one run and deletes them when it
//! is released or dropped, so they are removed on success, on error, on a
//! halted hook chain, and when the run's future is dropped or panics.

use std::io::ErrorKind;
use std::path::PathBuf;

/// Outcome of deleting the staging files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    /// Files that never existed, e.g. production failed before writing
    pub absent: usize,
    pub failed: usize,
}

/// Guard deleting a run's scratch files
#[derive(Debug)]
pub struct StagingFiles {
    paths: Vec<PathBuf>,
    released: bool,
}

impl StagingFiles {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            released: false,
        }
    }

    /// Delete the files now and report what happened
    pub fn release(mut self) -> CleanupReport {
        self.remove_all()
    }

    fn remove_all(&mut self) -> CleanupReport {
        self.released = true;
        let mut report = CleanupReport::default();
        for path in &self.paths {
            match std::fs::remove_file(path) {
                Ok(()) => report.removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => report.absent += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove staging file"
                    );
                }
            }
        }
        report
    }
}

impl Drop for StagingFiles {
    fn drop(&mut self) {
        if !self.released {
            let report = self.remove_all();
            tracing::debug!(
                removed = report.removed,
                absent = report.absent,
                failed = report.failed,
                "Staging files released on unwind"
            );
        }
    }
}
