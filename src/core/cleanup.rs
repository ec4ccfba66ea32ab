//! Working directory cleanup
//!
//! Deletes everything below the session's working directory. The first
//! entry that cannot be removed stops the purge; entries already removed
//! stay removed. The root directory itself is kept.

use crate::domain::errors::TilepackError;
use crate::domain::Result;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Filesystem removal primitives
pub trait EntryRemover: Send + Sync {
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// Removes entries with `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdRemover;

impl EntryRemover for StdRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }
}

/// Purges session artifacts from the working directory
#[derive(Clone)]
pub struct SessionCleanup {
    remover: Arc<dyn EntryRemover>,
}

impl Default for SessionCleanup {
    fn default() -> Self {
        Self::new(Arc::new(StdRemover))
    }
}

impl SessionCleanup {
    pub fn new(remover: Arc<dyn EntryRemover>) -> Self {
        Self { remover }
    }

    /// Delete all files and subdirectories under `root`
    ///
    /// Returns `false` if any entry could not be removed. Failures are
    /// logged and never propagated.
    pub fn purge_working_directory(&self, root: &Path) -> bool {
        match self.try_purge(root) {
            Ok(removed) => {
                tracing::info!(root = %root.display(), removed, "Working directory purged");
                true
            }
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Working directory purge incomplete");
                false
            }
        }
    }

    /// Delete all entries under `root`, returning how many were removed
    ///
    /// A missing root counts as already clean.
    ///
    /// # Errors
    ///
    /// Returns `Cleanup` naming the first entry that could not be removed.
    pub fn try_purge(&self, root: &Path) -> Result<usize> {
        if !root.exists() {
            return Ok(0);
        }
        if !root.is_dir() {
            return Err(TilepackError::Cleanup(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }
        self.purge_children(root)
    }

    fn purge_children(&self, dir: &Path) -> Result<usize> {
        let mut entries = std::fs::read_dir(dir)
            .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
            .map_err(|e| cleanup_error(dir, e))?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut removed = 0;
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| cleanup_error(&path, e))?;

            if file_type.is_dir() {
                removed += self.purge_children(&path)?;
                self.remover
                    .remove_dir(&path)
                    .map_err(|e| cleanup_error(&path, e))?;
            } else {
                self.remover
                    .remove_file(&path)
                    .map_err(|e| cleanup_error(&path, e))?;
            }
            removed += 1;
        }
        Ok(removed)
    }
}

fn cleanup_error(path: &Path, err: io::Error) -> TilepackError {
    TilepackError::Cleanup(format!("Failed to remove '{}': {err}", path.display()))
}
