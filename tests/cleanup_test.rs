//! Integration tests for working directory cleanup

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tilepack::core::{EntryRemover, SessionCleanup, StdRemover};
use tilepack::domain::TilepackError;

/// Delegates to the filesystem but refuses one directory
struct LockedDirRemover {
    locked: &'static str,
}

impl EntryRemover for LockedDirRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        StdRemover.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        if path.file_name().is_some_and(|name| name == self.locked) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
        }
        StdRemover.remove_dir(path)
    }
}

fn populate(root: &Path) {
    fs::create_dir_all(root.join("a/nested/deeper")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a/nested/deeper/tiles.tpk"), b"{}").unwrap();
    fs::write(root.join("a/one.tpk"), b"{}").unwrap();
    fs::write(root.join("b/two.tpk"), b"{}").unwrap();
    fs::write(root.join("c.tpk"), b"{}").unwrap();
}

#[test]
fn test_purge_removes_nested_tree() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());

    let removed = SessionCleanup::default().try_purge(temp.path()).unwrap();

    assert_eq!(removed, 8);
    assert!(temp.path().exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_purge_stops_at_first_failure() {
    let temp = TempDir::new().unwrap();
    populate(temp.path());
    let cleanup = SessionCleanup::new(Arc::new(LockedDirRemover { locked: "a" }));

    let result = cleanup.try_purge(temp.path());

    assert!(matches!(result, Err(TilepackError::Cleanup(ref msg)) if msg.contains("locked")));
    // Children of the locked directory are already gone
    assert!(temp.path().join("a").exists());
    assert!(!temp.path().join("a/one.tpk").exists());
    // Entries after it are untouched
    assert!(temp.path().join("b/two.tpk").exists());
    assert!(temp.path().join("c.tpk").exists());
    assert!(!cleanup.purge_working_directory(temp.path()));
}

#[test]
fn test_purge_missing_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("never-created");

    assert!(SessionCleanup::default().purge_working_directory(&missing));
    assert!(!missing.exists());
}

#[test]
fn test_purge_rejects_file_root() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("tiles.tpk");
    fs::write(&file, b"{}").unwrap();

    let result = SessionCleanup::default().try_purge(&file);

    assert!(matches!(result, Err(TilepackError::Cleanup(_))));
    assert!(file.exists());
}
