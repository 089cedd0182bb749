//! Shared test utilities for the memory-game test suite.
//!
//! Provides fixture setup, small builders for collection directories, and
//! lookup helpers that work with scan-phase data ([`Collection`]).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let collections = scan(tmp.path()).unwrap();
//!
//! let ocean = find_collection(&collections, "ocean_life");
//! assert_eq!(ocean.metadata.title, "Ocean Life");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::scan::Collection;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/collections/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/collections");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// Create `root/name/` holding placeholder files. Only extensions matter to
/// the scanner, so file contents are fake.
pub fn write_collection(root: &Path, name: &str, files: &[&str]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), "fake image").unwrap();
    }
    dir
}

/// Write `root/name/description.json` with raw content.
pub fn write_description_json(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name).join("description.json"), content).unwrap();
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a collection by id. Panics if not found.
pub fn find_collection<'a>(collections: &'a [Collection], id: &str) -> &'a Collection {
    collections
        .iter()
        .find(|c| c.id == id)
        .unwrap_or_else(|| {
            let ids = collection_ids(collections);
            panic!("collection '{id}' not found. Available: {ids:?}")
        })
}

/// All collection ids in scan order.
pub fn collection_ids(collections: &[Collection]) -> Vec<&str> {
    collections.iter().map(|c| c.id.as_str()).collect()
}
