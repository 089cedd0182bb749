//! Collections discovery and path resolution.
//!
//! The collections root is a flat directory of collections, one folder each:
//!
//! ```text
//! collections/                     # Collections root
//! ├── animals/                     # Implicit pairs: one per image
//! │   ├── description.md           # Description (optional)
//! │   ├── cat.png
//! │   └── dog.jpg
//! ├── ocean_life/                  # Title defaults to "Ocean Life"
//! │   ├── description.json         # Title, icon, source, pairs (optional)
//! │   ├── crab.svg
//! │   └── whale.png
//! ├── vocabulary/                  # Text-only cards, no images needed
//! │   └── description.json
//! ├── empty/                       # No images, no pairs: not a collection
//! └── .drafts/                     # Hidden: ignored
//! ```
//!
//! ## Rules
//!
//! - Collections are listed in lexicographic directory order.
//! - Assets are files with an image extension (`png`, `jpg`, `jpeg`, `svg`,
//!   `gif`, `webp`, any case), sorted by filename. Subdirectories are ignored.
//! - A directory is a collection when it has at least one asset or declares
//!   `pairs` in its metadata.
//! - Nothing is cached: every call reads the filesystem again.
//!
//! ## Path safety
//!
//! Collection ids and filenames come straight from request paths. Both are
//! resolved to canonical paths and must land directly inside their parent
//! (the root, or the collection directory) before anything is read.

use crate::metadata::{self, CollectionMetadata, MetadataError};
use crate::pairs::{self, PairDefinition, PairError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Collections directory is missing on the server: {0}")]
    RootMissing(PathBuf),
    #[error("Collection not found.")]
    CollectionNotFound,
    #[error("Collection contains no playable assets.")]
    NoAssets,
    #[error("Asset not found in collection.")]
    AssetNotFound,
    #[error("{0}")]
    Metadata(#[from] MetadataError),
    #[error("{0}")]
    Pairs(#[from] PairError),
}

impl ScanError {
    /// Whether this error means the requested thing is absent (as opposed to
    /// the server being misconfigured).
    pub fn is_not_found(&self) -> bool {
        match self {
            ScanError::CollectionNotFound | ScanError::NoAssets | ScanError::AssetNotFound => true,
            ScanError::Pairs(e) => e.is_not_found(),
            _ => false,
        }
    }
}

pub const ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "gif", "webp"];

/// A collection directory with its metadata and assets, read fresh from disk.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Directory name, used as the collection id in URLs.
    pub id: String,
    pub dir: PathBuf,
    pub metadata: CollectionMetadata,
    /// Asset filenames in sorted order.
    pub assets: Vec<String>,
}

impl Collection {
    /// Load a collection from its directory.
    pub fn load(dir: &Path) -> Result<Self, ScanError> {
        let id = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let assets = list_assets(dir)?;
        let metadata = metadata::read_collection_metadata(dir)?;
        Ok(Self {
            id,
            dir: dir.to_path_buf(),
            metadata,
            assets,
        })
    }

    /// Has something to play with: images, or a declared pair list.
    pub fn is_playable(&self) -> bool {
        !self.assets.is_empty() || self.metadata.pairs.is_some()
    }

    /// Resolve the card pairs of this collection.
    pub fn pairs(&self) -> Result<Vec<PairDefinition>, PairError> {
        pairs::resolve_pairs(self.metadata.pairs.as_ref(), &self.assets)
    }

    /// The asset shown as the collection's icon.
    pub fn icon(&self) -> Option<&str> {
        resolve_icon(self.metadata.icon.as_deref(), &self.assets)
    }
}

/// Pick the icon: the declared one if it is an asset, else the first asset.
pub fn resolve_icon<'a>(declared: Option<&'a str>, assets: &'a [String]) -> Option<&'a str> {
    declared
        .filter(|icon| assets.iter().any(|a| a == icon))
        .or_else(|| assets.first().map(String::as_str))
}

/// Fail unless the collections root exists and is a directory.
pub fn ensure_root(root: &Path) -> Result<(), ScanError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ScanError::RootMissing(root.to_path_buf()))
    }
}

/// Scan the collections root and return every playable collection, sorted by id.
pub fn scan(root: &Path) -> Result<Vec<Collection>, ScanError> {
    ensure_root(root)?;

    let mut collections = Vec::new();
    for dir in collect_dirs(root)? {
        let collection = Collection::load(&dir)?;
        if collection.is_playable() {
            collections.push(collection);
        } else {
            tracing::debug!(collection = %collection.id, "skipping directory without assets or pairs");
        }
    }
    Ok(collections)
}

/// Outcome of checking one directory under the collections root.
#[derive(Debug)]
pub enum Inspection {
    /// Playable collection with its resolved pairs.
    Playable {
        collection: Collection,
        pairs: Vec<PairDefinition>,
    },
    /// Directory that is not a collection.
    Skipped { id: String, reason: String },
    /// Misconfigured collection.
    Broken { id: String, error: ScanError },
}

/// Check every directory under the root, collecting problems instead of
/// stopping at the first one.
pub fn inspect(root: &Path) -> Result<Vec<Inspection>, ScanError> {
    ensure_root(root)?;

    let inspections = collect_dirs(root)?
        .into_iter()
        .map(|dir| {
            let id = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let collection = match Collection::load(&dir) {
                Ok(c) => c,
                Err(error) => return Inspection::Broken { id, error },
            };
            if !collection.is_playable() {
                return Inspection::Skipped {
                    id,
                    reason: "no images or pairs".to_string(),
                };
            }
            match collection.pairs() {
                Ok(pairs) => Inspection::Playable { collection, pairs },
                Err(e) if e.is_not_found() => Inspection::Skipped {
                    id,
                    reason: e.to_string(),
                },
                Err(e) => Inspection::Broken {
                    id,
                    error: e.into(),
                },
            }
        })
        .collect();
    Ok(inspections)
}

/// Visible subdirectories of the root. Symlinks leading elsewhere are skipped
/// so the listing agrees with [`resolve_collection_dir`].
fn collect_dirs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let canonical_root = root.canonicalize()?;
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && !is_hidden(p) && resolves_inside(p, &canonical_root))
        .collect();

    dirs.sort();
    Ok(dirs)
}

/// Sorted asset filenames of a collection directory.
///
/// Only files [`resolve_asset_path`] would serve are listed: symlinks that
/// lead out of the directory are skipped.
pub fn list_assets(dir: &Path) -> Result<Vec<String>, ScanError> {
    let canonical_dir = dir.canonicalize()?;
    let mut assets: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_asset(p) && resolves_inside(p, &canonical_dir))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
        .collect();

    assets.sort();
    Ok(assets)
}

/// A regular, non-hidden file with an allowed image extension.
pub fn is_asset(path: &Path) -> bool {
    path.is_file() && has_asset_extension(path) && !is_hidden(path)
}

/// Whether `path` canonicalizes to a direct child of `canonical_parent`.
fn resolves_inside(path: &Path, canonical_parent: &Path) -> bool {
    path.canonicalize()
        .is_ok_and(|c| c.parent() == Some(canonical_parent))
}

fn has_asset_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    ASSET_EXTENSIONS.contains(&ext.as_str())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true)
}

/// Resolve a collection id from a request to its directory.
///
/// `..` sequences are stripped first; the result must then canonicalize to a
/// directory whose parent is the canonical root.
pub fn resolve_collection_dir(root: &Path, collection_id: &str) -> Result<PathBuf, ScanError> {
    ensure_root(root)?;

    let safe_id = collection_id.trim().replace("..", "");
    if safe_id.is_empty() {
        return Err(ScanError::CollectionNotFound);
    }

    let root = root.canonicalize()?;
    let candidate = root
        .join(&safe_id)
        .canonicalize()
        .map_err(|_| ScanError::CollectionNotFound)?;

    if candidate.parent() != Some(root.as_path()) || !candidate.is_dir() || is_hidden(&candidate) {
        return Err(ScanError::CollectionNotFound);
    }
    Ok(candidate)
}

/// Resolve a requested filename to an asset file inside `collection_dir`.
pub fn resolve_asset_path(collection_dir: &Path, filename: &str) -> Result<PathBuf, ScanError> {
    if filename.is_empty() || filename.contains(['/', '\\']) {
        return Err(ScanError::AssetNotFound);
    }

    let dir = collection_dir.canonicalize()?;
    let candidate = dir
        .join(filename)
        .canonicalize()
        .map_err(|_| ScanError::AssetNotFound)?;

    if candidate.parent() != Some(dir.as_path()) || !is_asset(&candidate) {
        return Err(ScanError::AssetNotFound);
    }
    Ok(candidate)
}

/// Load the collection named by a request id.
pub fn load_collection(root: &Path, collection_id: &str) -> Result<Collection, ScanError> {
    let dir = resolve_collection_dir(root, collection_id)?;
    Collection::load(&dir)
}
