//! Collection metadata loading and normalization.
//!
//! Each collection directory may carry one metadata file. The first one found
//! wins, the other is never read:
//!
//! ## `description.json` (structured)
//!
//! A JSON object with any of these fields:
//!
//! ```json
//! {
//!   "Title:": "Ocean Life",
//!   "description": "Creatures of the deep",
//!   "icon": "whale.png",
//!   "Source": "Public domain illustrations",
//!   "pairs": [[{"image": "whale.png"}, {"text": "Whale"}]]
//! }
//! ```
//!
//! Field lookup is forgiving about how people type keys in a hurry: `title`,
//! `Title` and `Title:` are equivalent (see [`crate::naming::field_keys`]).
//! A malformed file is a server misconfiguration, not a missing collection.
//!
//! ## `description.md` (plain text)
//!
//! The whole file, trimmed, becomes the description.
//!
//! ## Resolution priority
//!
//! - **Title**: JSON title → directory name (`ocean_life` → "Ocean Life")
//! - **Description**: JSON description → `description.md` → None
//! - **Icon / Source / Pairs**: JSON only
//!
//! The icon named here is only a preference: the scanner falls back to the
//! first asset when it does not exist (see [`crate::scan::resolve_icon`]).

use crate::naming;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DESCRIPTION_JSON: &str = "description.json";
pub const DESCRIPTION_MD: &str = "description.md";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {file}: {source}")]
    InvalidJson {
        file: String,
        source: serde_json::Error,
    },
    #[error("Invalid metadata in {0}: expected a JSON object at the top level")]
    NotAnObject(String),
}

/// Normalized metadata for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionMetadata {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub source: Option<String>,
    /// Raw `pairs` declaration, validated later by [`crate::pairs`].
    /// `None` means the collection falls back to one pair per image.
    pub pairs: Option<Value>,
}

impl CollectionMetadata {
    fn with_title(title: String) -> Self {
        Self {
            title,
            description: None,
            icon: None,
            source: None,
            pairs: None,
        }
    }
}

/// Read and normalize the metadata of a collection directory.
pub fn read_collection_metadata(collection_dir: &Path) -> Result<CollectionMetadata, MetadataError> {
    let dir_name = collection_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let default_title = naming::default_title(&dir_name);

    let json_path = collection_dir.join(DESCRIPTION_JSON);
    if json_path.is_file() {
        let content = fs::read_to_string(&json_path)?;
        let data = parse_description_json(&content)?;

        return Ok(CollectionMetadata {
            title: extract_field(&data, "title").unwrap_or(default_title),
            description: extract_field(&data, "description"),
            icon: extract_field(&data, "icon"),
            source: extract_field(&data, "source"),
            pairs: lookup(&data, "pairs").cloned(),
        });
    }

    let mut metadata = CollectionMetadata::with_title(default_title);

    let md_path = collection_dir.join(DESCRIPTION_MD);
    if md_path.is_file() {
        let content = fs::read_to_string(&md_path)?;
        metadata.description = resolve(&[Some(content.as_str())]);
    }

    Ok(metadata)
}

fn parse_description_json(content: &str) -> Result<Map<String, Value>, MetadataError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| MetadataError::InvalidJson {
            file: DESCRIPTION_JSON.to_string(),
            source,
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(MetadataError::NotAnObject(DESCRIPTION_JSON.to_string())),
    }
}

/// First non-null value stored under any accepted spelling of `field`.
fn lookup<'a>(data: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    naming::field_keys(field)
        .iter()
        .filter_map(|key| data.get(key))
        .find(|value| !value.is_null())
}

/// Extract a text field, trying every accepted key spelling in order.
///
/// Strings, numbers and booleans (`True` / `False`) count as text; the
/// first one that is non-empty after trimming wins.
pub fn extract_field(data: &Map<String, Value>, field: &str) -> Option<String> {
    let candidates: Vec<Option<String>> = naming::field_keys(field)
        .iter()
        .map(|key| data.get(key).and_then(scalar_text))
        .collect();
    let borrowed: Vec<Option<&str>> = candidates.iter().map(|c| c.as_deref()).collect();
    resolve(&borrowed)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value, trimmed.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}
