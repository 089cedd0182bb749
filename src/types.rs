//! Response types served by the HTTP API.
//!
//! These are the JSON shapes the game client consumes. They are built fresh
//! for every request from scan-phase data ([`crate::scan::Collection`],
//! [`crate::pairs::PairDefinition`]) plus the URLs of the request.

use serde::{Deserialize, Serialize};

/// One entry of `GET /collections`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// URL of the icon asset; `None` when the collection has no images.
    pub icon_url: Option<String>,
    pub pairs_url: String,
    pub images_url: String,
    pub image_count: usize,
    pub pair_count: usize,
    pub source: Option<String>,
}

/// A card face as sent to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Face {
    Image { filename: String, url: String },
    Markdown { content: String },
}

/// One entry of `GET /collections/{id}/pairs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pair {
    pub cards: [Face; 2],
}

/// One entry of `GET /collections/{id}/images`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageAsset {
    pub filename: String,
    pub url: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}
