use crate::config::ServerConfig;
use axum::http::HeaderMap;
use axum::http::header::HOST;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::path::PathBuf;

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Shared, read-only application state.
///
/// Holds configuration only: collections are re-read from disk on every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Directory holding one subdirectory per collection.
    pub collections_root: PathBuf,
    /// Fixed URL prefix for links in responses, without trailing slash.
    pub public_base_url: Option<String>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            collections_root: config.collections_root.clone(),
            public_base_url: config
                .server
                .public_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// URL builder for one request.
    pub fn urls(&self, headers: &HeaderMap) -> Urls {
        let base = match &self.public_base_url {
            Some(base) => base.clone(),
            None => base_from_headers(headers).unwrap_or_default(),
        };
        Urls { base }
    }
}

/// `scheme://host` derived from the request; `None` without a usable Host header.
fn base_from_headers(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(HOST)?.to_str().ok()?.trim();
    if host.is_empty() || host.contains(['/', ' ', '@']) {
        return None;
    }
    let scheme = match headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
    {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    Some(format!("{scheme}://{host}"))
}

/// Builds the URLs embedded in API responses.
///
/// With an empty base every URL is root-relative.
#[derive(Debug, Clone)]
pub struct Urls {
    base: String,
}

impl Urls {
    pub fn pairs(&self, collection_id: &str) -> String {
        format!("{}/collections/{}/pairs", self.base, segment(collection_id))
    }

    pub fn images(&self, collection_id: &str) -> String {
        format!("{}/collections/{}/images", self.base, segment(collection_id))
    }

    pub fn asset(&self, collection_id: &str, filename: &str) -> String {
        format!(
            "{}/collections/{}/images/{}",
            self.base,
            segment(collection_id),
            segment(filename)
        )
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}
