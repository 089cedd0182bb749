//! Route handlers.
//!
//! - `GET /health` - liveness probe
//! - `GET /collections` - every playable collection with counts and URLs
//! - `GET /collections/{id}/pairs` - the card pairs of one collection
//! - `GET /collections/{id}/images` - the image assets of one collection
//! - `GET /collections/{id}/images/{filename}` - raw asset bytes
//!
//! Handlers hold no state between requests: each one scans the filesystem
//! again, so edits to a collection show up on the next request.

use super::error::{ApiError, ApiResult};
use super::state::{AppState, Urls};
use crate::pairs::{CardDefinition, PairDefinition};
use crate::scan::{self, Collection, ScanError};
use crate::types::{CollectionSummary, Face, ImageAsset, Pair};
use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn list_collections(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<CollectionSummary>>> {
    let urls = state.urls(&headers);
    let collections = scan::scan(&state.collections_root)?;

    let mut summaries = Vec::with_capacity(collections.len());
    for collection in &collections {
        let pair_count = match collection.pairs() {
            Ok(pairs) => pairs.len(),
            Err(e) if e.is_not_found() => {
                tracing::debug!(collection = %collection.id, "no playable pairs, omitted");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        summaries.push(summarize(collection, pair_count, &urls));
    }

    tracing::debug!(count = summaries.len(), "listed collections");
    Ok(Json(summaries))
}

fn summarize(collection: &Collection, pair_count: usize, urls: &Urls) -> CollectionSummary {
    CollectionSummary {
        id: collection.id.clone(),
        title: collection.metadata.title.clone(),
        description: collection.metadata.description.clone(),
        icon_url: collection.icon().map(|icon| urls.asset(&collection.id, icon)),
        pairs_url: urls.pairs(&collection.id),
        images_url: urls.images(&collection.id),
        image_count: collection.assets.len(),
        pair_count,
        source: collection.metadata.source.clone(),
    }
}

pub async fn collection_pairs(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Pair>>> {
    let urls = state.urls(&headers);
    let collection = scan::load_collection(&state.collections_root, &collection_id)?;
    let pairs = collection.pairs()?;

    let body = pairs
        .into_iter()
        .map(|pair| to_wire_pair(pair, &collection.id, &urls))
        .collect();
    Ok(Json(body))
}

fn to_wire_pair(pair: PairDefinition, collection_id: &str, urls: &Urls) -> Pair {
    let [first, second] = pair.cards;
    Pair {
        cards: [
            to_face(first, collection_id, urls),
            to_face(second, collection_id, urls),
        ],
    }
}

fn to_face(card: CardDefinition, collection_id: &str, urls: &Urls) -> Face {
    match card {
        CardDefinition::Image { filename } => Face::Image {
            url: urls.asset(collection_id, &filename),
            filename,
        },
        CardDefinition::Markdown { content } => Face::Markdown { content },
    }
}

pub async fn collection_images(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ImageAsset>>> {
    let urls = state.urls(&headers);
    let collection = scan::load_collection(&state.collections_root, &collection_id)?;
    if collection.assets.is_empty() {
        return Err(ScanError::NoAssets.into());
    }

    let body = collection
        .assets
        .iter()
        .map(|filename| ImageAsset {
            filename: filename.clone(),
            url: urls.asset(&collection.id, filename),
        })
        .collect();
    Ok(Json(body))
}

/// Stream one asset back. Content type, conditional and range requests are
/// handled by `ServeFile`.
pub async fn collection_asset(
    State(state): State<Arc<AppState>>,
    Path((collection_id, filename)): Path<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let dir = scan::resolve_collection_dir(&state.collections_root, &collection_id)?;
    let path = scan::resolve_asset_path(&dir, &filename)?;

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.map(Body::new))
}

/// 404 for undefined routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
