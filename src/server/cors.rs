//! Cross-origin policy.
//!
//! Browsers running the game from a dev server (`http://localhost:5173`,
//! `http://127.0.0.1:3000`, ...) are always allowed. Deployed frontends are
//! listed in `cors.allowed_origins` / `MEMORY_GAME_ALLOWED_ORIGINS`.

use crate::config::normalize_origin;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Build the CORS layer for the configured extra origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let extra: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(normalize_origin(o)).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                extra.contains(origin) || origin.to_str().is_ok_and(is_local_origin)
            },
        ))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}

/// `http(s)://localhost`, `127.0.0.1` or `[::1]`, with an optional numeric port.
pub fn is_local_origin(origin: &str) -> bool {
    let Some(authority) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    LOCAL_HOSTS.iter().any(|host| match authority.strip_prefix(host) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())),
        None => false,
    })
}
