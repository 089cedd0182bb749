//! HTTP server: router, middleware and lifecycle.
//!
//! The router is a thin layer over [`crate::scan`] and [`crate::pairs`]:
//! handlers translate their results into JSON and their errors into 404/500
//! responses ([`error::ApiError`]). CORS, file responses and request tracing
//! come from `tower-http`.

pub mod cors;
pub mod error;
pub mod routes;
pub mod state;

use crate::config::ServerConfig;
use crate::scan;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the router with all routes and middleware.
pub fn build_router(config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::new(config));

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/collections", get(routes::list_collections))
        .route("/collections/{id}/pairs", get(routes::collection_pairs))
        .route("/collections/{id}/images", get(routes::collection_images))
        .route(
            "/collections/{id}/images/{filename}",
            get(routes::collection_asset),
        )
        .fallback(routes::not_found)
        .layer(cors::cors_layer(&config.cors.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
///
/// The collections root is not required to exist at startup: requests report
/// a 500 until it does, which lets the server come up before a volume mounts.
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;

    if let Err(e) = scan::ensure_root(&config.collections_root) {
        tracing::warn!("{e}");
    }

    let app = build_router(&config);

    tracing::info!(
        %addr,
        root = %config.collections_root.display(),
        "starting memory game server"
    );
    if !config.cors.allowed_origins.is_empty() {
        tracing::info!(origins = ?config.cors.allowed_origins, "extra CORS origins");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
