//! logdash-web library - Logistics dashboard service
//!
//! Serves the single-page dashboard and the JSON/CSV endpoints it calls.
//! Every request re-runs the reporting pipeline over the cached dataset.

use std::sync::Arc;

use axum::Router;
use logdash_common::DatasetCache;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod pagination;
pub mod query;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Parsed dataset, shared read-only between requests
    pub cache: Arc<DatasetCache>,
}

impl AppState {
    /// Create new application state
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self { cache }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api_routes = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/options", get(api::get_options))
        .route("/api/dashboard", get(api::get_dashboard))
        .route("/api/export", get(api::export_csv))
        .route("/api/reload", post(api::reload_dataset));

    let ui_routes = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/:name", get(api::serve_asset))
        .merge(api::health_routes());

    Router::new()
        .merge(api_routes)
        .merge(ui_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
