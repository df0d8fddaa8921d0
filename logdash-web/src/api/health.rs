//! Liveness probe
//!
//! Reports which source file the service is bound to and whether a parsed
//! copy is cached. It never reads the file itself, so it answers even while
//! the dataset is missing or malformed.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub data_file: String,
    /// A parsed dataset is currently cached
    pub dataset_loaded: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        data_file: state.cache.path().display().to_string(),
        dataset_loaded: state.cache.is_loaded(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
