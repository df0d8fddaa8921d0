//! Explicit dataset reload

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub records: usize,
    pub columns: usize,
}

/// POST /api/reload
///
/// Drops the cached dataset and parses the source file again.
pub async fn reload_dataset(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let cache = state.cache.clone();
    let dataset = tokio::task::spawn_blocking(move || cache.reload())
        .await
        .map_err(|e| logdash_common::Error::Internal(format!("reload task failed: {}", e)))??;

    info!("Dataset reloaded: {} records", dataset.len());
    Ok(Json(ReloadResponse {
        records: dataset.len(),
        columns: dataset.columns().len(),
    }))
}
