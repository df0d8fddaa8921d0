//! HTTP API handlers for logdash-web

use std::sync::Arc;

use logdash_common::Dataset;

use crate::AppState;

pub mod buildinfo;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod health;
pub mod reload;
pub mod ui;

pub use buildinfo::get_build_info;
pub use dashboard::{get_dashboard, get_options};
pub use error::ApiError;
pub use export::export_csv;
pub use health::health_routes;
pub use reload::reload_dataset;
pub use ui::{serve_asset, serve_index};

/// Fetch the cached dataset, reading the file off the async runtime when it
/// needs (re)loading
pub(crate) async fn current_dataset(state: &AppState) -> Result<Arc<Dataset>, ApiError> {
    let cache = state.cache.clone();
    let dataset = tokio::task::spawn_blocking(move || cache.get())
        .await
        .map_err(|e| logdash_common::Error::Internal(format!("load task failed: {}", e)))??;
    Ok(dataset)
}
