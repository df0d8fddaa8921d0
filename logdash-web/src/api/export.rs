//! CSV download of the filtered view

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use logdash_common::export::{to_csv_bytes, EXPORT_FILENAME, EXPORT_MIME};
use logdash_common::run_pipeline;
use tracing::info;

use crate::api::{current_dataset, ApiError};
use crate::query::DashboardQuery;
use crate::AppState;

/// GET /api/export?<dashboard filters>
///
/// Returns every row of the filtered view (not just the current page) as
/// `logistica_filtrada.csv`. The `page` parameter is accepted and ignored.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = DashboardQuery::from_pairs(&pairs)?;
    let dataset = current_dataset(&state).await?;

    let output = run_pipeline(&dataset, &query.selection);
    let body = to_csv_bytes(&output.view)?;
    info!("Exporting {} rows ({} bytes)", output.view.len(), body.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format!("{}; charset=utf-8", EXPORT_MIME)),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
