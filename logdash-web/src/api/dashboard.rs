//! Dashboard data endpoints
//!
//! `/api/options` feeds the filter widgets from the full dataset;
//! `/api/dashboard` returns metrics, chart data and one table page for the
//! current selection.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use logdash_common::{filter_options, run_pipeline, Cell, FilterOptions};
use serde::Serialize;
use tracing::debug;

use crate::api::{current_dataset, ApiError};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::query::DashboardQuery;
use crate::AppState;

/// GET /api/options
///
/// Sorted distinct executives, clients and results, plus the default date
/// range.
pub async fn get_options(State(state): State<AppState>) -> Result<Json<FilterOptions>, ApiError> {
    let dataset = current_dataset(&state).await?;
    Ok(Json(filter_options(&dataset)))
}

/// Selection as actually applied, with the date range resolved
#[derive(Debug, Serialize)]
pub struct AppliedFilters {
    pub ejecutivos: Vec<String>,
    pub clientes: Vec<String>,
    pub resultados: Vec<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Headline figures
#[derive(Debug, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub on_time: usize,
    pub on_time_pct: String,
    pub late: usize,
}

/// One page of the filtered view
#[derive(Debug, Serialize)]
pub struct TablePage {
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub filters: AppliedFilters,
    pub metrics: Metrics,
    /// Pie chart source
    pub result_distribution: BTreeMap<String, usize>,
    pub trips_per_executive: BTreeMap<String, usize>,
    pub delays_per_client: BTreeMap<String, usize>,
    /// The delays chart should show its empty state
    pub no_delays: bool,
    pub table: TablePage,
}

/// GET /api/dashboard?ejecutivo=..&cliente=..&resultado=..&start=..&end=..&page=..
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let query = DashboardQuery::from_pairs(&pairs)?;
    let dataset = current_dataset(&state).await?;

    let output = run_pipeline(&dataset, &query.selection);
    let view = &output.view;
    let summary = output.summary;

    let p = calculate_pagination(view.len(), query.page);
    let rows = view.records()[p.range(view.len())]
        .iter()
        .map(|r| r.cells().to_vec())
        .collect();

    debug!(
        "Dashboard: {} rows match, serving page {}/{}",
        view.len(),
        p.page,
        p.total_pages
    );

    let selection = query.selection;
    let range = view.range();
    let no_delays = summary.no_delays();

    Ok(Json(DashboardResponse {
        filters: AppliedFilters {
            ejecutivos: selection.ejecutivos.into_iter().collect(),
            clientes: selection.clientes.into_iter().collect(),
            resultados: selection.resultados.into_iter().collect(),
            start: range.map(|r| r.start),
            end: range.map(|r| r.end),
        },
        metrics: Metrics {
            total: summary.total,
            on_time: summary.on_time,
            on_time_pct: summary.on_time_pct,
            late: summary.late,
        },
        result_distribution: summary.result_distribution,
        trips_per_executive: summary.trips_per_executive,
        delays_per_client: summary.delays_per_client,
        no_delays,
        table: TablePage {
            total_rows: view.len(),
            page: p.page,
            page_size: PAGE_SIZE,
            total_pages: p.total_pages,
            columns: view.columns().to_vec(),
            rows,
        },
    }))
}
