//! Pipeline composition
//!
//! `load → filter → summarize` as plain function calls. The HTTP layer keeps
//! the only state (the dataset cache) and re-runs [`run_pipeline`] for every
//! request.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{summarize, Summary};
use crate::dataset::{load_dataset, Dataset, LoadOptions};
use crate::filter::{apply_filters, DateRange, FilterSelection, FilteredView};
use crate::Result;

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput<'a> {
    pub view: FilteredView<'a>,
    pub summary: Summary,
}

/// Filter `dataset` with `selection` and summarize the result
pub fn run_pipeline<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> PipelineOutput<'a> {
    let view = apply_filters(dataset, selection);
    let summary = summarize(&view);
    debug!(
        "Pipeline: {} of {} records selected, {} on time, {} late",
        view.len(),
        dataset.len(),
        summary.on_time,
        summary.late
    );
    PipelineOutput { view, summary }
}

/// Load `path` and summarize it under `selection` in one call
pub fn load_and_summarize(
    path: &Path,
    options: &LoadOptions,
    selection: &FilterSelection,
) -> Result<Summary> {
    let dataset = load_dataset(path, options)?;
    Ok(run_pipeline(&dataset, selection).summary)
}

/// Candidate values for the filter widgets, taken from the full dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub ejecutivos: Vec<String>,
    pub clientes: Vec<String>,
    pub resultados: Vec<String>,
    /// `[min(FECHA), max(FECHA)]`, absent when no row has a valid date
    pub date_range: Option<DateRange>,
}

/// Sorted distinct non-null values of the filterable columns
pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    let mut ejecutivos = BTreeSet::new();
    let mut clientes = BTreeSet::new();
    let mut resultados = BTreeSet::new();

    for record in dataset.records() {
        if let Some(e) = dataset.ejecutivo(record) {
            ejecutivos.insert(e.to_string());
        }
        if let Some(c) = dataset.cliente(record) {
            clientes.insert(c.to_string());
        }
        resultados.insert(record.resultado.as_str().to_string());
    }

    FilterOptions {
        ejecutivos: ejecutivos.into_iter().collect(),
        clientes: clientes.into_iter().collect(),
        resultados: resultados.into_iter().collect(),
        date_range: dataset
            .fecha_bounds()
            .map(|(start, end)| DateRange { start, end }),
    }
}
