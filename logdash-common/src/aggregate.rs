//! Summary counts over a filtered view

use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::FilteredView;
use crate::outcome::{DES_TIEMPO, EN_TIEMPO};

/// Derived, read-only figures for one filtered view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub on_time: usize,
    pub late: usize,
    /// `"25.0%"` style percentage, or `"0%"` for an empty view
    pub on_time_pct: String,
    pub trips_per_executive: BTreeMap<String, usize>,
    /// Late trips by client; empty when the view has no late trips
    pub delays_per_client: BTreeMap<String, usize>,
    /// Trip count per `RESULTADO` value
    pub result_distribution: BTreeMap<String, usize>,
}

impl Summary {
    /// True when there is nothing to chart for delays
    pub fn no_delays(&self) -> bool {
        self.delays_per_client.is_empty()
    }
}

pub fn format_on_time_pct(on_time: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", on_time as f64 / total as f64 * 100.0)
}

/// Compute the summary for `view`. Never fails; an empty view yields zeros.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let dataset = view.dataset();
    let mut summary = Summary::default();

    for record in view.records() {
        let resultado = record.resultado.as_str();
        summary.total += 1;

        *summary
            .result_distribution
            .entry(resultado.to_string())
            .or_default() += 1;

        if let Some(ejecutivo) = dataset.ejecutivo(record) {
            *summary
                .trips_per_executive
                .entry(ejecutivo.to_string())
                .or_default() += 1;
        }

        if resultado == EN_TIEMPO {
            summary.on_time += 1;
        } else if resultado == DES_TIEMPO {
            summary.late += 1;
            if let Some(cliente) = dataset.cliente(record) {
                *summary
                    .delays_per_client
                    .entry(cliente.to_string())
                    .or_default() += 1;
            }
        }
    }

    summary.on_time_pct = format_on_time_pct(summary.on_time, summary.total);
    summary
}
