//! Filter engine
//!
//! A [`FilterSelection`] is a conjunction of membership predicates over
//! `EJECUTIVO`, `CLIENTE` and `RESULTADO` plus an inclusive date range over
//! `FECHA`. Empty membership sets place no restriction.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{Dataset, TripRecord};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// User-supplied filter parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub ejecutivos: BTreeSet<String>,
    pub clientes: BTreeSet<String>,
    pub resultados: BTreeSet<String>,
    /// Range start; defaults to the earliest `FECHA` in the dataset
    pub start: Option<NaiveDate>,
    /// Range end; defaults to the latest `FECHA` in the dataset
    pub end: Option<NaiveDate>,
}

impl FilterSelection {
    /// Date range in effect for `dataset`.
    ///
    /// Missing bounds fall back to the dataset's min/max `FECHA`. Returns
    /// `None` only when a bound is missing and the dataset has no parseable
    /// `FECHA` to default it from.
    pub fn resolve_range(&self, dataset: &Dataset) -> Option<DateRange> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                let (lo, hi) = dataset.fecha_bounds()?;
                (start.unwrap_or(lo), end.unwrap_or(hi))
            }
        };
        Some(DateRange { start, end })
    }
}

/// Records of a dataset that satisfy a selection, in dataset order
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    records: Vec<&'a TripRecord>,
    range: Option<DateRange>,
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn columns(&self) -> &'a [String] {
        self.dataset.columns()
    }

    /// Date range that was applied, if any
    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn allows(set: &BTreeSet<String>, value: Option<&str>) -> bool {
    set.is_empty() || value.is_some_and(|v| set.contains(v))
}

/// Apply `selection` to `dataset`.
///
/// Pure: the same inputs always produce the same view. A range with
/// `start > end` simply matches nothing.
pub fn apply_filters<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let range = selection.resolve_range(dataset);

    let records = dataset
        .records()
        .iter()
        .filter(|r| allows(&selection.ejecutivos, dataset.ejecutivo(r)))
        .filter(|r| allows(&selection.clientes, dataset.cliente(r)))
        .filter(|r| allows(&selection.resultados, Some(r.resultado.as_str())))
        .filter(|r| match range {
            Some(range) => dataset.fecha(r).is_some_and(|d| range.contains(d)),
            None => true,
        })
        .collect();

    FilteredView {
        dataset,
        records,
        range,
    }
}
