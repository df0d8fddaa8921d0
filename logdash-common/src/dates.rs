//! Best-effort date parsing for the date columns
//!
//! A cell that cannot be parsed becomes [`Cell::Null`]; one bad value never
//! aborts processing of the rest of the column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::dataset::Cell;

/// Date-time layouts that are unambiguous regardless of day/month order
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

// Two-digit year layouts come first: `%Y` would otherwise read `24` as the
// year 24, while `%y` rejects four-digit years as trailing input.
const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const MONTH_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
];

const MONTH_FIRST_DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];

/// Parse a single text value into a date-time.
///
/// `day_first` picks the preferred reading of ambiguous `01/02/2024`-style
/// values; when the preferred order does not produce a valid date the other
/// order is tried.
pub fn parse_date(text: &str, day_first: bool) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    if let Some(dt) = try_formats(text, ISO_DATETIME_FORMATS, ISO_DATE_FORMATS) {
        return Some(dt);
    }

    let (preferred, fallback) = if day_first {
        (
            (DAY_FIRST_DATETIME_FORMATS, DAY_FIRST_DATE_FORMATS),
            (MONTH_FIRST_DATETIME_FORMATS, MONTH_FIRST_DATE_FORMATS),
        )
    } else {
        (
            (MONTH_FIRST_DATETIME_FORMATS, MONTH_FIRST_DATE_FORMATS),
            (DAY_FIRST_DATETIME_FORMATS, DAY_FIRST_DATE_FORMATS),
        )
    };

    try_formats(text, preferred.0, preferred.1).or_else(|| try_formats(text, fallback.0, fallback.1))
}

fn try_formats(text: &str, datetime_formats: &[&str], date_formats: &[&str]) -> Option<NaiveDateTime> {
    datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Outcome of converting one column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnParseStats {
    pub column: String,
    pub parsed: usize,
    pub failed: usize,
}

/// Convert every present target column from text to dates, in place.
///
/// `columns` are the normalized headers; targets missing from them are
/// skipped silently. Returns per-column statistics for the columns that were
/// converted.
pub fn parse_date_columns(
    columns: &[String],
    rows: &mut [Vec<Cell>],
    targets: &[&str],
    day_first: bool,
) -> Vec<ColumnParseStats> {
    let mut stats = Vec::new();

    for target in targets {
        let Some(idx) = columns.iter().position(|c| c == target) else {
            debug!("Date column {} not present, skipping", target);
            continue;
        };

        let mut column_stats = ColumnParseStats {
            column: (*target).to_string(),
            ..Default::default()
        };

        for row in rows.iter_mut() {
            let Some(cell) = row.get_mut(idx) else {
                continue;
            };
            let converted = match cell {
                Cell::Text(text) => match parse_date(text, day_first) {
                    Some(dt) => {
                        column_stats.parsed += 1;
                        Cell::Date(dt)
                    }
                    None => {
                        column_stats.failed += 1;
                        Cell::Null
                    }
                },
                Cell::Date(dt) => {
                    column_stats.parsed += 1;
                    Cell::Date(*dt)
                }
                Cell::Null => Cell::Null,
            };
            *cell = converted;
        }

        if column_stats.failed > 0 {
            warn!(
                "{} value(s) in column {} could not be parsed as dates and were left empty",
                column_stats.failed, target
            );
        }
        stats.push(column_stats);
    }

    stats
}
