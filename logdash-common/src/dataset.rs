//! Dataset model and CSV loading
//!
//! Loading runs the ingestion half of the pipeline: read → normalize headers
//! → parse date columns → classify outcomes. The resulting [`Dataset`] is
//! immutable and shared read-only by every filter recomputation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::columns::{self, normalize_column, DATE_COLUMNS};
use crate::dates::parse_date_columns;
use crate::outcome::{classify, Indicator, Resultado};
use crate::{Error, Result};

static NULL_CELL: Cell = Cell::Null;

/// A single table value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Empty field, unparseable date, or missing column
    Null,
    Text(String),
    Date(NaiveDateTime),
}

impl Cell {
    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Date(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Render for display and CSV export.
    ///
    /// Dates at midnight render as `YYYY-MM-DD`, others include the time.
    pub fn display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Date(dt) => format_datetime(dt),
        }
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time().num_seconds_from_midnight() == 0 && dt.time().nanosecond() == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Date(dt) => serializer.serialize_str(&format_datetime(dt)),
        }
    }
}

/// One row of the dataset with its ingestion-time classification
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    cells: Vec<Cell>,
    pub en_tiempo: Indicator,
    pub des_tiempo: Indicator,
    pub resultado: Resultado,
}

impl TripRecord {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Options controlling how a source file is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Prefer day/month order for ambiguous numeric dates
    pub day_first: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            day_first: false,
        }
    }
}

/// Column indices of the recognized columns, resolved once per dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct KnownColumns {
    fecha: Option<usize>,
    ejecutivo: Option<usize>,
    cliente: Option<usize>,
    en_tiempo: Option<usize>,
    des_tiempo: Option<usize>,
    status: Option<usize>,
}

impl KnownColumns {
    fn resolve(columns: &[String]) -> Self {
        let find = |name: &str| columns.iter().position(|c| c == name);
        Self {
            fecha: find(columns::FECHA),
            ejecutivo: find(columns::EJECUTIVO),
            cliente: find(columns::CLIENTE),
            en_tiempo: find(columns::EN_TIEMPO),
            des_tiempo: find(columns::DES_TIEMPO),
            status: find(columns::STATUS),
        }
    }
}

/// The full loaded collection of trip records
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<TripRecord>,
    known: KnownColumns,
}

impl Dataset {
    /// Build a dataset from raw headers and text rows.
    ///
    /// Headers are normalized, date columns parsed, and `RESULTADO` derived
    /// (replacing any existing column of that name).
    pub fn from_raw(headers: Vec<String>, rows: Vec<Vec<Cell>>, options: &LoadOptions) -> Self {
        let mut columns: Vec<String> = headers.iter().map(|h| normalize_column(h)).collect();
        let mut rows = rows;

        for stats in parse_date_columns(&columns, &mut rows, &DATE_COLUMNS, options.day_first) {
            info!(
                "Date column {}: {} parsed, {} unparseable",
                stats.column, stats.parsed, stats.failed
            );
        }

        let known = KnownColumns::resolve(&columns);
        let resultado_idx = match columns.iter().position(|c| c == columns::RESULTADO) {
            Some(idx) => idx,
            None => {
                columns.push(columns::RESULTADO.to_string());
                columns.len() - 1
            }
        };

        let records = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(columns.len(), Cell::Null);

                let en_tiempo = Indicator::parse(cell_at(&cells, known.en_tiempo));
                let des_tiempo = Indicator::parse(cell_at(&cells, known.des_tiempo));
                let status = cell_at(&cells, known.status).as_text();
                let resultado = classify(en_tiempo, des_tiempo, status);

                cells[resultado_idx] = Cell::Text(resultado.as_str().to_string());

                TripRecord {
                    cells,
                    en_tiempo,
                    des_tiempo,
                    resultado,
                }
            })
            .collect();

        Self {
            columns,
            records,
            known,
        }
    }

    /// Normalized column names, including the derived `RESULTADO`
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of a normalized column name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of `record` in column `name`; absent columns read as null
    pub fn cell<'a>(&self, record: &'a TripRecord, name: &str) -> &'a Cell {
        cell_at(&record.cells, self.column_index(name))
    }

    pub fn fecha(&self, record: &TripRecord) -> Option<NaiveDate> {
        cell_at(&record.cells, self.known.fecha)
            .as_date()
            .map(|dt| dt.date())
    }

    pub fn ejecutivo<'a>(&self, record: &'a TripRecord) -> Option<&'a str> {
        cell_at(&record.cells, self.known.ejecutivo).as_text()
    }

    pub fn cliente<'a>(&self, record: &'a TripRecord) -> Option<&'a str> {
        cell_at(&record.cells, self.known.cliente).as_text()
    }

    /// Earliest and latest `FECHA` present, ignoring nulls
    pub fn fecha_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.records
            .iter()
            .filter_map(|r| self.fecha(r))
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }
}

fn cell_at(cells: &[Cell], idx: Option<usize>) -> &Cell {
    idx.and_then(|i| cells.get(i)).unwrap_or(&NULL_CELL)
}

/// Read a dataset from any CSV source
pub fn read_dataset<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(map_csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::Schema("no header row found".to_string()));
    }

    // Short rows are padded with nulls in `Dataset::from_raw`; extra fields
    // have no column to land in.
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(map_csv_error)?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(Error::Schema(format!(
                "line {}: found {} fields, but the header has {}",
                line,
                record.len(),
                headers.len()
            )));
        }
        let cells = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Null
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(cells);
    }

    debug!("Read {} rows with {} columns", rows.len(), headers.len());
    Ok(Dataset::from_raw(headers, rows, options))
}

/// Load a dataset from a file on disk
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let file = File::open(path)
        .map_err(|e| Error::DataAccess(format!("cannot open {}: {}", path.display(), e)))?;

    let dataset = read_dataset(file, options)?;
    info!(
        "Loaded {} records ({} columns) from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

fn map_csv_error(err: csv::Error) -> Error {
    match err.kind() {
        csv::ErrorKind::Io(e) => Error::DataAccess(e.to_string()),
        _ => Error::Schema(err.to_string()),
    }
}
