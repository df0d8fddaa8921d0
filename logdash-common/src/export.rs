//! CSV export of a filtered view

use std::io::Write;

use crate::filter::FilteredView;
use crate::{Error, Result};

/// Download name for exported views
pub const EXPORT_FILENAME: &str = "logistica_filtrada.csv";

/// MIME type for exported views
pub const EXPORT_MIME: &str = "text/csv";

/// Write `view` as UTF-8 CSV: normalized header row, then one line per record
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    wtr.write_record(view.columns()).map_err(export_error)?;
    for record in view.records() {
        wtr.write_record(record.cells().iter().map(|c| c.display()))
            .map_err(export_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export `view` into an in-memory buffer
pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

fn export_error(err: csv::Error) -> Error {
    Error::Internal(format!("CSV export failed: {}", err))
}
