//! Column name normalization and the recognized column names
//!
//! Every header label goes through [`normalize_column`] immediately after load,
//! so all lookups below use the upper-cased, trimmed form.

pub const FECHA: &str = "FECHA";
pub const DESPACHO: &str = "DESPACHO";
pub const CITA_ENTREGA: &str = "CITA ENTREGA";
pub const EJECUTIVO: &str = "EJECUTIVO";
pub const CLIENTE: &str = "CLIENTE";
pub const EN_TIEMPO: &str = "EN TIEMPO";
pub const DES_TIEMPO: &str = "DES TIEMPO";
pub const STATUS: &str = "STATUS";

/// Derived outcome column appended to every dataset
pub const RESULTADO: &str = "RESULTADO";

/// Columns converted from text to dates at load time
pub const DATE_COLUMNS: [&str; 3] = [FECHA, DESPACHO, CITA_ENTREGA];

/// Normalize a raw header label: strip surrounding whitespace, upper-case.
///
/// A leading byte-order mark is treated as whitespace so that files saved by
/// spreadsheet tools still match.
pub fn normalize_column(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_uppercase()
}
