//! Outcome classification
//!
//! The `EN TIEMPO` / `DES TIEMPO` columns mark a trip with a checkmark glyph.
//! They are parsed into an [`Indicator`] at ingestion time and the per-row
//! [`Resultado`] is derived from those indicators plus the free-text `STATUS`.

use serde::{Serialize, Serializer};

use crate::dataset::Cell;

/// Checkmark glyph used by the source spreadsheets (U+2714 U+FE0F)
pub const CHECKMARK: &str = "\u{2714}\u{fe0f}";

/// Same glyph without the emoji variation selector
const CHECKMARK_BARE: &str = "\u{2714}";

pub const EN_TIEMPO: &str = "EN TIEMPO";
pub const DES_TIEMPO: &str = "DES TIEMPO";
pub const SIN_STATUS: &str = "SIN STATUS";

/// Tri-state reading of a checkmark column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Checked,
    Unchecked,
    /// Column missing, field empty or blank
    Absent,
}

impl Indicator {
    pub fn parse(cell: &Cell) -> Self {
        match cell {
            Cell::Null => Indicator::Absent,
            Cell::Date(_) => Indicator::Unchecked,
            Cell::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Indicator::Absent
                } else if text == CHECKMARK || text == CHECKMARK_BARE {
                    Indicator::Checked
                } else {
                    Indicator::Unchecked
                }
            }
        }
    }

    pub fn is_checked(self) -> bool {
        self == Indicator::Checked
    }
}

/// Derived outcome of a trip
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resultado {
    EnTiempo,
    DesTiempo,
    /// Trimmed, non-empty `STATUS` text
    Status(String),
    SinStatus,
}

impl Resultado {
    pub fn as_str(&self) -> &str {
        match self {
            Resultado::EnTiempo => EN_TIEMPO,
            Resultado::DesTiempo => DES_TIEMPO,
            Resultado::Status(s) => s,
            Resultado::SinStatus => SIN_STATUS,
        }
    }
}

impl std::fmt::Display for Resultado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Resultado {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Classify a trip. `EN TIEMPO` wins over `DES TIEMPO`, which wins over
/// `STATUS`; a missing or blank status yields `SIN STATUS`.
pub fn classify(en_tiempo: Indicator, des_tiempo: Indicator, status: Option<&str>) -> Resultado {
    if en_tiempo.is_checked() {
        return Resultado::EnTiempo;
    }
    if des_tiempo.is_checked() {
        return Resultado::DesTiempo;
    }
    match status.map(str::trim) {
        Some(s) if !s.is_empty() => Resultado::Status(s.to_string()),
        _ => Resultado::SinStatus,
    }
}
