//! Filter parameters from the request query string
//!
//! Membership filters are repeatable keys
//! (`?ejecutivo=Ana&ejecutivo=Luis`); dates are `YYYY-MM-DD`.

use chrono::NaiveDate;
use logdash_common::FilterSelection;

use crate::api::ApiError;

/// Parsed dashboard/export query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub selection: FilterSelection,
    /// Requested table page (1-indexed)
    pub page: usize,
}

impl DashboardQuery {
    /// Parse raw `(key, value)` pairs. Unknown keys and empty values are
    /// ignored; malformed dates or page numbers are rejected.
    ///
    /// Membership values are kept byte-for-byte: they must equal the values
    /// served by `/api/options`, padding included.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let mut query = DashboardQuery {
            page: 1,
            ..Default::default()
        };

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "ejecutivo" => {
                    query.selection.ejecutivos.insert(value.clone());
                }
                "cliente" => {
                    query.selection.clientes.insert(value.clone());
                }
                "resultado" => {
                    query.selection.resultados.insert(value.clone());
                }
                "start" => query.selection.start = parse_date_param(key, value)?,
                "end" => query.selection.end = parse_date_param(key, value)?,
                "page" => {
                    let value = value.trim();
                    if !value.is_empty() {
                        query.page = value.parse().map_err(|_| {
                            ApiError::InvalidQuery(format!("invalid page: {}", value))
                        })?;
                    }
                }
                _ => {}
            }
        }

        Ok(query)
    }
}

/// A blank date means "use the dataset default"
fn parse_date_param(key: &str, value: &str) -> Result<Option<NaiveDate>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::InvalidQuery(format!("invalid {} date: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let q = DashboardQuery::from_pairs(&pairs(&[
            ("ejecutivo", "Ana"),
            ("ejecutivo", "Luis"),
            ("cliente", "Alfa"),
            ("resultado", "DES TIEMPO"),
        ]))
        .unwrap();

        assert_eq!(q.selection.ejecutivos.len(), 2);
        assert!(q.selection.clientes.contains("Alfa"));
        assert!(q.selection.resultados.contains("DES TIEMPO"));
        assert_eq!(q.page, 1);
    }

    #[test]
    fn test_dates_and_page() {
        let q = DashboardQuery::from_pairs(&pairs(&[
            ("start", "2024-03-01"),
            ("end", "2024-03-31"),
            ("page", "3"),
        ]))
        .unwrap();

        assert_eq!(q.selection.start, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(q.selection.end, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(q.page, 3);
    }

    #[test]
    fn test_empty_values_and_unknown_keys_ignored() {
        let q = DashboardQuery::from_pairs(&pairs(&[
            ("ejecutivo", ""),
            ("start", " "),
            ("page", ""),
            ("foo", "bar"),
        ]))
        .unwrap();
        assert_eq!(q.selection, FilterSelection::default());
        assert_eq!(q.page, 1);
    }

    #[test]
    fn test_membership_values_keep_padding() {
        let q = DashboardQuery::from_pairs(&pairs(&[
            ("ejecutivo", "Ana "),
            ("cliente", " "),
            ("resultado", "EN RUTA"),
        ]))
        .unwrap();

        assert!(q.selection.ejecutivos.contains("Ana "));
        assert!(!q.selection.ejecutivos.contains("Ana"));
        assert!(q.selection.clientes.contains(" "));
        assert!(q.selection.resultados.contains("EN RUTA"));
    }

    #[test]
    fn test_dates_tolerate_surrounding_whitespace() {
        let q = DashboardQuery::from_pairs(&pairs(&[("start", " 2024-03-01 ")])).unwrap();
        assert_eq!(q.selection.start, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(DashboardQuery::from_pairs(&pairs(&[("start", "01/03/2024")])).is_err());
        assert!(DashboardQuery::from_pairs(&pairs(&[("page", "-1")])).is_err());
    }
}
