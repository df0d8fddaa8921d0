//! End-to-end tests for the reporting pipeline
//!
//! Tests cover:
//! - Loading from disk with messy headers
//! - Classification priority and fallbacks
//! - Filtering with default and explicit date ranges
//! - Summary figures and CSV export

use std::collections::BTreeSet;
use std::io::Write;

use chrono::NaiveDate;
use logdash_common::dataset::load_dataset;
use logdash_common::export::to_csv_bytes;
use logdash_common::pipeline::load_and_summarize;
use logdash_common::{filter_options, run_pipeline, Error, FilterSelection, LoadOptions};
use tempfile::NamedTempFile;

/// Test helper: write a CSV fixture to a temp file
fn fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(contents.as_bytes()).expect("Should write fixture");
    file.flush().unwrap();
    file
}

const LOGISTICA: &str = "\
 Fecha , Despacho ,cita entrega, ejecutivo ,Cliente,En Tiempo,Des Tiempo,Status,Notas
2024-03-01,2024-03-01,2024-03-02,Ana,Alfa,✔️,,,primera
2024-03-02,2024-03-02,2024-03-04,Ana,Beta,,✔️,,
2024-03-03,,,Luis,Alfa,,,EN RUTA ,
not-a-date,2024-03-04,,Luis,Beta,✔️,,,
2024-03-05,2024-03-05,bad,Marta,Gamma,✔️,✔️,,
2024-03-06,,,Marta,Beta,,✔️,,
";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// =============================================================================
// Scenario from the reporting requirements
// =============================================================================

#[test]
fn test_three_row_scenario() {
    let file = fixture(
        "EJECUTIVO,CLIENTE,EN TIEMPO,DES TIEMPO,STATUS\n\
         A,X,✔️,,\n\
         A,Y,,✔️,\n\
         B,X,,,PENDIENTE\n",
    );

    let summary = load_and_summarize(file.path(), &LoadOptions::default(), &FilterSelection::default())
        .expect("Should load fixture");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.on_time, 1);
    assert_eq!(summary.late, 1);
    assert_eq!(summary.on_time_pct, "33.3%");
    assert_eq!(summary.trips_per_executive.len(), 2);
    assert_eq!(summary.trips_per_executive["A"], 2);
    assert_eq!(summary.trips_per_executive["B"], 1);
    assert_eq!(summary.delays_per_client.len(), 1);
    assert_eq!(summary.delays_per_client["Y"], 1);
}

// =============================================================================
// Full dataset behaviour
// =============================================================================

#[test]
fn test_load_normalizes_and_classifies() {
    let file = fixture(LOGISTICA);
    let ds = load_dataset(file.path(), &LoadOptions::default()).unwrap();

    assert_eq!(
        ds.columns(),
        &[
            "FECHA",
            "DESPACHO",
            "CITA ENTREGA",
            "EJECUTIVO",
            "CLIENTE",
            "EN TIEMPO",
            "DES TIEMPO",
            "STATUS",
            "NOTAS",
            "RESULTADO"
        ]
    );

    let results: Vec<&str> = ds.records().iter().map(|r| r.resultado.as_str()).collect();
    assert_eq!(
        results,
        vec!["EN TIEMPO", "DES TIEMPO", "EN RUTA", "EN TIEMPO", "EN TIEMPO", "DES TIEMPO"]
    );

    // Executive names keep their own whitespace; only headers are normalized
    assert_eq!(ds.ejecutivo(&ds.records()[0]), Some("Ana"));
    // Bad CITA ENTREGA on row 5 does not affect its FECHA
    assert_eq!(ds.fecha(&ds.records()[4]), Some(ymd(2024, 3, 5)));
    assert!(ds.cell(&ds.records()[4], "CITA ENTREGA").is_null());
}

#[test]
fn test_bad_date_row_excluded_by_default_range() {
    let file = fixture(LOGISTICA);
    let ds = load_dataset(file.path(), &LoadOptions::default()).unwrap();

    let out = run_pipeline(&ds, &FilterSelection::default());
    assert_eq!(out.view.len(), 5);
    assert!(out
        .view
        .records()
        .iter()
        .all(|r| ds.fecha(r).is_some()));
    assert_eq!(out.summary.on_time, 2);
    assert_eq!(out.summary.late, 2);
    assert_eq!(out.summary.on_time_pct, "40.0%");
}

#[test]
fn test_combined_filters() {
    let file = fixture(LOGISTICA);
    let ds = load_dataset(file.path(), &LoadOptions::default()).unwrap();

    let selection = FilterSelection {
        clientes: names(&["Beta"]),
        resultados: names(&["DES TIEMPO"]),
        start: Some(ymd(2024, 3, 2)),
        end: Some(ymd(2024, 3, 5)),
        ..Default::default()
    };
    let out = run_pipeline(&ds, &selection);

    assert_eq!(out.summary.total, 1);
    assert_eq!(out.summary.trips_per_executive["Ana"], 1);
    assert_eq!(out.summary.delays_per_client["Beta"], 1);
}

#[test]
fn test_no_delays_in_selection() {
    let file = fixture(LOGISTICA);
    let ds = load_dataset(file.path(), &LoadOptions::default()).unwrap();

    let selection = FilterSelection {
        ejecutivos: names(&["Luis"]),
        ..Default::default()
    };
    let out = run_pipeline(&ds, &selection);

    assert_eq!(out.summary.total, 1);
    assert!(out.summary.no_delays());
}

#[test]
fn test_options_come_from_full_dataset() {
    let file = fixture(LOGISTICA);
    let ds = load_dataset(file.path(), &LoadOptions::default()).unwrap();
    let options = filter_options(&ds);

    assert_eq!(options.ejecutivos, vec!["Ana", "Luis", "Marta"]);
    assert_eq!(options.clientes, vec!["Alfa", "Beta", "Gamma"]);
    assert_eq!(options.resultados, vec!["DES TIEMPO", "EN RUTA", "EN TIEMPO"]);
    let range = options.date_range.expect("Should have dates");
    assert_eq!(range.start, ymd(2024, 3, 1));
    assert_eq!(range.end, ymd(2024, 3, 6));
}

#[test]
fn test_export_of_filtered_view() {
    let file = fixture(LOGISTICA);
    let ds = load_dataset(file.path(), &LoadOptions::default()).unwrap();

    let selection = FilterSelection {
        ejecutivos: names(&["Marta"]),
        ..Default::default()
    };
    let out = run_pipeline(&ds, &selection);
    let csv = String::from_utf8(to_csv_bytes(&out.view).unwrap()).unwrap();

    let mut lines = csv.lines();
    assert!(lines.next().unwrap().ends_with(",NOTAS,RESULTADO"));
    assert_eq!(
        lines.next().unwrap(),
        "2024-03-05,2024-03-05,,Marta,Gamma,✔️,✔️,,,EN TIEMPO"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2024-03-06,,,Marta,Beta,,✔️,,,DES TIEMPO"
    );
    assert!(lines.next().is_none());
}

// =============================================================================
// Load failures
// =============================================================================

#[test]
fn test_missing_file_is_data_access_error() {
    let err = load_and_summarize(
        std::path::Path::new("/nonexistent/dir/logistica.csv"),
        &LoadOptions::default(),
        &FilterSelection::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DataAccess(_)));
}

#[test]
fn test_ragged_file_is_schema_error() {
    let file = fixture("EJECUTIVO,CLIENTE\nA,X\nB,Y,extra,fields\n");
    let err = load_dataset(file.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema(_)), "got {:?}", err);
}

#[test]
fn test_invalid_utf8_is_schema_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"EJECUTIVO\n\xff\xfe\n").unwrap();
    file.flush().unwrap();

    let err = load_dataset(file.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Schema(_)), "got {:?}", err);
}
