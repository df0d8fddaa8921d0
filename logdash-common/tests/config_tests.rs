//! Unit tests for configuration resolution and graceful degradation
//!
//! Tests cover:
//! - Priority order: CLI > environment > TOML > compiled default
//! - Invalid environment values surface as config errors
//! - Missing or malformed TOML files fall back to defaults
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate LOGDASH_* variables are marked with #[serial].

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use logdash_common::config::{
    load_toml_config, load_toml_config_or_default, resolve_data_file, CliOverrides,
    DashboardConfig, TomlConfig, CONFIG_FILE_ENV, DATA_FILE_ENV, DAY_FIRST_ENV, DELIMITER_ENV,
    HOST_ENV, PORT_ENV,
};
use logdash_common::Error;
use serial_test::serial;
use tempfile::NamedTempFile;

fn clear_env() {
    for var in [
        DATA_FILE_ENV,
        HOST_ENV,
        PORT_ENV,
        DAY_FIRST_ENV,
        DELIMITER_ENV,
        CONFIG_FILE_ENV,
    ] {
        env::remove_var(var);
    }
}

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_env();

    let config = DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(config.data_file, PathBuf::from("logistica.csv"));
    assert_eq!(config.bind_addr(), "127.0.0.1:5730");
    assert_eq!(config.load.delimiter, b',');
    assert!(!config.load.day_first);
}

#[test]
#[serial]
fn test_cli_beats_env_beats_toml() {
    clear_env();
    let toml = TomlConfig {
        data_file: Some(PathBuf::from("/from/toml.csv")),
        port: Some(7000),
        ..Default::default()
    };

    // TOML only
    assert_eq!(
        resolve_data_file(None, &toml).unwrap(),
        PathBuf::from("/from/toml.csv")
    );

    // Environment overrides TOML
    env::set_var(DATA_FILE_ENV, "/from/env.csv");
    assert_eq!(
        resolve_data_file(None, &toml).unwrap(),
        PathBuf::from("/from/env.csv")
    );

    // CLI overrides everything
    assert_eq!(
        resolve_data_file(Some(Path::new("/from/cli.csv")), &toml).unwrap(),
        PathBuf::from("/from/cli.csv")
    );

    env::set_var(PORT_ENV, "7100");
    let config = DashboardConfig::resolve(&CliOverrides::default(), &toml).unwrap();
    assert_eq!(config.port, 7100);

    let cli = CliOverrides {
        port: Some(7200),
        ..Default::default()
    };
    let config = DashboardConfig::resolve(&cli, &toml).unwrap();
    assert_eq!(config.port, 7200);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_config_error() {
    clear_env();
    env::set_var(PORT_ENV, "not-a-port");

    let err = DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    clear_env();
}

#[test]
#[serial]
fn test_delimiter_and_day_first_from_env() {
    clear_env();
    env::set_var(DELIMITER_ENV, ";");
    env::set_var(DAY_FIRST_ENV, "true");

    let config = DashboardConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();
    assert_eq!(config.load.delimiter, b';');
    assert!(config.load.day_first);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_delimiter_in_toml_is_config_error() {
    clear_env();
    let toml = TomlConfig {
        delimiter: Some("||".to_string()),
        ..Default::default()
    };

    assert!(matches!(
        DashboardConfig::resolve(&CliOverrides::default(), &toml),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_load_toml_config_file() {
    let file = toml_file(
        "data_file = \"/srv/logistica.csv\"\nhost = \"0.0.0.0\"\nport = 8088\ndelimiter = \";\"\n",
    );
    let config = load_toml_config(file.path()).unwrap();

    assert_eq!(config.data_file, Some(PathBuf::from("/srv/logistica.csv")));
    assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.port, Some(8088));
    assert_eq!(config.delimiter.as_deref(), Some(";"));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = toml_file("port = \"eight\"\n");
    assert!(matches!(load_toml_config(file.path()), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_malformed_toml_falls_back_to_default() {
    clear_env();
    let file = toml_file("this is not toml ===");
    env::set_var(CONFIG_FILE_ENV, file.path());

    assert_eq!(load_toml_config_or_default(), TomlConfig::default());

    clear_env();
}

#[test]
#[serial]
fn test_missing_config_file_falls_back_to_default() {
    clear_env();
    env::set_var(CONFIG_FILE_ENV, "/nonexistent/logdash/config.toml");

    assert_eq!(load_toml_config_or_default(), TomlConfig::default());

    clear_env();
}
