//! Configuration loading and data file resolution
//!
//! Every setting is resolved with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed config file never prevents startup; it is logged
//! and the remaining sources apply.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::LoadOptions;
use crate::{Error, Result};

pub const DATA_FILE_ENV: &str = "LOGDASH_DATA_FILE";
pub const HOST_ENV: &str = "LOGDASH_HOST";
pub const PORT_ENV: &str = "LOGDASH_PORT";
pub const DAY_FIRST_ENV: &str = "LOGDASH_DAY_FIRST";
pub const DELIMITER_ENV: &str = "LOGDASH_DELIMITER";
/// Explicit config file location, overrides the platform search
pub const CONFIG_FILE_ENV: &str = "LOGDASH_CONFIG";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub day_first: Option<bool>,
    /// Single-character field delimiter
    pub delimiter: Option<String>,
}

/// Built-in fallbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub day_first: bool,
    pub delimiter: u8,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("logistica.csv"),
            host: "127.0.0.1".to_string(),
            port: 5730,
            day_first: false,
            delimiter: b',',
        }
    }
}

/// Locate the config file: `LOGDASH_CONFIG`, then the user config directory,
/// then `/etc/logdash/config.toml` on Linux.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("logdash").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/logdash/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("invalid TOML in {}: {}", path.display(), e)))
}

/// Load the config file if there is one, falling back to an empty config
pub fn load_toml_config_or_default() -> TomlConfig {
    let Some(path) = config_file_path() else {
        info!("No config file found, using defaults");
        return TomlConfig::default();
    };

    match load_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}; continuing with defaults", e);
            TomlConfig::default()
        }
    }
}

/// Resolve one setting through the priority chain.
///
/// An environment variable that is set but does not parse is a config error
/// rather than being silently skipped.
pub fn resolve_setting<T>(
    cli_arg: Option<T>,
    env_var_name: &str,
    toml_value: Option<T>,
    default: T,
) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    // Priority 1: Command-line argument
    if let Some(value) = cli_arg {
        return Ok(value);
    }

    // Priority 2: Environment variable
    if let Ok(raw) = std::env::var(env_var_name) {
        return raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid {}={:?}: {}", env_var_name, raw, e)));
    }

    // Priority 3: TOML config file
    if let Some(value) = toml_value {
        return Ok(value);
    }

    // Priority 4: Compiled default
    Ok(default)
}

/// Resolve the path of the source CSV
pub fn resolve_data_file(cli_arg: Option<&Path>, toml: &TomlConfig) -> Result<PathBuf> {
    resolve_setting(
        cli_arg.map(Path::to_path_buf),
        DATA_FILE_ENV,
        toml.data_file.clone(),
        CompiledDefaults::default().data_file,
    )
}

/// Convert a delimiter setting into the single byte the CSV reader expects
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    let value = match raw {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(Error::Config(format!(
            "delimiter must be a single ASCII character, got {:?}",
            raw
        ))),
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub day_first: Option<bool>,
    pub delimiter: Option<String>,
}

/// Fully resolved dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub load: LoadOptions,
}

impl DashboardConfig {
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let data_file = resolve_data_file(cli.data_file.as_deref(), toml)?;
        let host = resolve_setting(cli.host.clone(), HOST_ENV, toml.host.clone(), defaults.host)?;
        let port = resolve_setting(cli.port, PORT_ENV, toml.port, defaults.port)?;
        let day_first =
            resolve_setting(cli.day_first, DAY_FIRST_ENV, toml.day_first, defaults.day_first)?;
        let delimiter = resolve_setting(
            cli.delimiter.clone(),
            DELIMITER_ENV,
            toml.delimiter.clone(),
            (defaults.delimiter as char).to_string(),
        )?;

        Ok(Self {
            data_file,
            host,
            port,
            load: LoadOptions {
                delimiter: parse_delimiter(&delimiter)?,
                day_first,
            },
        })
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
