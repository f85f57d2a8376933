//! TOML configuration file model and discovery
//!
//! The TOML file is the third tier of configuration resolution:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Every field is optional here; the consuming binary applies the
//! higher tiers and the compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SMILEFJES_CONFIG";

/// Pipeline configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Inspection table location (URL or local path)
    pub source: Option<String>,

    /// Output GeoJSON path
    pub output: Option<PathBuf>,

    /// Directory holding the registry and geocode cache files
    pub cache_dir: Option<PathBuf>,

    /// Cap on the number of entities processed per run
    pub max_entities: Option<usize>,

    /// Delay after each registry cache miss
    pub registry_delay_ms: Option<u64>,

    /// Delay after each geocoder cache miss
    pub geocode_delay_ms: Option<u64>,

    /// Business registry API base URL
    pub registry_base_url: Option<String>,

    /// Geocoding API base URL
    pub geocoder_base_url: Option<String>,

    /// `write-through` or `definitive-only`
    pub registry_cache_policy: Option<String>,

    /// Flush caches every N processed entities (0 = end of run only)
    pub flush_every: Option<usize>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Locate the config file to use, if any
///
/// Runs before tracing is installed, so it does not log; callers report
/// the chosen path once logging is up.
///
/// Priority: explicit path → `SMILEFJES_CONFIG` → `<config_dir>/smilefjes/config.toml`.
/// An explicit path (argument or environment) is returned even if it does not
/// exist so that the caller reports the mistake instead of silently ignoring it.
pub fn locate_config_file(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("smilefjes").join("config.toml"))?;
    user_config.exists().then_some(user_config)
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    Ok(toml::from_str(&content)?)
}
