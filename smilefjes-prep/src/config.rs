//! Configuration resolution for smilefjes-prep
//!
//! Each setting resolves with CLI → ENV → TOML → compiled default priority.
//! The first two tiers come from clap (`#[arg(env = ...)]`), the TOML tier
//! from [`smilefjes_common::config::TomlConfig`].

use crate::error::{PrepError, PrepResult};
use crate::services::{
    RegistryCachePolicy, DEFAULT_GEOCODER_BASE_URL, DEFAULT_REGISTRY_BASE_URL, DEFAULT_SOURCE_URL,
    GEOCODE_CACHE_FILE, REGISTRY_CACHE_FILE,
};
use clap::Parser;
use smilefjes_common::config::{load_toml_config, locate_config_file, LoggingConfig, TomlConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT: &str = "data/smilefjes.geojson";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_REGISTRY_DELAY_MS: u64 = 100;
pub const DEFAULT_GEOCODE_DELAY_MS: u64 = 100;

/// Command-line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "smilefjes-prep", version, about = "Build the smilefjes inspection map GeoJSON")]
pub struct Cli {
    /// TOML config file (also SMILEFJES_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Inspection table URL or local path
    #[arg(long, env = "SMILEFJES_SOURCE")]
    pub source: Option<String>,

    /// Output GeoJSON path
    #[arg(long, env = "SMILEFJES_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory for registry-cache.json and geocode-cache.json
    #[arg(long, env = "SMILEFJES_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Process at most N establishments (0 = all)
    #[arg(long, env = "SMILEFJES_MAX_ENTITIES")]
    pub max_entities: Option<usize>,

    /// Delay after each registry lookup, in milliseconds
    #[arg(long, env = "SMILEFJES_REGISTRY_DELAY_MS")]
    pub registry_delay_ms: Option<u64>,

    /// Delay after each geocoder lookup, in milliseconds
    #[arg(long, env = "SMILEFJES_GEOCODE_DELAY_MS")]
    pub geocode_delay_ms: Option<u64>,

    #[arg(long, env = "SMILEFJES_REGISTRY_BASE_URL")]
    pub registry_base_url: Option<String>,

    #[arg(long, env = "SMILEFJES_GEOCODER_BASE_URL")]
    pub geocoder_base_url: Option<String>,

    /// write-through | definitive-only
    #[arg(long, env = "SMILEFJES_REGISTRY_CACHE_POLICY")]
    pub registry_cache_policy: Option<String>,

    /// Save caches every N establishments (0 = end of run only)
    #[arg(long, env = "SMILEFJES_FLUSH_EVERY")]
    pub flush_every: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SMILEFJES_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved pipeline configuration
#[derive(Debug, Clone)]
pub struct PrepConfig {
    pub source: String,
    pub output: PathBuf,
    pub cache_dir: PathBuf,
    pub max_entities: Option<usize>,
    pub registry_delay: Duration,
    pub geocode_delay: Duration,
    pub registry_base_url: String,
    pub geocoder_base_url: String,
    pub registry_cache_policy: RegistryCachePolicy,
    pub flush_every: usize,
    pub logging: LoggingConfig,
}

/// Resolved configuration and the TOML file it was read from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PrepConfig,
    pub file: Option<PathBuf>,
}

impl PrepConfig {
    /// Locate and read the TOML file, then resolve
    ///
    /// Called before tracing is installed; the caller logs `file`.
    pub fn load(cli: &Cli) -> PrepResult<LoadedConfig> {
        let file = locate_config_file(cli.config.as_deref());
        let toml = match &file {
            Some(path) => load_toml_config(path)?,
            None => TomlConfig::default(),
        };

        Ok(LoadedConfig {
            config: Self::resolve(cli, &toml)?,
            file,
        })
    }

    /// Merge CLI/ENV values over the TOML file over compiled defaults
    pub fn resolve(cli: &Cli, toml: &TomlConfig) -> PrepResult<Self> {
        let policy = match cli
            .registry_cache_policy
            .as_deref()
            .or(toml.registry_cache_policy.as_deref())
        {
            Some(raw) => raw
                .parse::<RegistryCachePolicy>()
                .map_err(|e| PrepError::Common(smilefjes_common::Error::Config(e)))?,
            None => RegistryCachePolicy::default(),
        };

        let logging = match &cli.log_level {
            Some(level) => LoggingConfig { level: level.clone() },
            None => toml.logging.clone(),
        };

        Ok(Self {
            source: cli
                .source
                .clone()
                .or_else(|| toml.source.clone())
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            output: cli
                .output
                .clone()
                .or_else(|| toml.output.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            cache_dir: cli
                .cache_dir
                .clone()
                .or_else(|| toml.cache_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            // 0 means "no cap"
            max_entities: cli.max_entities.or(toml.max_entities).filter(|&n| n > 0),
            registry_delay: Duration::from_millis(
                cli.registry_delay_ms
                    .or(toml.registry_delay_ms)
                    .unwrap_or(DEFAULT_REGISTRY_DELAY_MS),
            ),
            geocode_delay: Duration::from_millis(
                cli.geocode_delay_ms
                    .or(toml.geocode_delay_ms)
                    .unwrap_or(DEFAULT_GEOCODE_DELAY_MS),
            ),
            registry_base_url: cli
                .registry_base_url
                .clone()
                .or_else(|| toml.registry_base_url.clone())
                .unwrap_or_else(|| DEFAULT_REGISTRY_BASE_URL.to_string()),
            geocoder_base_url: cli
                .geocoder_base_url
                .clone()
                .or_else(|| toml.geocoder_base_url.clone())
                .unwrap_or_else(|| DEFAULT_GEOCODER_BASE_URL.to_string()),
            registry_cache_policy: policy,
            flush_every: cli.flush_every.or(toml.flush_every).unwrap_or(0),
            logging,
        })
    }

    pub fn registry_cache_path(&self) -> PathBuf {
        self.cache_dir.join(REGISTRY_CACHE_FILE)
    }

    pub fn geocode_cache_path(&self) -> PathBuf {
        self.cache_dir.join(GEOCODE_CACHE_FILE)
    }
}
