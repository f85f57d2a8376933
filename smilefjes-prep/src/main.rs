//! smilefjes-prep - inspection map data preparation
//!
//! Fetches the Mattilsynet inspection table, resolves addresses through
//! Enhetsregisteret, geocodes them with Kartverket and writes the GeoJSON
//! consumed by the map client. Caches in the cache directory make repeat
//! runs cheap.

use anyhow::{Context, Result};
use clap::Parser;
use smilefjes_prep::config::{Cli, LoadedConfig, PrepConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let LoadedConfig { config, file } =
        PrepConfig::load(&cli).context("Failed to load configuration")?;

    smilefjes_common::logging::init_tracing(&config.logging)?;

    info!("Starting smilefjes-prep");
    match &file {
        Some(path) => info!("Loaded TOML configuration from {}", path.display()),
        None => info!("No config file found, using CLI/ENV and defaults"),
    }
    info!(
        "Version: {} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        source = %config.source,
        output = %config.output.display(),
        cache_dir = %config.cache_dir.display(),
        max_entities = ?config.max_entities,
        registry_delay = ?config.registry_delay,
        geocode_delay = ?config.geocode_delay,
        registry_cache_policy = ?config.registry_cache_policy,
        "Configuration resolved"
    );

    match smilefjes_prep::run(&config).await {
        Ok(report) => {
            info!(features = report.stats.features, "Done");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Pipeline run aborted");
            Err(e.into())
        }
    }
}
