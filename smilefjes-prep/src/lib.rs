//! smilefjes-prep library interface
//!
//! Builds the food-safety inspection map dataset: latest inspection per
//! establishment, registry-resolved address, geocoded point, derived
//! rating. Exposed as a library so the pipeline can be driven with fake
//! lookup services in tests.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{PrepError, PrepResult};

use crate::config::PrepConfig;
use crate::services::{
    load_source, parse_inspection_table, BrregClient, FeatureAssembler, GeocodeCache, Geocoder,
    KartverketClient, Pipeline, PostCallDelay, RegistryCache, RegistryResolver, RunOptions,
    RunReport,
};
use std::sync::Arc;
use std::time::Duration;

/// Wire the live registry and geocoder clients into a pipeline
///
/// Caches are loaded from `config.cache_dir`.
pub fn build_pipeline(config: &PrepConfig) -> PrepResult<Pipeline> {
    let registry_cache = RegistryCache::load(&config.registry_cache_path())?;
    let geocode_cache = GeocodeCache::load(&config.geocode_cache_path())?;
    tracing::info!(
        registry_entries = registry_cache.len(),
        geocode_entries = geocode_cache.len(),
        "Caches loaded"
    );

    let resolver = RegistryResolver::new(
        Arc::new(BrregClient::new(config.registry_base_url.clone())?),
        registry_cache,
        config.registry_cache_policy,
        PostCallDelay::new("registry", config.registry_delay),
    );
    let geocoder = Geocoder::new(
        Arc::new(KartverketClient::new(config.geocoder_base_url.clone())?),
        geocode_cache,
        PostCallDelay::new("geocoder", config.geocode_delay),
    );

    Ok(Pipeline::new(
        FeatureAssembler::new(resolver, geocoder),
        RunOptions {
            output: config.output.clone(),
            max_entities: config.max_entities,
            flush_every: config.flush_every,
        },
    ))
}

/// Fetch the source table and run the whole batch
pub async fn run(config: &PrepConfig) -> PrepResult<RunReport> {
    let http_client = reqwest::Client::builder()
        .user_agent(services::registry_client::USER_AGENT)
        .timeout(Duration::from_secs(120))
        .build()?;

    let text = load_source(&http_client, &config.source).await?;
    let records = parse_inspection_table(&text)?;
    tracing::info!(rows = records.len(), "Parsed inspection table");

    let mut pipeline = build_pipeline(config)?;
    pipeline.run(records).await
}
