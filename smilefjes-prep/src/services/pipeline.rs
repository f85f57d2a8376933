//! Batch pipeline orchestration
//!
//! One sequential pass: reduce → (cap) → assemble each entity in turn →
//! save caches → write GeoJSON. Each record is fully resolved before the
//! next one starts; there is no overlap between external calls.
//!
//! Caches are saved at the end of the run, plus every `flush_every`
//! entities when that is non-zero. A fatal error before a save loses the
//! cache entries learned since the previous save.

use super::feature_assembler::{Assembly, FeatureAssembler};
use super::geocoder::GeocodeStats;
use super::registry_resolver::RegistryStats;
use super::temporal_reducer::reduce_latest;
use crate::error::{PrepError, PrepResult};
use crate::models::{FeatureCollection, InspectionRecord, OutputFeature};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Per-run options
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// GeoJSON destination
    pub output: PathBuf,
    /// Process at most this many entities (first in index order)
    pub max_entities: Option<usize>,
    /// Save caches every N entities; 0 saves only at the end
    pub flush_every: usize,
}

/// End-of-run counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub input_rows: usize,
    /// Rows without entity id, date or name
    pub excluded_rows: usize,
    /// Distinct entities after reduction
    pub entities: usize,
    /// Entities actually processed (after the max-entities cap)
    pub processed: usize,
    pub registry: RegistryStats,
    pub geocode: GeocodeStats,
    pub dropped_no_address: usize,
    pub dropped_no_coordinate: usize,
    pub features: usize,
}

/// Features plus counters of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub features: Vec<OutputFeature>,
    pub stats: RunStats,
}

pub struct Pipeline {
    assembler: FeatureAssembler,
    options: RunOptions,
}

impl Pipeline {
    pub fn new(assembler: FeatureAssembler, options: RunOptions) -> Self {
        Self { assembler, options }
    }

    /// Run the whole batch and write caches and output
    pub async fn run(&mut self, records: Vec<InspectionRecord>) -> PrepResult<RunReport> {
        let started = Instant::now();
        let mut stats = RunStats {
            input_rows: records.len(),
            ..Default::default()
        };

        let reduction = reduce_latest(records);
        stats.excluded_rows = reduction.excluded;
        stats.entities = reduction.latest.len();

        let limit = self.options.max_entities.unwrap_or(usize::MAX);
        info!(
            input_rows = stats.input_rows,
            excluded_rows = stats.excluded_rows,
            entities = stats.entities,
            max_entities = ?self.options.max_entities,
            "Reduced inspections to latest per establishment"
        );

        let mut features = Vec::new();
        for (index, record) in reduction.latest.into_values().take(limit).enumerate() {
            match self.assembler.assemble(&record).await {
                Assembly::Emitted(feature) => features.push(feature),
                Assembly::NoAddress => stats.dropped_no_address += 1,
                Assembly::NoCoordinate => stats.dropped_no_coordinate += 1,
            }
            stats.processed = index + 1;

            if self.options.flush_every > 0 && stats.processed % self.options.flush_every == 0 {
                self.flush_caches()?;
                info!(
                    processed = stats.processed,
                    features = features.len(),
                    "Progress: caches saved"
                );
            }
        }

        self.flush_caches()?;
        self.write_output(&features)?;

        stats.registry = self.assembler.resolver().stats();
        stats.geocode = self.assembler.geocoder().stats();
        stats.features = features.len();

        info!(
            registry_lookups = stats.registry.lookups,
            registry_cache_hits = stats.registry.cache_hits,
            registry_skipped = stats.registry.skipped,
            registry_failures = stats.registry.failures,
            geocode_lookups = stats.geocode.lookups,
            geocode_cache_hits = stats.geocode.cache_hits,
            geocode_misses = stats.geocode.misses,
            dropped_no_address = stats.dropped_no_address,
            dropped_no_coordinate = stats.dropped_no_coordinate,
            features = stats.features,
            elapsed = ?started.elapsed(),
            "Pipeline run complete"
        );

        Ok(RunReport { features, stats })
    }

    /// Save both caches if they gained entries
    pub fn flush_caches(&mut self) -> PrepResult<()> {
        let registry = self.assembler.resolver_mut().cache_mut();
        if registry.is_dirty() {
            registry.save()?;
        }

        let geocode = self.assembler.geocoder_mut().cache_mut();
        if geocode.is_dirty() {
            geocode.save()?;
        }

        Ok(())
    }

    fn write_output(&self, features: &[OutputFeature]) -> PrepResult<()> {
        let collection = FeatureCollection::from_features(features);
        smilefjes_common::fs::write_json_atomic(&collection, &self.options.output).map_err(|e| {
            PrepError::Output {
                path: self.options.output.clone(),
                message: e.to_string(),
            }
        })?;

        info!(
            path = %self.options.output.display(),
            features = features.len(),
            "Wrote GeoJSON"
        );
        Ok(())
    }
}
