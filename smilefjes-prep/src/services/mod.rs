//! Pipeline components
//!
//! Leaf-first: source ingestion, temporal reduction, registry resolution,
//! geocoding, rating derivation, feature assembly, orchestration.

pub mod cache_store;
pub mod feature_assembler;
pub mod geocoder;
pub mod geocoder_client;
pub mod lookup;
pub mod pipeline;
pub mod rating;
pub mod registry_client;
pub mod registry_resolver;
pub mod source_reader;
pub mod temporal_reducer;
pub mod throttle;

pub use cache_store::{GeocodeCache, JsonCache, RegistryCache, GEOCODE_CACHE_FILE, REGISTRY_CACHE_FILE};
pub use feature_assembler::{Assembly, FeatureAssembler};
pub use geocoder::{normalize_query, GeocodeLookup, GeocodeStats, Geocoder};
pub use geocoder_client::{KartverketClient, DEFAULT_GEOCODER_BASE_URL};
pub use lookup::LookupError;
pub use pipeline::{Pipeline, RunOptions, RunReport, RunStats};
pub use rating::{derive_rating, parse_legacy_rating, parse_rating_number, Rating, RatingField};
pub use registry_client::{BrregClient, DEFAULT_REGISTRY_BASE_URL};
pub use registry_resolver::{
    format_address, normalize_org_number, select_address, RegistryCachePolicy, RegistryLookup,
    RegistryResolver, RegistryStats,
};
pub use source_reader::{load_source, parse_inspection_table, DEFAULT_SOURCE_URL};
pub use temporal_reducer::{parse_inspection_date, reduce_latest, LatestRecordIndex, Reduction};
pub use throttle::PostCallDelay;
