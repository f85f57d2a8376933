//! Persisted lookup caches
//!
//! Each cache is a flat JSON object read once at start and rewritten in
//! full by [`JsonCache::save`]. Entries are never evicted. New entries live
//! only in memory until the next save, so an aborted run loses what it
//! learned since the last save but never damages what was persisted before.

use crate::error::{PrepError, PrepResult};
use crate::models::{GeoCoordinate, RegistryEntity};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Organisation number → registry entity, `None` for a cached negative
pub type RegistryCache = JsonCache<Option<RegistryEntity>>;

/// Resolved address → coordinate
pub type GeocodeCache = JsonCache<GeoCoordinate>;

/// File name of the registry cache inside the cache directory
pub const REGISTRY_CACHE_FILE: &str = "registry-cache.json";

/// File name of the geocode cache inside the cache directory
pub const GEOCODE_CACHE_FILE: &str = "geocode-cache.json";

/// String-keyed map backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonCache<V> {
    path: Option<PathBuf>,
    entries: BTreeMap<String, V>,
    dirty: bool,
}

impl<V> JsonCache<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Cache with no backing file (tests, dry runs)
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Pre-seeded cache with no backing file
    pub fn from_entries(entries: impl IntoIterator<Item = (String, V)>) -> Self {
        Self {
            path: None,
            entries: entries.into_iter().collect(),
            dirty: false,
        }
    }

    /// Load from `path`; a missing file starts an empty cache
    ///
    /// An unreadable or malformed file is fatal: starting empty would make
    /// the end-of-run save overwrite every previously persisted entry.
    pub fn load(path: &Path) -> PrepResult<Self> {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| PrepError::Cache {
                path: path.to_path_buf(),
                message: format!("malformed cache file: {}", e),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No cache file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(PrepError::Cache {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
            dirty: false,
        })
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: String, value: V) {
        self.entries.insert(key, value);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether entries were added since load or the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rewrite the whole backing file atomically
    ///
    /// No-op for in-memory caches.
    pub fn save(&mut self) -> PrepResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        smilefjes_common::fs::write_json_atomic(&self.entries, path).map_err(|e| {
            PrepError::Cache {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "Cache saved");
        self.dirty = false;
        Ok(())
    }
}
