//! Registry address resolution with a persisted cache
//!
//! Sub-entity first, main entity second. Every cache miss costs one
//! resolution (up to two HTTP calls) followed by the registry delay.
//!
//! Cache writes follow [`RegistryCachePolicy`]. The default write-through
//! policy stores whatever the resolution produced, so a null caused by a
//! transient service failure is indistinguishable from a genuine
//! "not registered" null on later runs. `DefinitiveOnly` leaves transient
//! nulls uncached so the next run retries them.

use super::cache_store::RegistryCache;
use super::lookup::LookupError;
use super::throttle::PostCallDelay;
use crate::models::{RegistryAddress, RegistryEntity};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;

/// Registry lookup capability
///
/// `Ok(None)` means the registry answered "not found".
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup_sub_entity(&self, org_number: &str) -> Result<Option<RegistryEntity>, LookupError>;

    async fn lookup_main_entity(&self, org_number: &str) -> Result<Option<RegistryEntity>, LookupError>;
}

/// Which resolutions are written to the registry cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryCachePolicy {
    /// Cache every attempted resolution, transient-failure nulls included
    #[default]
    WriteThrough,
    /// Cache entities and not-found nulls only
    DefinitiveOnly,
}

impl FromStr for RegistryCachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "write-through" => Ok(Self::WriteThrough),
            "definitive-only" => Ok(Self::DefinitiveOnly),
            other => Err(format!(
                "unknown registry cache policy '{}' (expected write-through or definitive-only)",
                other
            )),
        }
    }
}

/// Counters for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Cache misses that went to the registry
    pub lookups: usize,
    pub cache_hits: usize,
    /// Missing or malformed organisation numbers
    pub skipped: usize,
    /// Lookups where a service call failed without a definitive answer
    pub failures: usize,
}

/// Trimmed organisation number if it is exactly nine ASCII digits
pub fn normalize_org_number(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    (trimmed.len() == 9 && trimmed.bytes().all(|b| b.is_ascii_digit())).then(|| trimmed.to_string())
}

/// Compose a display address
///
/// Street lines are joined with `", "`, postal code and place with a space,
/// and the two groups with `", "`. Blank components are skipped.
pub fn format_address(lines: &[String], postal_code: Option<&str>, place: Option<&str>) -> Option<String> {
    let street = join_non_blank(lines.iter().map(String::as_str), ", ");
    let postal = join_non_blank(postal_code.into_iter().chain(place), " ");
    let full = join_non_blank([street.as_str(), postal.as_str()], ", ");

    (!full.is_empty()).then_some(full)
}

fn join_non_blank<'a>(parts: impl IntoIterator<Item = &'a str>, sep: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Preferred address of an entity: operating location, else registered office
pub fn select_address(entity: &RegistryEntity) -> Option<String> {
    let address: &RegistryAddress = entity
        .operating_address
        .as_ref()
        .or(entity.office_address.as_ref())?;

    format_address(&address.lines, address.postal_code.as_deref(), address.place.as_deref())
}

/// Memoizing registry resolver
pub struct RegistryResolver {
    lookup: Arc<dyn RegistryLookup>,
    cache: RegistryCache,
    policy: RegistryCachePolicy,
    delay: PostCallDelay,
    stats: RegistryStats,
}

impl RegistryResolver {
    pub fn new(
        lookup: Arc<dyn RegistryLookup>,
        cache: RegistryCache,
        policy: RegistryCachePolicy,
        delay: PostCallDelay,
    ) -> Self {
        Self {
            lookup,
            cache,
            policy,
            delay,
            stats: RegistryStats::default(),
        }
    }

    /// Resolve an organisation number to a registry entity
    ///
    /// Invalid numbers are skipped without a lookup or cache write.
    pub async fn resolve(&mut self, raw_org_number: Option<&str>) -> Option<RegistryEntity> {
        let Some(org_number) = normalize_org_number(raw_org_number) else {
            self.stats.skipped += 1;
            return None;
        };

        if let Some(cached) = self.cache.get(&org_number) {
            self.stats.cache_hits += 1;
            return cached.clone();
        }

        self.stats.lookups += 1;
        let mut transient = false;

        let sub_entity = match self.lookup.lookup_sub_entity(&org_number).await {
            Ok(Some(entity)) if !entity.org_number.trim().is_empty() => Some(entity),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(org_number = %org_number, error = %e, "Sub-entity lookup failed");
                transient = true;
                None
            }
        };

        let entity = match sub_entity {
            Some(entity) => Some(entity),
            None => match self.lookup.lookup_main_entity(&org_number).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(org_number = %org_number, error = %e, "Main-entity lookup failed");
                    transient = true;
                    None
                }
            },
        };

        let failed = entity.is_none() && transient;
        if failed {
            self.stats.failures += 1;
        }

        if !failed || self.policy == RegistryCachePolicy::WriteThrough {
            self.cache.insert(org_number.clone(), entity.clone());
        }

        tracing::debug!(
            org_number = %org_number,
            found = entity.is_some(),
            "Registry resolution complete"
        );

        self.delay.wait().await;
        entity
    }

    /// Resolve straight to a display address
    pub async fn resolve_address(&mut self, raw_org_number: Option<&str>) -> Option<String> {
        self.resolve(raw_org_number).await.as_ref().and_then(select_address)
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    pub fn cache(&self) -> &RegistryCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RegistryCache {
        &mut self.cache
    }
}
