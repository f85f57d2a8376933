//! Per-establishment feature assembly
//!
//! registry address (or the record's own address) → coordinate → feature.
//! Records without an address or a coordinate are dropped, not emitted with
//! placeholders. A missing rating never drops a record.

use super::geocoder::Geocoder;
use super::rating::{derive_from_text, parse_legacy_rating};
use super::registry_resolver::{normalize_org_number, RegistryResolver};
use crate::models::{AddressSource, InspectionRecord, OutputFeature};

/// Outcome of assembling one record
#[derive(Debug, Clone, PartialEq)]
pub enum Assembly {
    Emitted(OutputFeature),
    /// Neither registry nor record address available (geocoder not called)
    NoAddress,
    /// Address found but not geocodable
    NoCoordinate,
}

/// Owns the resolver and geocoder for the duration of a run
pub struct FeatureAssembler {
    resolver: RegistryResolver,
    geocoder: Geocoder,
}

impl FeatureAssembler {
    pub fn new(resolver: RegistryResolver, geocoder: Geocoder) -> Self {
        Self { resolver, geocoder }
    }

    /// Resolve, geocode and build the feature for one reduced record
    pub async fn assemble(&mut self, record: &InspectionRecord) -> Assembly {
        let org_number = normalize_org_number(record.org_number.as_deref());

        let registry_address = self.resolver.resolve_address(org_number.as_deref()).await;

        let (address, address_source) = match registry_address {
            Some(address) => (address, AddressSource::Registry),
            None => match record.fallback_address() {
                Some(address) => (address, AddressSource::Fallback),
                None => {
                    tracing::debug!(entity_id = %record.entity_id, "Dropped: no address");
                    return Assembly::NoAddress;
                }
            },
        };

        let Some(coordinate) = self.geocoder.geocode(&address).await else {
            tracing::debug!(entity_id = %record.entity_id, address = %address, "Dropped: no coordinate");
            return Assembly::NoCoordinate;
        };

        Assembly::Emitted(OutputFeature {
            entity_id: record.entity_id.clone(),
            org_number,
            name: record.name.clone(),
            address,
            date: record.date.clone(),
            rating: parse_legacy_rating(record.total_rating.as_deref()),
            status: record.status.clone(),
            address_source,
            coordinate,
            derived_rating: derive_from_text(&record.criteria, record.total_rating.as_deref()).score(),
            criteria: record.criteria.clone(),
        })
    }

    pub fn resolver(&self) -> &RegistryResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut RegistryResolver {
        &mut self.resolver
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    pub fn geocoder_mut(&mut self) -> &mut Geocoder {
        &mut self.geocoder
    }
}
