//! Output features and their GeoJSON encoding
//!
//! The map client reads these property names directly, so renaming any of
//! them is a breaking change for the client.

use super::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Where a feature's address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressSource {
    /// Business registry entity address
    Registry,
    /// Address columns of the inspection record
    Fallback,
}

/// One emitted establishment
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFeature {
    pub entity_id: String,
    pub org_number: Option<String>,
    pub name: String,
    pub address: String,
    /// Original DDMMYYYY date text
    pub date: String,
    /// Legacy aggregate rating, `-1` when unparseable
    pub rating: i64,
    pub status: Option<String>,
    pub address_source: AddressSource,
    pub coordinate: GeoCoordinate,
    /// Rating recomputed from the per-criterion values, `None` when unknown
    pub derived_rating: Option<u8>,
    /// Raw per-criterion values for client-side recomputation
    pub criteria: Vec<Option<String>>,
}

/// GeoJSON FeatureCollection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// GeoJSON Feature with a Point geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: String,
    pub org_number: Option<String>,
    pub name: String,
    pub address: String,
    pub date: String,
    pub rating: i64,
    pub status: Option<String>,
    pub address_source: AddressSource,
    pub derived_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Option<String>>,
}

impl From<&OutputFeature> for Feature {
    fn from(feature: &OutputFeature) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: PointGeometry {
                kind: "Point".to_string(),
                coordinates: feature.coordinate.position(),
            },
            properties: FeatureProperties {
                id: feature.entity_id.clone(),
                org_number: feature.org_number.clone(),
                name: feature.name.clone(),
                address: feature.address.clone(),
                date: feature.date.clone(),
                rating: feature.rating,
                status: feature.status.clone(),
                address_source: feature.address_source,
                derived_rating: feature.derived_rating,
                criteria: criteria_if_any(&feature.criteria),
            },
        }
    }
}

// All-blank criteria columns carry nothing for the client.
fn criteria_if_any(criteria: &[Option<String>]) -> Vec<Option<String>> {
    if criteria.iter().any(Option::is_some) {
        criteria.to_vec()
    } else {
        Vec::new()
    }
}

impl FeatureCollection {
    pub fn from_features(features: &[OutputFeature]) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: features.iter().map(Feature::from).collect(),
        }
    }
}
