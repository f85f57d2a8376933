//! Data models for the smilefjes pipeline
//!
//! Raw inspection rows, registry entities, coordinates and the emitted
//! GeoJSON features.

pub mod feature;
pub mod geo;
pub mod inspection;
pub mod registry;

pub use feature::{AddressSource, FeatureCollection, OutputFeature};
pub use geo::GeoCoordinate;
pub use inspection::InspectionRecord;
pub use registry::{RegistryAddress, RegistryEntity};
