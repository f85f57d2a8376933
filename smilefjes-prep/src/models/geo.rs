//! Geographic coordinate

use serde::{Deserialize, Serialize};

/// A point in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// GeoJSON position order: `[lon, lat]`
    pub fn position(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}
