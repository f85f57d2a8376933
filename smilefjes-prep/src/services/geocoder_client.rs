//! Kartverket address search client
//!
//! Single-hit free-text search against the Geonorge address API, filtered
//! down to the representative point of each address.

use super::geocoder::GeocodeLookup;
use super::lookup::{body_excerpt, LookupError};
use super::registry_client::USER_AGENT;
use crate::models::GeoCoordinate;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://ws.geonorge.no/adresser/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    adresser: Vec<AddressHit>,
}

#[derive(Debug, Deserialize)]
struct AddressHit {
    #[serde(default)]
    representasjonspunkt: Option<RepresentativePoint>,
}

#[derive(Debug, Deserialize)]
struct RepresentativePoint {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl SearchResponse {
    /// Point of the first hit, if it has finite coordinates
    fn first_point(&self) -> Option<GeoCoordinate> {
        let point = self.adresser.first()?.representasjonspunkt.as_ref()?;
        match (point.lon, point.lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => {
                Some(GeoCoordinate::new(lon, lat))
            }
            _ => None,
        }
    }
}

/// HTTP client for the address search API
pub struct KartverketClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl KartverketClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeocodeLookup for KartverketClient {
    async fn search(&self, query: &str) -> Result<Option<GeoCoordinate>, LookupError> {
        let url = format!("{}/sok", self.base_url);
        tracing::debug!(query = %query, "Querying address search");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("sok", query),
                ("treffPerSide", "1"),
                ("side", "0"),
                ("filtrer", "adresser.representasjonspunkt"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status(status.as_u16(), body_excerpt(&body)));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(parsed.first_point())
    }
}
