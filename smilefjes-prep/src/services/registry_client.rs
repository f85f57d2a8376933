//! Brønnøysund business registry (Enhetsregisteret) client
//!
//! Two lookups keyed by organisation number: sub-entities
//! (`/underenheter/{orgnr}`, the physical establishments) and main
//! entities (`/enheter/{orgnr}`).

use super::lookup::{body_excerpt, LookupError};
use super::registry_resolver::RegistryLookup;
use crate::models::{RegistryAddress, RegistryEntity};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://data.brreg.no/enhetsregisteret/api";
pub const USER_AGENT: &str = concat!("smilefjes-prep/", env!("CARGO_PKG_VERSION"));

/// Entity as returned by either endpoint
#[derive(Debug, Deserialize)]
struct BrregEntity {
    #[serde(default)]
    organisasjonsnummer: Option<String>,
    #[serde(default)]
    navn: Option<String>,
    /// Operating location (sub-entities)
    #[serde(default)]
    beliggenhetsadresse: Option<BrregAddress>,
    /// Registered office (main entities)
    #[serde(default)]
    forretningsadresse: Option<BrregAddress>,
}

#[derive(Debug, Deserialize)]
struct BrregAddress {
    #[serde(default)]
    adresse: Vec<String>,
    #[serde(default)]
    postnummer: Option<String>,
    #[serde(default)]
    poststed: Option<String>,
}

impl From<BrregAddress> for RegistryAddress {
    fn from(a: BrregAddress) -> Self {
        Self {
            lines: a.adresse,
            postal_code: a.postnummer,
            place: a.poststed,
        }
    }
}

impl From<BrregEntity> for RegistryEntity {
    fn from(e: BrregEntity) -> Self {
        Self {
            org_number: e.organisasjonsnummer.unwrap_or_default(),
            name: e.navn,
            operating_address: e.beliggenhetsadresse.map(Into::into),
            office_address: e.forretningsadresse.map(Into::into),
        }
    }
}

/// HTTP client for the registry API
pub struct BrregClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BrregClient {
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

    async fn fetch(&self, kind: &str, org_number: &str) -> Result<Option<RegistryEntity>, LookupError> {
        let url = format!("{}/{}/{}", self.base_url, kind, org_number);
        tracing::debug!(org_number = %org_number, url = %url, "Querying registry");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status(status.as_u16(), body_excerpt(&body)));
        }

        let entity: BrregEntity = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(Some(entity.into()))
    }
}

#[async_trait]
impl RegistryLookup for BrregClient {
    async fn lookup_sub_entity(&self, org_number: &str) -> Result<Option<RegistryEntity>, LookupError> {
        self.fetch("underenheter", org_number).await
    }

    async fn lookup_main_entity(&self, org_number: &str) -> Result<Option<RegistryEntity>, LookupError> {
        self.fetch("enheter", org_number).await
    }
}
