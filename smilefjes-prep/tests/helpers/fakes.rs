//! Deterministic stand-ins for the registry and geocoding services

use async_trait::async_trait;
use smilefjes_prep::models::{GeoCoordinate, InspectionRecord, RegistryAddress, RegistryEntity};
use smilefjes_prep::services::{GeocodeLookup, LookupError, RegistryLookup};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted service answer
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Found(T),
    NotFound,
    /// Non-2xx, non-404 status
    Fail(u16),
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<Option<T>, LookupError> {
        match self {
            Reply::Found(value) => Ok(Some(value.clone())),
            Reply::NotFound => Ok(None),
            Reply::Fail(status) => Err(LookupError::Status(*status, "upstream unavailable".to_string())),
        }
    }
}

/// Registry fake; unknown numbers answer 404 on both endpoints
#[derive(Default)]
pub struct FakeRegistry {
    sub: HashMap<String, Reply<RegistryEntity>>,
    main: HashMap<String, Reply<RegistryEntity>>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeRegistry {
    pub fn with_sub(mut self, org_number: &str, reply: Reply<RegistryEntity>) -> Self {
        self.sub.insert(org_number.to_string(), reply);
        self
    }

    pub fn with_main(mut self, org_number: &str, reply: Reply<RegistryEntity>) -> Self {
        self.main.insert(org_number.to_string(), reply);
        self
    }

    /// `(endpoint, org_number)` in call order
    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(
        &self,
        endpoint: &'static str,
        table: &HashMap<String, Reply<RegistryEntity>>,
        org_number: &str,
    ) -> Result<Option<RegistryEntity>, LookupError> {
        self.calls.lock().unwrap().push((endpoint, org_number.to_string()));
        table
            .get(org_number)
            .map(Reply::to_result)
            .unwrap_or(Ok(None))
    }
}

#[async_trait]
impl RegistryLookup for FakeRegistry {
    async fn lookup_sub_entity(&self, org_number: &str) -> Result<Option<RegistryEntity>, LookupError> {
        self.answer("sub", &self.sub, org_number)
    }

    async fn lookup_main_entity(&self, org_number: &str) -> Result<Option<RegistryEntity>, LookupError> {
        self.answer("main", &self.main, org_number)
    }
}

/// Geocoder fake keyed by the normalized query; unknown queries find nothing
#[derive(Default)]
pub struct FakeGeocoder {
    answers: HashMap<String, Reply<GeoCoordinate>>,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn with(mut self, query: &str, reply: Reply<GeoCoordinate>) -> Self {
        self.answers.insert(query.to_string(), reply);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl GeocodeLookup for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Option<GeoCoordinate>, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.answers
            .get(query)
            .map(Reply::to_result)
            .unwrap_or(Ok(None))
    }
}

/// Registry entity with an operating-location address
pub fn entity(org_number: &str, line: &str, postal_code: &str, place: &str) -> RegistryEntity {
    RegistryEntity {
        org_number: org_number.to_string(),
        name: Some(format!("ENTITY {}", org_number)),
        operating_address: Some(RegistryAddress {
            lines: vec![line.to_string()],
            postal_code: Some(postal_code.to_string()),
            place: Some(place.to_string()),
        }),
        office_address: None,
    }
}

/// Inspection record with the fields most tests care about
pub fn record(entity_id: &str, org_number: Option<&str>, date: &str, rating: &str) -> InspectionRecord {
    InspectionRecord {
        entity_id: entity_id.to_string(),
        org_number: org_number.map(str::to_string),
        name: format!("Spisested {}", entity_id),
        date: date.to_string(),
        total_rating: Some(rating.to_string()),
        ..Default::default()
    }
}
