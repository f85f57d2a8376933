//! Business registry entity as stored in the registry cache

use serde::{Deserialize, Serialize};

/// A resolved registry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntity {
    /// 9-digit organisation number
    pub org_number: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Operating-location address (preferred)
    #[serde(default)]
    pub operating_address: Option<RegistryAddress>,
    /// Registered-office address
    #[serde(default)]
    pub office_address: Option<RegistryAddress>,
}

/// One registry address variant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryAddress {
    /// Street lines in registry order
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
}
