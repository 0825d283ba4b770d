//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Identifier of an entity (a lab or team owning store locations)
pub type EntityId = i64;

/// Identifier of a store location
pub type StoreLocationId = i64;

/// Identifier of a measurement unit
pub type UnitId = i64;

/// Identifier of a product
pub type ProductId = i64;

/// Identifier of a storage (a physical batch of a product)
pub type StorageId = i64;

/// Separator used in store location full paths
pub const PATH_SEPARATOR: char = '/';

/// Supported languages for error and UI messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    French,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }
}
