//! Entity and product models

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, ProductId};

/// A lab, team or department owning a tree of store locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
}

/// A chemical product whose storages are aggregated into stock figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
}
