//! Storage models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, StorageId, StoreLocationId, UnitId};

/// A physical batch or container of a product kept at a store location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Storage {
    pub id: StorageId,
    pub product_id: ProductId,
    pub store_location_id: StoreLocationId,
    pub quantity: Option<Decimal>,
    pub unit_id: Option<UnitId>,
    #[serde(default)]
    pub archived: bool,
    /// Set when this record is a prior state of another storage
    pub history_of: Option<StorageId>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Storage {
    pub fn new(
        id: StorageId,
        product_id: ProductId,
        store_location_id: StoreLocationId,
        quantity: Decimal,
        unit_id: Option<UnitId>,
    ) -> Self {
        Self {
            id,
            product_id,
            store_location_id,
            quantity: Some(quantity),
            unit_id,
            archived: false,
            history_of: None,
            created_at: None,
            modified_at: None,
        }
    }

    /// Whether this storage counts towards stock figures.
    ///
    /// Archived storages, history records and storages without a quantity
    /// are excluded.
    pub fn contributes(&self) -> bool {
        !self.archived && self.history_of.is_none() && self.quantity.is_some()
    }
}
