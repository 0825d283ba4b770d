//! Computed stock models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{EntityId, StoreLocationId, UnitId};

use super::Unit;

/// Unit reference attached to a stock entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockUnit {
    pub id: UnitId,
    pub label: String,
}

impl From<&Unit> for StockUnit {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            label: unit.label.clone(),
        }
    }
}

/// Stock of a product at one location for one reference unit.
///
/// `unit` is `None` for the unit-less entry. `current` is the quantity stored
/// at the location itself, `total` adds every descendant location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stock {
    pub unit: Option<StockUnit>,
    #[serde(with = "rust_decimal::serde::float")]
    pub current: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A store location annotated with stock figures, as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLocation {
    pub id: StoreLocationId,
    pub name: String,
    pub color: Option<String>,
    pub entity_id: EntityId,
    pub children: Vec<StockLocation>,
    pub stocks: Vec<Stock>,
}

impl StockLocation {
    /// Stock entry for a given reference unit (`None` for the unit-less entry)
    pub fn stock_for(&self, unit_id: Option<UnitId>) -> Option<&Stock> {
        self.stocks
            .iter()
            .find(|s| s.unit.as_ref().map(|u| u.id) == unit_id)
    }

    /// Depth-first search for a location in this subtree
    pub fn find(&self, id: StoreLocationId) -> Option<&StockLocation> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}
