//! Stock aggregation errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{StoreLocationId, UnitId};

/// Errors raised while resolving units to their reference unit
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UnitError {
    #[error("unit {0} not found")]
    UnknownUnit(UnitId),

    #[error("duplicate unit id {0}")]
    DuplicateUnit(UnitId),

    #[error("unit {unit} references missing unit {reference}")]
    UnknownReference { unit: UnitId, reference: UnitId },

    #[error("unit {unit} references unit {reference}, which is not a reference unit")]
    NestedReference { unit: UnitId, reference: UnitId },

    #[error("unit {unit} has invalid multiplier {multiplier}")]
    InvalidMultiplier { unit: UnitId, multiplier: Decimal },
}

/// Errors raised while aggregating stock over a location tree
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("store location {0} not found")]
    UnknownLocation(StoreLocationId),

    #[error("store location tree below {location} is deeper than {max} levels")]
    TooDeep { location: StoreLocationId, max: usize },

    #[error("stock quantity overflow at store location {0}")]
    Overflow(StoreLocationId),

    #[error("stock source error: {0}")]
    Source(String),
}
