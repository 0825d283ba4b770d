//! Measurement unit models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::UnitId;

/// A measurement unit.
///
/// A unit without a reference link is a reference (canonical) unit. A unit
/// with a link is a sub-unit whose canonical value is `raw * multiplier`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub label: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    pub reference_unit_id: Option<UnitId>,
    pub unit_type: Option<UnitType>,
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

impl Unit {
    /// Create a reference unit
    pub fn reference(id: UnitId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            multiplier: Decimal::ONE,
            reference_unit_id: None,
            unit_type: None,
        }
    }

    /// Create a sub-unit converting to `reference_unit_id` with `multiplier`
    pub fn sub_unit(
        id: UnitId,
        label: impl Into<String>,
        reference_unit_id: UnitId,
        multiplier: Decimal,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            multiplier,
            reference_unit_id: Some(reference_unit_id),
            unit_type: None,
        }
    }

    pub fn with_type(mut self, unit_type: UnitType) -> Self {
        self.unit_type = Some(unit_type);
        self
    }

    /// A self-referencing unit is treated as a reference unit.
    pub fn is_reference(&self) -> bool {
        match self.reference_unit_id {
            None => true,
            Some(reference) => reference == self.id,
        }
    }
}

/// Grouping of compatible units for search listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Quantity,
    Temperature,
    Concentration,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Quantity => "quantity",
            UnitType::Temperature => "temperature",
            UnitType::Concentration => "concentration",
        }
    }
}

impl std::str::FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quantity" => Ok(UnitType::Quantity),
            "temperature" => Ok(UnitType::Temperature),
            "concentration" => Ok(UnitType::Concentration),
            other => Err(format!("unknown unit type: {}", other)),
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
