//! Unit conversion resolver

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::UnitError;
use crate::models::{Unit, UnitType};
use crate::types::UnitId;
use crate::validation::validate_multiplier;

/// Conversion of a concrete unit into its reference unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub reference_id: UnitId,
    pub multiplier: Decimal,
}

/// Maps every unit to its reference unit and multiplier.
///
/// Units form a single level of indirection: a unit is either a reference
/// unit or points directly at one.
#[derive(Debug, Clone, Default)]
pub struct UnitResolver {
    units: BTreeMap<UnitId, Unit>,
}

impl UnitResolver {
    /// Index `units` and check the one-level reference invariant
    pub fn new(units: impl IntoIterator<Item = Unit>) -> Result<Self, UnitError> {
        let mut index = BTreeMap::new();

        for unit in units {
            if validate_multiplier(unit.multiplier).is_err() {
                return Err(UnitError::InvalidMultiplier {
                    unit: unit.id,
                    multiplier: unit.multiplier,
                });
            }
            let id = unit.id;
            if index.insert(id, unit).is_some() {
                return Err(UnitError::DuplicateUnit(id));
            }
        }

        for unit in index.values() {
            if unit.is_reference() {
                continue;
            }
            let Some(reference_id) = unit.reference_unit_id else {
                continue;
            };
            let reference = index.get(&reference_id).ok_or(UnitError::UnknownReference {
                unit: unit.id,
                reference: reference_id,
            })?;
            if !reference.is_reference() {
                return Err(UnitError::NestedReference {
                    unit: unit.id,
                    reference: reference_id,
                });
            }
        }

        Ok(Self { units: index })
    }

    pub fn get(&self, unit_id: UnitId) -> Option<&Unit> {
        self.units.get(&unit_id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Reference units ordered by id
    pub fn reference_units(&self) -> Vec<&Unit> {
        self.units.values().filter(|u| u.is_reference()).collect()
    }

    /// Reference unit and multiplier for `unit_id`.
    ///
    /// A reference unit resolves to itself with its stored multiplier.
    pub fn resolve(&self, unit_id: UnitId) -> Option<Conversion> {
        let unit = self.units.get(&unit_id)?;
        let reference_id = if unit.is_reference() {
            unit.id
        } else {
            unit.reference_unit_id?
        };
        Some(Conversion {
            reference_id,
            multiplier: unit.multiplier,
        })
    }

    /// Every unit converting to `reference_id`, itself included
    pub fn members(&self, reference_id: UnitId) -> Vec<(&Unit, Decimal)> {
        self.units
            .values()
            .filter_map(|unit| {
                let conversion = self.resolve(unit.id)?;
                (conversion.reference_id == reference_id).then_some((unit, conversion.multiplier))
            })
            .collect()
    }

    /// Convert a raw quantity expressed in `unit_id` into its reference unit
    pub fn to_reference(
        &self,
        quantity: Decimal,
        unit_id: UnitId,
    ) -> Result<(UnitId, Decimal), UnitError> {
        let conversion = self.resolve(unit_id).ok_or(UnitError::UnknownUnit(unit_id))?;
        let value = quantity
            .checked_mul(conversion.multiplier)
            .ok_or(UnitError::InvalidMultiplier {
                unit: unit_id,
                multiplier: conversion.multiplier,
            })?;
        Ok((conversion.reference_id, value))
    }

    pub fn units_of_type(&self, unit_type: UnitType) -> Vec<&Unit> {
        self.units
            .values()
            .filter(|u| u.unit_type == Some(unit_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn lab_units() -> Vec<Unit> {
        vec![
            Unit::reference(1, "L").with_type(UnitType::Quantity),
            Unit::sub_unit(2, "mL", 1, dec("0.001")).with_type(UnitType::Quantity),
            Unit::sub_unit(3, "µL", 1, dec("0.000001")).with_type(UnitType::Quantity),
            Unit::reference(4, "g").with_type(UnitType::Quantity),
            Unit::sub_unit(5, "kg", 4, dec("1000")).with_type(UnitType::Quantity),
            Unit::reference(6, "°K").with_type(UnitType::Temperature),
        ]
    }

    #[test]
    fn test_reference_units_are_ordered() {
        let resolver = UnitResolver::new(lab_units()).unwrap();
        let labels: Vec<&str> = resolver
            .reference_units()
            .iter()
            .map(|u| u.label.as_str())
            .collect();
        assert_eq!(labels, vec!["L", "g", "°K"]);
    }

    #[test]
    fn test_resolve_sub_unit() {
        let resolver = UnitResolver::new(lab_units()).unwrap();
        assert_eq!(
            resolver.resolve(2),
            Some(Conversion {
                reference_id: 1,
                multiplier: dec("0.001")
            })
        );
        assert_eq!(resolver.resolve(1).map(|c| c.reference_id), Some(1));
        assert_eq!(resolver.resolve(99), None);
    }

    #[test]
    fn test_to_reference() {
        let resolver = UnitResolver::new(lab_units()).unwrap();
        assert_eq!(resolver.to_reference(dec("3"), 2).unwrap(), (1, dec("0.003")));
        assert_eq!(resolver.to_reference(dec("2"), 5).unwrap(), (4, dec("2000")));
        assert_eq!(
            resolver.to_reference(dec("1"), 77),
            Err(UnitError::UnknownUnit(77))
        );
    }

    #[test]
    fn test_members() {
        let resolver = UnitResolver::new(lab_units()).unwrap();
        let members: Vec<UnitId> = resolver.members(1).iter().map(|(u, _)| u.id).collect();
        assert_eq!(members, vec![1, 2, 3]);
        assert_eq!(resolver.members(6).len(), 1);
    }

    #[test]
    fn test_self_reference_is_a_reference_unit() {
        let mut mm = Unit::reference(10, "mM");
        mm.reference_unit_id = Some(10);
        let resolver = UnitResolver::new(vec![mm]).unwrap();
        assert_eq!(resolver.reference_units().len(), 1);
        assert_eq!(resolver.resolve(10).map(|c| c.reference_id), Some(10));
    }

    #[test]
    fn test_nested_reference_is_rejected() {
        let units = vec![
            Unit::reference(1, "L"),
            Unit::sub_unit(2, "mL", 1, dec("0.001")),
            Unit::sub_unit(3, "µL", 2, dec("0.001")),
        ];
        assert_eq!(
            UnitResolver::new(units).unwrap_err(),
            UnitError::NestedReference {
                unit: 3,
                reference: 2
            }
        );
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let units = vec![Unit::sub_unit(2, "mL", 1, dec("0.001"))];
        assert_eq!(
            UnitResolver::new(units).unwrap_err(),
            UnitError::UnknownReference {
                unit: 2,
                reference: 1
            }
        );
    }

    #[test]
    fn test_invalid_multiplier_is_rejected() {
        let units = vec![Unit::reference(1, "L"), Unit::sub_unit(2, "mL", 1, Decimal::ZERO)];
        assert!(matches!(
            UnitResolver::new(units),
            Err(UnitError::InvalidMultiplier { unit: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_unit_is_rejected() {
        let units = vec![Unit::reference(1, "L"), Unit::reference(1, "g")];
        assert_eq!(
            UnitResolver::new(units).unwrap_err(),
            UnitError::DuplicateUnit(1)
        );
    }

    #[test]
    fn test_units_of_type() {
        let resolver = UnitResolver::new(lab_units()).unwrap();
        assert_eq!(resolver.units_of_type(UnitType::Quantity).len(), 5);
        assert_eq!(resolver.units_of_type(UnitType::Temperature).len(), 1);
        assert!(resolver.units_of_type(UnitType::Concentration).is_empty());
    }
}
