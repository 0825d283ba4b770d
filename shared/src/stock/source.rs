//! Location tree data sources for stock aggregation

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{StockError, UnitError, UnitResolver};
use crate::models::{Storage, StoreLocation};
use crate::types::{ProductId, StoreLocationId, UnitId};

/// Which storages a stock pass sums up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitScope {
    /// Storages recorded in this reference unit or any unit converting to it
    Reference(UnitId),
    /// Storages recorded without a unit
    NoUnit,
}

/// Lookups the aggregator performs while walking a location tree
pub trait StockSource {
    /// Direct children of a store location
    fn children(&self, location_id: StoreLocationId) -> Result<Vec<StoreLocation>, StockError>;

    /// Quantity of `product_id` stored at exactly `location_id`, expressed
    /// in the reference unit of `scope`. No matching storage yields zero.
    fn current_quantity(
        &self,
        product_id: ProductId,
        location_id: StoreLocationId,
        scope: UnitScope,
    ) -> Result<Decimal, StockError>;
}

/// In-memory stock source loaded once per request.
///
/// Children are indexed by parent and storages by location so that every
/// lookup during the walk is a map access.
#[derive(Debug, Clone, Default)]
pub struct StockSnapshot {
    locations: HashMap<StoreLocationId, StoreLocation>,
    children: HashMap<StoreLocationId, Vec<StoreLocationId>>,
    storages: HashMap<StoreLocationId, Vec<Storage>>,
    resolver: UnitResolver,
}

impl StockSnapshot {
    pub fn new(
        locations: impl IntoIterator<Item = StoreLocation>,
        storages: impl IntoIterator<Item = Storage>,
        resolver: UnitResolver,
    ) -> Self {
        let locations: HashMap<StoreLocationId, StoreLocation> =
            locations.into_iter().map(|l| (l.id, l)).collect();

        let mut children: HashMap<StoreLocationId, Vec<StoreLocationId>> = HashMap::new();
        for location in locations.values() {
            if let Some(parent_id) = location.parent_id {
                children.entry(parent_id).or_default().push(location.id);
            }
        }
        for ids in children.values_mut() {
            ids.sort_unstable();
        }

        let mut by_location: HashMap<StoreLocationId, Vec<Storage>> = HashMap::new();
        for storage in storages {
            by_location
                .entry(storage.store_location_id)
                .or_default()
                .push(storage);
        }

        Self {
            locations,
            children,
            storages: by_location,
            resolver,
        }
    }

    pub fn resolver(&self) -> &UnitResolver {
        &self.resolver
    }

    pub fn location(&self, location_id: StoreLocationId) -> Option<&StoreLocation> {
        self.locations.get(&location_id)
    }

    pub fn locations(&self) -> &HashMap<StoreLocationId, StoreLocation> {
        &self.locations
    }

    /// Parentless locations ordered by id
    pub fn roots(&self) -> Vec<StoreLocation> {
        let mut roots: Vec<StoreLocation> = self
            .locations
            .values()
            .filter(|l| l.is_root())
            .cloned()
            .collect();
        roots.sort_unstable_by_key(|l| l.id);
        roots
    }
}

impl StockSource for StockSnapshot {
    fn children(&self, location_id: StoreLocationId) -> Result<Vec<StoreLocation>, StockError> {
        if !self.locations.contains_key(&location_id) {
            return Err(StockError::UnknownLocation(location_id));
        }
        Ok(self
            .children
            .get(&location_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.locations.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn current_quantity(
        &self,
        product_id: ProductId,
        location_id: StoreLocationId,
        scope: UnitScope,
    ) -> Result<Decimal, StockError> {
        let Some(storages) = self.storages.get(&location_id) else {
            return Ok(Decimal::ZERO);
        };

        let mut sum = Decimal::ZERO;
        for storage in storages
            .iter()
            .filter(|s| s.product_id == product_id && s.contributes())
        {
            let Some(quantity) = storage.quantity else {
                continue;
            };
            let value = match (scope, storage.unit_id) {
                (UnitScope::NoUnit, None) => quantity,
                (UnitScope::Reference(reference_id), Some(unit_id)) => {
                    let conversion = self
                        .resolver
                        .resolve(unit_id)
                        .ok_or(UnitError::UnknownUnit(unit_id))?;
                    if conversion.reference_id != reference_id {
                        continue;
                    }
                    quantity
                        .checked_mul(conversion.multiplier)
                        .ok_or(StockError::Overflow(location_id))?
                }
                _ => continue,
            };
            sum = sum
                .checked_add(value)
                .ok_or(StockError::Overflow(location_id))?;
        }

        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    fn snapshot() -> StockSnapshot {
        let resolver = UnitResolver::new(vec![
            Unit::reference(1, "L"),
            Unit::sub_unit(2, "mL", 1, Decimal::new(1, 3)),
            Unit::reference(3, "g"),
        ])
        .unwrap();
        let locations = vec![
            StoreLocation::new(10, "Lab", 1),
            StoreLocation::new(12, "Cabinet", 1).with_parent(10),
            StoreLocation::new(11, "Fridge", 1).with_parent(10),
        ];
        let mut archived = Storage::new(4, 100, 10, Decimal::from(50), Some(1));
        archived.archived = true;
        let storages = vec![
            Storage::new(1, 100, 10, Decimal::from(2), Some(1)),
            Storage::new(2, 100, 10, Decimal::from(1000), Some(2)),
            Storage::new(3, 100, 10, Decimal::from(7), Some(3)),
            archived,
            Storage::new(5, 200, 10, Decimal::from(9), Some(1)),
            Storage::new(6, 100, 10, Decimal::from(4), None),
        ];
        StockSnapshot::new(locations, storages, resolver)
    }

    #[test]
    fn test_children_are_ordered_by_id() {
        let ids: Vec<StoreLocationId> = snapshot()
            .children(10)
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![11, 12]);
    }

    #[test]
    fn test_unknown_location_children() {
        assert_eq!(
            snapshot().children(99),
            Err(StockError::UnknownLocation(99))
        );
    }

    #[test]
    fn test_current_quantity_converts_sub_units() {
        let source = snapshot();
        assert_eq!(
            source.current_quantity(100, 10, UnitScope::Reference(1)).unwrap(),
            Decimal::from(3)
        );
        assert_eq!(
            source.current_quantity(100, 10, UnitScope::Reference(3)).unwrap(),
            Decimal::from(7)
        );
        assert_eq!(
            source.current_quantity(100, 10, UnitScope::NoUnit).unwrap(),
            Decimal::from(4)
        );
    }

    #[test]
    fn test_current_quantity_without_storages_is_zero() {
        assert_eq!(
            snapshot()
                .current_quantity(100, 11, UnitScope::Reference(1))
                .unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_unknown_storage_unit_is_an_error() {
        let storages = vec![Storage::new(1, 100, 10, Decimal::ONE, Some(42))];
        let source = StockSnapshot::new(
            vec![StoreLocation::new(10, "Lab", 1)],
            storages,
            UnitResolver::default(),
        );
        assert_eq!(
            source.current_quantity(100, 10, UnitScope::Reference(1)),
            Err(StockError::Unit(UnitError::UnknownUnit(42)))
        );
    }

    #[test]
    fn test_roots() {
        let roots = snapshot().roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, 10);
    }
}
