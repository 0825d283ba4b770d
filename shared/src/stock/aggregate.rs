//! Hierarchical stock aggregator

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use super::{StockError, StockSource, UnitScope};
use crate::models::{Stock, StockLocation, StockUnit, StoreLocation, Unit};
use crate::types::{ProductId, StoreLocationId};

/// Deepest location nesting walked before giving up on a corrupt tree
pub const MAX_LOCATION_DEPTH: usize = 64;

/// Stock figures of one location for one unit scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockFigures {
    pub current: Decimal,
    pub total: Decimal,
}

/// Compute `(current, total)` for a location without materializing a tree
pub fn stock_figures<S: StockSource + ?Sized>(
    source: &S,
    product_id: ProductId,
    location_id: StoreLocationId,
    scope: UnitScope,
) -> Result<StockFigures, StockError> {
    figures_below(source, product_id, location_id, scope, 0)
}

fn figures_below<S: StockSource + ?Sized>(
    source: &S,
    product_id: ProductId,
    location_id: StoreLocationId,
    scope: UnitScope,
    depth: usize,
) -> Result<StockFigures, StockError> {
    check_depth(location_id, depth)?;

    let current = source.current_quantity(product_id, location_id, scope)?;
    let mut total = current;
    for child in source.children(location_id)? {
        let child_figures = figures_below(source, product_id, child.id, scope, depth + 1)?;
        total = add(total, child_figures.total, location_id)?;
    }

    Ok(StockFigures { current, total })
}

fn check_depth(location_id: StoreLocationId, depth: usize) -> Result<(), StockError> {
    if depth > MAX_LOCATION_DEPTH {
        return Err(StockError::TooDeep {
            location: location_id,
            max: MAX_LOCATION_DEPTH,
        });
    }
    Ok(())
}

fn add(a: Decimal, b: Decimal, location_id: StoreLocationId) -> Result<Decimal, StockError> {
    a.checked_add(b).ok_or(StockError::Overflow(location_id))
}

/// A materialized location with the stock entries gathered so far
#[derive(Debug, Clone)]
pub struct StockNode {
    pub location: StoreLocation,
    pub children: Vec<StoreLocationId>,
    pub stocks: Vec<Stock>,
}

impl StockNode {
    fn new(location: StoreLocation) -> Self {
        Self {
            location,
            children: Vec::new(),
            stocks: Vec::new(),
        }
    }
}

/// Location forest discovered while aggregating, indexed by location id.
///
/// Nodes are created the first time a walk reaches them and reused by every
/// later pass, so each pass appends one stock entry per node.
#[derive(Debug, Clone, Default)]
pub struct StockTree {
    roots: Vec<StoreLocationId>,
    nodes: HashMap<StoreLocationId, StockNode>,
}

impl StockTree {
    pub fn new(roots: impl IntoIterator<Item = StoreLocation>) -> Self {
        let mut tree = Self::default();
        for root in roots {
            if let Entry::Vacant(entry) = tree.nodes.entry(root.id) {
                tree.roots.push(root.id);
                entry.insert(StockNode::new(root));
            }
        }
        tree
    }

    pub fn roots(&self) -> &[StoreLocationId] {
        &self.roots
    }

    pub fn node(&self, location_id: StoreLocationId) -> Option<&StockNode> {
        self.nodes.get(&location_id)
    }

    /// Number of materialized locations
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Run one pass per root and reference unit, then one unit-less pass per
    /// root, appending a stock entry to every visited node.
    ///
    /// A location reached twice in the same unit pass, e.g. a root that is
    /// also the descendant of another root, is annotated once and its total
    /// reused. Entries are appended, never replaced: accumulating twice on
    /// the same tree duplicates them.
    pub fn accumulate<S: StockSource + ?Sized>(
        &mut self,
        source: &S,
        product_id: ProductId,
        reference_units: &[Unit],
    ) -> Result<(), StockError> {
        let roots = self.roots.clone();

        for unit in reference_units {
            let stock_unit = StockUnit::from(unit);
            let mut seen = HashMap::new();
            for &root in &roots {
                self.visit(
                    source,
                    product_id,
                    root,
                    UnitScope::Reference(unit.id),
                    Some(&stock_unit),
                    &mut seen,
                    0,
                )?;
            }
        }

        let mut seen = HashMap::new();
        for &root in &roots {
            self.visit(source, product_id, root, UnitScope::NoUnit, None, &mut seen, 0)?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn visit<S: StockSource + ?Sized>(
        &mut self,
        source: &S,
        product_id: ProductId,
        location_id: StoreLocationId,
        scope: UnitScope,
        unit: Option<&StockUnit>,
        seen: &mut HashMap<StoreLocationId, Decimal>,
        depth: usize,
    ) -> Result<Decimal, StockError> {
        if let Some(&total) = seen.get(&location_id) {
            return Ok(total);
        }
        check_depth(location_id, depth)?;

        let current = source.current_quantity(product_id, location_id, scope)?;
        let mut total = current;

        for child in source.children(location_id)? {
            let child_id = child.id;
            self.attach(location_id, child);
            let child_total =
                self.visit(source, product_id, child_id, scope, unit, seen, depth + 1)?;
            total = add(total, child_total, location_id)?;
        }

        if let Some(node) = self.nodes.get_mut(&location_id) {
            node.stocks.push(Stock {
                unit: unit.cloned(),
                current,
                total,
            });
        }
        seen.insert(location_id, total);

        Ok(total)
    }

    /// Link `child` below `parent_id`, creating its node on first discovery
    fn attach(&mut self, parent_id: StoreLocationId, child: StoreLocation) {
        let child_id = child.id;
        self.nodes
            .entry(child_id)
            .or_insert_with(|| StockNode::new(child));
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            if !parent.children.contains(&child_id) {
                parent.children.push(child_id);
            }
        }
    }

    /// Nested presentation of the annotated forest
    ///
    /// A root found below another root is only listed under its parent.
    pub fn into_forest(mut self) -> Vec<StockLocation> {
        let nested: HashSet<StoreLocationId> = self
            .nodes
            .values()
            .flat_map(|node| node.children.iter().copied())
            .collect();
        let roots = std::mem::take(&mut self.roots);
        roots
            .into_iter()
            .filter(|id| !nested.contains(id))
            .filter_map(|id| self.take_location(id))
            .collect()
    }

    fn take_location(&mut self, location_id: StoreLocationId) -> Option<StockLocation> {
        let node = self.nodes.remove(&location_id)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child_id| self.take_location(child_id))
            .collect();

        Some(StockLocation {
            id: node.location.id,
            name: node.location.name,
            color: node.location.color,
            entity_id: node.location.entity_id,
            children,
            stocks: node.stocks,
        })
    }
}

/// Annotate the visible root locations with the stock of `product_id`.
///
/// Every reached location gets one entry per reference unit followed by the
/// unit-less entry, zero figures included. Any lookup failure aborts the
/// whole computation.
pub fn compute_stock_for_product<S: StockSource + ?Sized>(
    source: &S,
    product_id: ProductId,
    roots: impl IntoIterator<Item = StoreLocation>,
    reference_units: &[Unit],
) -> Result<Vec<StockLocation>, StockError> {
    let mut tree = StockTree::new(roots);
    tree.accumulate(source, product_id, reference_units)?;
    Ok(tree.into_forest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Storage;
    use crate::stock::{StockSnapshot, UnitResolver};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn units() -> Vec<Unit> {
        vec![
            Unit::reference(1, "L"),
            Unit::sub_unit(2, "mL", 1, dec("0.001")),
        ]
    }

    fn source(locations: Vec<StoreLocation>, storages: Vec<Storage>) -> StockSnapshot {
        StockSnapshot::new(locations, storages, UnitResolver::new(units()).unwrap())
    }

    #[test]
    fn test_root_and_child_with_sub_unit() {
        let snapshot = source(
            vec![
                StoreLocation::new(1, "R", 1),
                StoreLocation::new(2, "C", 1).with_parent(1),
            ],
            vec![
                Storage::new(1, 7, 1, dec("5"), Some(1)),
                Storage::new(2, 7, 2, dec("3"), Some(2)),
            ],
        );

        let forest =
            compute_stock_for_product(&snapshot, 7, snapshot.roots(), &units()[..1]).unwrap();

        let root = &forest[0];
        let litre = root.stock_for(Some(1)).unwrap();
        assert_eq!(litre.current, dec("5"));
        assert_eq!(litre.total, dec("5.003"));

        let child = root.find(2).unwrap();
        let child_litre = child.stock_for(Some(1)).unwrap();
        assert_eq!(child_litre.current, dec("0.003"));
        assert_eq!(child_litre.total, dec("0.003"));
    }

    #[test]
    fn test_every_node_has_unit_and_unitless_entries() {
        let snapshot = source(
            vec![
                StoreLocation::new(1, "R", 1),
                StoreLocation::new(2, "C", 1).with_parent(1),
            ],
            vec![],
        );

        let forest =
            compute_stock_for_product(&snapshot, 7, snapshot.roots(), &units()[..1]).unwrap();

        for location in [&forest[0], &forest[0].children[0]] {
            assert_eq!(location.stocks.len(), 2);
            assert_eq!(location.stocks[0].unit.as_ref().map(|u| u.id), Some(1));
            assert!(location.stocks[1].unit.is_none());
            assert!(location
                .stocks
                .iter()
                .all(|s| s.current.is_zero() && s.total.is_zero()));
        }
    }

    #[test]
    fn test_unitless_pass_sums_storages_without_unit() {
        let snapshot = source(
            vec![StoreLocation::new(1, "R", 1)],
            vec![
                Storage::new(1, 7, 1, dec("2"), None),
                Storage::new(2, 7, 1, dec("4"), None),
            ],
        );

        let forest =
            compute_stock_for_product(&snapshot, 7, snapshot.roots(), &units()[..1]).unwrap();
        let unitless = forest[0].stock_for(None).unwrap();
        assert_eq!(unitless.current, dec("6"));
        assert_eq!(unitless.total, dec("6"));
        assert!(forest[0].stock_for(Some(1)).unwrap().total.is_zero());
    }

    #[test]
    fn test_accumulating_twice_duplicates_entries() {
        let snapshot = source(vec![StoreLocation::new(1, "R", 1)], vec![]);
        let mut tree = StockTree::new(snapshot.roots());

        tree.accumulate(&snapshot, 7, &units()[..1]).unwrap();
        assert_eq!(tree.node(1).unwrap().stocks.len(), 2);

        tree.accumulate(&snapshot, 7, &units()[..1]).unwrap();
        assert_eq!(tree.node(1).unwrap().stocks.len(), 4);
    }

    #[test]
    fn test_root_below_another_root_is_nested_once() {
        let snapshot = source(
            vec![
                StoreLocation::new(1, "R", 1),
                StoreLocation::new(2, "C", 1).with_parent(1),
            ],
            vec![Storage::new(1, 7, 2, dec("3"), Some(1))],
        );
        let r = snapshot.location(1).unwrap().clone();
        let c = snapshot.location(2).unwrap().clone();

        for roots in [vec![r.clone(), c.clone()], vec![c, r]] {
            let forest = compute_stock_for_product(&snapshot, 7, roots, &units()[..1]).unwrap();
            assert_eq!(forest.len(), 1);

            let root = &forest[0];
            assert_eq!(root.id, 1);
            assert_eq!(root.children.len(), 1);
            assert_eq!(root.stock_for(Some(1)).unwrap().current, Decimal::ZERO);
            assert_eq!(root.stock_for(Some(1)).unwrap().total, dec("3"));

            let child = &root.children[0];
            assert_eq!(child.id, 2);
            assert_eq!(child.stocks.len(), 2);
            assert_eq!(child.stock_for(Some(1)).unwrap().total, dec("3"));
        }
    }

    #[test]
    fn test_stock_figures_matches_tree() {
        let snapshot = source(
            vec![
                StoreLocation::new(1, "R", 1),
                StoreLocation::new(2, "C", 1).with_parent(1),
                StoreLocation::new(3, "G", 1).with_parent(2),
            ],
            vec![Storage::new(1, 7, 3, dec("9"), Some(1))],
        );

        let figures = stock_figures(&snapshot, 7, 1, UnitScope::Reference(1)).unwrap();
        assert_eq!(figures.current, Decimal::ZERO);
        assert_eq!(figures.total, dec("9"));
    }

    #[test]
    fn test_parent_cycle_is_reported_as_too_deep() {
        // Both locations have a parent, so neither is a root; walk from one.
        let snapshot = source(
            vec![
                StoreLocation::new(1, "A", 1).with_parent(2),
                StoreLocation::new(2, "B", 1).with_parent(1),
            ],
            vec![],
        );

        let result = stock_figures(&snapshot, 7, 1, UnitScope::NoUnit);
        assert!(matches!(result, Err(StockError::TooDeep { .. })));
    }
}
