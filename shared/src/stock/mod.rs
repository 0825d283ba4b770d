//! Hierarchical stock aggregation
//!
//! Computes, for a product, the quantity available at every store location
//! of a forest, per reference unit and once more for unit-less storages.
//! `current` is the quantity held at a location itself and `total` adds the
//! totals of all descendant locations.

mod aggregate;
mod error;
mod source;
mod units;

pub use aggregate::*;
pub use error::*;
pub use source::*;
pub use units::*;
