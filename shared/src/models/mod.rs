//! Domain models for the Chemical Inventory platform

mod entity;
mod stock;
mod storage;
mod store_location;
mod unit;

pub use entity::*;
pub use stock::*;
pub use storage::*;
pub use store_location::*;
pub use unit::*;
