//! Business logic services for the Chemical Inventory server

pub mod stock;
pub mod store_location;
pub mod unit;

pub use stock::StockService;
pub use store_location::StoreLocationService;
pub use unit::UnitService;
