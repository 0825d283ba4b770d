//! HTTP handlers for the Chemical Inventory server

pub mod health;
pub mod stock;
pub mod store_location;
pub mod unit;

pub use health::health_check;
pub use stock::get_product_stock;
pub use store_location::{
    get_store_location, get_store_location_children, get_store_location_product_stock,
    is_store_location_empty,
};
pub use unit::list_units;
