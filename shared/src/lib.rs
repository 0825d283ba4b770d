//! Shared types and models for the Chemical Inventory platform
//!
//! This crate contains the domain models, unit conversion and the
//! hierarchical stock aggregation engine shared between the backend and the
//! frontend (via WASM). It performs no I/O.

pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
