//! WebAssembly module for the Chemical Inventory platform
//!
//! Provides client-side computation for:
//! - Unit conversion to reference units
//! - Product stock previews over an offline snapshot
//! - Offline store location validation

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::stock::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

/// Offline copy of the data needed to preview a product's stock
#[derive(Debug, Deserialize)]
struct StockPreviewInput {
    product_id: ProductId,
    locations: Vec<StoreLocation>,
    #[serde(default)]
    storages: Vec<Storage>,
    #[serde(default)]
    units: Vec<Unit>,
}

/// Convert a quantity expressed in a sub-unit to its reference unit
#[wasm_bindgen]
pub fn convert_to_reference_unit(quantity: f64, multiplier: f64) -> Result<f64, JsValue> {
    reference_quantity(quantity, multiplier).map_err(|e| JsValue::from_str(&e))
}

fn reference_quantity(quantity: f64, multiplier: f64) -> Result<f64, String> {
    let quantity =
        Decimal::try_from(quantity).map_err(|e| format!("Invalid quantity: {}", e))?;
    let multiplier =
        Decimal::try_from(multiplier).map_err(|e| format!("Invalid multiplier: {}", e))?;
    validate_multiplier(multiplier)?;

    let converted = quantity
        .checked_mul(multiplier)
        .ok_or("Quantity overflow")?;
    converted
        .to_f64()
        .ok_or_else(|| "Quantity cannot be represented as a number".to_string())
}

/// Compute the stock forest of a product from a JSON snapshot
#[wasm_bindgen]
pub fn compute_stock_preview(snapshot_json: &str) -> Result<String, JsValue> {
    stock_preview(snapshot_json).map_err(|e| JsValue::from_str(&e))
}

fn stock_preview(snapshot_json: &str) -> Result<String, String> {
    let input: StockPreviewInput = serde_json::from_str(snapshot_json)
        .map_err(|e| format!("Invalid snapshot JSON: {}", e))?;

    let resolver = UnitResolver::new(input.units).map_err(|e| e.to_string())?;
    let reference_units: Vec<Unit> = resolver.reference_units().into_iter().cloned().collect();
    let snapshot = StockSnapshot::new(
        input.locations,
        input.storages.into_iter().filter(Storage::contributes),
        resolver,
    );

    let forest =
        compute_stock_for_product(&snapshot, input.product_id, snapshot.roots(), &reference_units)
            .map_err(|e| e.to_string())?;

    serde_json::to_string(&forest).map_err(|e| e.to_string())
}

/// Validate a store location name and optional color.
///
/// Returns an empty string when valid, the first error message otherwise.
#[wasm_bindgen]
pub fn validate_store_location(name: &str, color: Option<String>) -> String {
    let result = validate_store_location_name(name)
        .and_then(|_| color.as_deref().map_or(Ok(()), validate_color));
    match result {
        Ok(()) => String::new(),
        Err(message) => message.to_string(),
    }
}
