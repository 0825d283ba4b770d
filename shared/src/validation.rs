//! Validation utilities for the Chemical Inventory platform

use rust_decimal::Decimal;

use crate::types::PATH_SEPARATOR;

// ============================================================================
// Store Location Validations
// ============================================================================

/// Validate a store location name.
///
/// The path separator is forbidden because full paths are built by joining
/// names with it.
pub fn validate_store_location_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Store location name cannot be empty");
    }
    if name.contains(PATH_SEPARATOR) {
        return Err("Store location name cannot contain '/'");
    }
    Ok(())
}

/// Validate a display color (`#rgb` or `#rrggbb`)
pub fn validate_color(color: &str) -> Result<(), &'static str> {
    let Some(hex) = color.strip_prefix('#') else {
        return Err("Color must start with '#'");
    };
    if hex.len() != 3 && hex.len() != 6 {
        return Err("Color must have 3 or 6 hexadecimal digits");
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must be hexadecimal");
    }
    Ok(())
}

// ============================================================================
// Quantity and Unit Validations
// ============================================================================

/// Validate a storage quantity
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a unit multiplier
pub fn validate_multiplier(multiplier: Decimal) -> Result<(), &'static str> {
    if multiplier <= Decimal::ZERO {
        return Err("Unit multiplier must be positive");
    }
    Ok(())
}
