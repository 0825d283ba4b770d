//! HTTP handlers for measurement unit endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{Unit, UnitType};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::UnitService;
use crate::AppState;

/// Query parameters for the unit listing
#[derive(Debug, Deserialize)]
pub struct UnitQuery {
    /// "quantity", "temperature" or "concentration"
    pub unit_type: Option<String>,
}

/// List measurement units
pub async fn list_units(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<UnitQuery>,
) -> AppResult<Json<Vec<Unit>>> {
    if !user.has_permission("units", "read") {
        return Err(AppError::InsufficientPermissions);
    }

    let unit_type = match query.unit_type.as_deref() {
        Some(raw) => Some(raw.parse::<UnitType>().map_err(|message| AppError::Validation {
            field: "unit_type".to_string(),
            message,
            message_fr: format!("type d'unité inconnu : {}", raw),
        })?),
        None => None,
    };

    let units = UnitService::new(state.db.clone())
        .list_units(unit_type)
        .await?;
    Ok(Json(units))
}
