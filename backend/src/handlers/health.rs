//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::UnitService;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    /// Number of reference units, `None` when the unit table cannot be read
    pub reference_units: Option<usize>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    // A broken unit table makes every stock request fail, so report it here.
    let reference_units = UnitService::new(state.db.clone())
        .list_reference_units()
        .await
        .ok()
        .map(|units| units.len());

    let status = if reference_units.is_some() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        reference_units,
    })
}
