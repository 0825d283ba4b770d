//! HTTP handlers for store location endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::{ProductId, Stock, StoreLocation, StoreLocationId};

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, CurrentUser};
use crate::services::{StockService, StoreLocationService};
use crate::AppState;

/// Response for the emptiness check
#[derive(Serialize)]
pub struct EmptyResponse {
    pub empty: bool,
}

/// Load a store location the caller is allowed to see
async fn visible_location(
    service: &StoreLocationService,
    user: &AuthUser,
    id: StoreLocationId,
) -> AppResult<StoreLocation> {
    let location = service.get(id).await?;
    if !user.sees_entity(location.entity_id) {
        return Err(AppError::ForeignStoreLocation(id));
    }
    Ok(location)
}

/// Get a store location with its full path
pub async fn get_store_location(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<StoreLocationId>,
) -> AppResult<Json<StoreLocation>> {
    if !user.has_permission("storelocations", "read") {
        return Err(AppError::InsufficientPermissions);
    }

    let service = StoreLocationService::new(state.db.clone());
    let location = visible_location(&service, &user, id).await?;
    Ok(Json(location))
}

/// Get the direct children of a store location
pub async fn get_store_location_children(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<StoreLocationId>,
) -> AppResult<Json<Vec<StoreLocation>>> {
    if !user.has_permission("storelocations", "read") {
        return Err(AppError::InsufficientPermissions);
    }

    let service = StoreLocationService::new(state.db.clone());
    visible_location(&service, &user, id).await?;
    let children = service.children(id).await?;
    Ok(Json(children))
}

/// Check whether any storage references a store location
pub async fn is_store_location_empty(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<StoreLocationId>,
) -> AppResult<Json<EmptyResponse>> {
    if !user.has_permission("storelocations", "read") {
        return Err(AppError::InsufficientPermissions);
    }

    let service = StoreLocationService::new(state.db.clone());
    visible_location(&service, &user, id).await?;
    let empty = service.is_empty(id).await?;
    Ok(Json(EmptyResponse { empty }))
}

/// Get the stock figures of a product for one store location subtree
pub async fn get_store_location_product_stock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, product_id)): Path<(StoreLocationId, ProductId)>,
) -> AppResult<Json<Vec<Stock>>> {
    if !user.has_permission("storages", "read") {
        return Err(AppError::InsufficientPermissions);
    }

    let locations = StoreLocationService::new(state.db.clone());
    let location = visible_location(&locations, &user, id).await?;

    let stocks = StockService::new(state.db.clone())
        .figures_at(product_id, &location)
        .await?;
    Ok(Json(stocks))
}
