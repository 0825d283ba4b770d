//! HTTP handlers for product stock endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{ProductId, StockLocation};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::StockService;
use crate::AppState;

/// Get the stock of a product in every store location the caller can see
pub async fn get_product_stock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> AppResult<Json<Vec<StockLocation>>> {
    if !user.has_permission("storages", "read") {
        return Err(AppError::InsufficientPermissions);
    }

    tracing::debug!(person_id = user.person_id, product_id, "Product stock requested");

    let service = StockService::new(state.db.clone());
    let result = service.compute_for_product(product_id, &user.entity_ids).await;
    settle(product_id, result, state.config.stock.empty_forest_on_error).map(Json)
}

/// Apply the stock error policy.
///
/// In lossy mode a failed computation is logged and answered with an empty
/// forest. An unknown product is always reported.
fn settle(
    product_id: ProductId,
    result: AppResult<Vec<StockLocation>>,
    empty_forest_on_error: bool,
) -> AppResult<Vec<StockLocation>> {
    match result {
        Ok(forest) => Ok(forest),
        Err(AppError::NotFound(resource)) => Err(AppError::NotFound(resource)),
        Err(e) if empty_forest_on_error => {
            tracing::error!("Stock computation for product {} failed: {}", product_id, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
