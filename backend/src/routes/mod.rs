//! Route definitions for the Chemical Inventory server

use axum::{middleware, routing::get, Router};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - product stock
        .nest("/products", product_routes(state.clone()))
        // Protected routes - store locations
        .nest("/store_locations", store_location_routes(state.clone()))
        // Protected routes - units
        .nest("/units", unit_routes(state))
}

/// Product routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:product_id/stock", get(handlers::get_product_stock))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Store location routes (protected)
fn store_location_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:id", get(handlers::get_store_location))
        .route("/:id/children", get(handlers::get_store_location_children))
        .route("/:id/empty", get(handlers::is_store_location_empty))
        .route(
            "/:id/products/:product_id/stock",
            get(handlers::get_store_location_product_stock),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Unit routes (protected)
fn unit_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_units))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
