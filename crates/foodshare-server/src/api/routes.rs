//! REST API routes.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{deliveries, route_plan};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/v1/deliveries",
            get(deliveries::list_deliveries).post(deliveries::create_delivery),
        )
        .route("/v1/deliveries/:delivery_id", get(deliveries::get_delivery))
        .route(
            "/v1/deliveries/:delivery_id/status",
            post(deliveries::update_delivery_status),
        )
        .route("/v1/routes/optimize", post(route_plan::optimize_route))
}
