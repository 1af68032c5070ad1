//! API routes for the delivery server.

pub mod deliveries;
pub mod route_plan;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
