//! Route planning handler.

use crate::state::store::AppState;
use axum::{extract::State, http::StatusCode, Json};
use foodshare_core::{plan_route, Coordinate, Route};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct OptimizeRouteRequest {
    /// Courier position; falls back to the configured default origin.
    #[serde(default)]
    pub origin: Option<Coordinate>,
    #[serde(default)]
    pub courier_id: Option<String>,
}

pub async fn optimize_route(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OptimizeRouteRequest>,
) -> Result<Json<Route>, (StatusCode, Json<serde_json::Value>)> {
    let origin = payload.origin.unwrap_or(state.config().default_origin);
    if !origin.in_bounds() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "Origin coordinate out of bounds" })),
        ));
    }

    let aggregates = state.active_aggregates(payload.courier_id.as_deref());
    let route = plan_route(&aggregates, origin, &state.config().route_policy);

    tracing::debug!(
        stops = route.stops.len(),
        total_distance_km = route.total_distance_km,
        unrankable = route.unrankable,
        "route computed"
    );

    Ok(Json(route))
}
