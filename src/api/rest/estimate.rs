use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::fare;
use crate::geo::Coordinate;
use crate::routing::distance_with_fallback;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/estimate", post(estimate))
}

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub vehicle_type: String,
}

#[derive(Serialize)]
pub struct EstimateResponse {
    pub distance_km: f64,
    pub fare: i64,
    pub routed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<Coordinate>>,
}

/// Advisory estimate for the booking screen. Unknown vehicle type names
/// price at the default tariff; the fare actually charged is recomputed
/// server-side when the request is submitted.
async fn estimate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let resolved =
        distance_with_fallback(state.route_resolver.as_ref(), payload.pickup, payload.dropoff)
            .await?;
    state.metrics.route_source(resolved.routed);

    let tariff = fare::tariff_by_name(&payload.vehicle_type);
    let fare = fare::estimate_fare(resolved.distance_km, &tariff);

    let (duration_min, polyline) = match resolved.route {
        Some(route) => (Some(route.duration_min), Some(route.polyline)),
        None => (None, None),
    };

    Ok(Json(EstimateResponse {
        distance_km: resolved.distance_km,
        fare,
        routed: resolved.routed,
        duration_min,
        polyline,
    }))
}
