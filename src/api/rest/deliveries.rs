use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::Coordinate;
use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::state::AppState;
use crate::workflow::deliveries::{self, CreateDeliveryInput};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deliveries", post(create_delivery).get(list_deliveries))
        .route("/deliveries/:id", get(get_delivery))
        .route("/deliveries/:id/status", patch(update_status))
        .route("/deliveries/:id/location", post(report_location))
        .route("/deliveries/:id/payment", post(mark_paid))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub driver_id: Uuid,
    pub status: DeliveryStatus,
}

#[derive(Deserialize)]
pub struct ReportLocationRequest {
    pub driver_id: Uuid,
    pub location: Coordinate,
}

async fn create_delivery(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDeliveryInput>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = deliveries::create_direct(&state, payload).await?;
    Ok(Json(delivery))
}

async fn list_deliveries(State(state): State<Arc<AppState>>) -> Json<Vec<Delivery>> {
    let deliveries = state
        .deliveries
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(deliveries)
}

async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = state
        .deliveries
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {id} not found")))?;

    Ok(Json(delivery.value().clone()))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = deliveries::advance_status(&state, id, payload.driver_id, payload.status)?;
    Ok(Json(delivery))
}

async fn report_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportLocationRequest>,
) -> Result<StatusCode, AppError> {
    deliveries::record_location(&state, id, payload.driver_id, payload.location)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = deliveries::mark_paid(&state, id)?;
    Ok(Json(delivery))
}
