use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::delivery::Delivery;
use crate::models::request::OrderRequest;
use crate::state::AppState;
use crate::workflow::requests::{self, ApproveInput, CreateRequestInput};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/requests", post(create_request).get(list_requests))
        .route("/requests/:id", get(get_request))
        .route("/requests/:id/approve", post(approve_request))
        .route("/requests/:id/reject", post(reject_request))
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRequestInput>,
) -> Result<Json<OrderRequest>, AppError> {
    let request = requests::create_request(&state, payload).await?;
    Ok(Json(request))
}

async fn list_requests(State(state): State<Arc<AppState>>) -> Json<Vec<OrderRequest>> {
    let requests = state
        .requests
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(requests)
}

async fn get_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderRequest>, AppError> {
    let request = state
        .requests
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order request {id} not found")))?;

    Ok(Json(request.value().clone()))
}

async fn approve_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveInput>,
) -> Result<Json<Delivery>, AppError> {
    let delivery = requests::approve(&state, id, payload)?;
    Ok(Json(delivery))
}

async fn reject_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<OrderRequest>, AppError> {
    let request = requests::reject(&state, id, &payload.reason)?;
    Ok(Json(request))
}
