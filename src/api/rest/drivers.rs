use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::{Availability, Driver};
use crate::models::vehicle::VehicleType;
use crate::state::AppState;
use crate::workflow::availability;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver).get(list_drivers))
        .route("/drivers/assignable", get(list_assignable))
        .route("/drivers/:id/availability", patch(update_availability))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub vehicle_types: Vec<VehicleType>,
}

#[derive(Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: Availability,
}

#[derive(Deserialize)]
pub struct AssignableQuery {
    pub vehicle_type: Option<String>,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::InvalidInput("name cannot be empty".to_string()));
    }
    crate::workflow::validate_mobile("mobile", &payload.mobile)?;

    let now = Utc::now();
    let driver = Driver {
        id: Uuid::new_v4(),
        name: payload.name,
        mobile: payload.mobile.trim().to_string(),
        vehicle_types: payload.vehicle_types,
        availability: Availability::Available,
        created_at: now,
        updated_at: now,
    };

    state.drivers.insert(driver.id, driver.clone());
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    let drivers = state
        .drivers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(drivers)
}

async fn list_assignable(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AssignableQuery>,
) -> Result<Json<Vec<Driver>>, AppError> {
    let filter = query
        .vehicle_type
        .as_deref()
        .map(|raw| {
            VehicleType::parse(raw)
                .ok_or_else(|| AppError::InvalidInput(format!("unknown vehicle type: {raw}")))
        })
        .transpose()?;

    Ok(Json(availability::assignable_drivers(&state, filter)))
}

async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = availability::set_availability(&state, id, payload.availability)?;
    Ok(Json(driver))
}
