use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::vehicle::{Vehicle, VehicleType};
use crate::state::AppState;
use crate::workflow::availability;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/vehicles", post(create_vehicle).get(list_vehicles))
}

#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub number_plate: String,
    pub vehicle_type: VehicleType,
    pub capacity_kg: u32,
}

#[derive(Deserialize)]
pub struct VehicleQuery {
    pub vehicle_type: Option<String>,
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    if payload.number_plate.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "number_plate cannot be empty".to_string(),
        ));
    }
    if payload.capacity_kg == 0 {
        return Err(AppError::InvalidInput(
            "capacity_kg must be > 0".to_string(),
        ));
    }

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        number_plate: payload.number_plate.trim().to_string(),
        vehicle_type: payload.vehicle_type,
        capacity_kg: payload.capacity_kg,
        active: true,
        created_at: Utc::now(),
    };

    state.vehicles.insert(vehicle.id, vehicle.clone());
    Ok(Json(vehicle))
}

/// Without a filter, all vehicle records; with one, only active vehicles of
/// exactly that type, as presented on the admin review screen.
async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VehicleQuery>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = match query.vehicle_type.as_deref() {
        Some(raw) => {
            let vehicle_type = VehicleType::parse(raw)
                .ok_or_else(|| AppError::InvalidInput(format!("unknown vehicle type: {raw}")))?;
            availability::matching_vehicles(&state, vehicle_type)
        }
        None => state
            .vehicles
            .iter()
            .map(|entry| entry.value().clone())
            .collect(),
    };

    Ok(Json(vehicles))
}
