use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Waypoint;
use crate::models::vehicle::VehicleType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

/// A customer-submitted delivery request awaiting admin review.
///
/// `estimated_distance_km` and `estimated_fare` are the server-side estimate
/// computed at submission; the fare actually charged is fixed on the
/// `Delivery` at approval time. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup: Waypoint,
    pub dropoff: Waypoint,
    pub vehicle_type: VehicleType,
    pub pickup_time: DateTime<Utc>,
    pub estimated_distance_km: f64,
    pub estimated_fare: i64,
    pub status: RequestStatus,
    pub rejection_reason: Option<String>,
    pub delivery_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
