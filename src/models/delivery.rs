use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Waypoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending,
    OnRoute,
    Delivered,
}

impl DeliveryStatus {
    /// The only legal forward step, if any. `Delivered` is terminal.
    pub fn next(&self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Pending => Some(DeliveryStatus::OnRoute),
            DeliveryStatus::OnRoute => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::OnRoute => "OnRoute",
            DeliveryStatus::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// A committed, assigned shipment.
///
/// `assigned_driver_id`, `assigned_vehicle_id` and `base_fare` are fixed at
/// creation and never change afterward, even if the tariff table does.
/// Status moves forward only, one step at a time, driven by the assigned
/// driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub pickup: Waypoint,
    pub dropoff: Waypoint,
    pub assigned_driver_id: Uuid,
    pub assigned_vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup_time: DateTime<Utc>,
    pub drop_time: Option<DateTime<Utc>>,
    pub base_fare: i64,
    pub status: DeliveryStatus,
    pub payment_status: PaymentStatus,
    pub originating_request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
