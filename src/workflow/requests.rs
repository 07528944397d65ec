use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::fare;
use crate::geo::Waypoint;
use crate::models::delivery::{Delivery, DeliveryStatus, PaymentStatus};
use crate::models::request::{OrderRequest, RequestStatus};
use crate::models::vehicle::VehicleType;
use crate::notify::Event;
use crate::routing::distance_with_fallback;
use crate::state::AppState;
use crate::workflow::availability::validate_assignment;
use crate::workflow::{parse_timestamp, validate_mobile, validate_non_empty};

#[derive(Debug, Deserialize)]
pub struct CreateRequestInput {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup: Waypoint,
    pub dropoff: Waypoint,
    pub vehicle_type: String,
    pub pickup_time: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveInput {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub pickup: Option<Waypoint>,
    pub dropoff: Option<Waypoint>,
    pub drop_time: Option<String>,
    pub base_fare: Option<i64>,
}

/// Customer submission. The estimate uses the routed distance when the
/// routing service answers and straight-line distance otherwise, so a dead
/// routing service never blocks a request.
pub async fn create_request(
    state: &AppState,
    input: CreateRequestInput,
) -> Result<OrderRequest, AppError> {
    validate_non_empty("customer_name", &input.customer_name)?;
    validate_mobile("customer_mobile", &input.customer_mobile)?;
    let pickup_time = parse_timestamp("pickup_time", &input.pickup_time)?;
    let vehicle_type = VehicleType::parse(&input.vehicle_type).ok_or_else(|| {
        AppError::InvalidInput(format!("unknown vehicle type: {}", input.vehicle_type))
    })?;

    let resolved = distance_with_fallback(
        state.route_resolver.as_ref(),
        input.pickup.location,
        input.dropoff.location,
    )
    .await?;
    state.metrics.route_source(resolved.routed);

    let estimated_fare = fare::estimate_fare(resolved.distance_km, &fare::tariff(vehicle_type));

    let request = OrderRequest {
        id: Uuid::new_v4(),
        customer_id: input.customer_id,
        customer_name: input.customer_name,
        customer_mobile: input.customer_mobile.trim().to_string(),
        pickup: input.pickup,
        dropoff: input.dropoff,
        vehicle_type,
        pickup_time,
        estimated_distance_km: resolved.distance_km,
        estimated_fare,
        status: RequestStatus::Pending,
        rejection_reason: None,
        delivery_id: None,
        created_at: Utc::now(),
    };

    state.requests.insert(request.id, request.clone());
    state
        .metrics
        .order_requests_total
        .with_label_values(&["created"])
        .inc();
    state.notifications.publish(Event::OrderRequestCreated {
        request_id: request.id,
        status: request.status,
        estimated_fare,
    });

    info!(
        request_id = %request.id,
        distance_km = resolved.distance_km,
        routed = resolved.routed,
        estimated_fare,
        "order request created"
    );

    Ok(request)
}

/// Admin approval: re-validates driver availability and the vehicle at
/// commit time, then creates the delivery and finalizes the request as one
/// unit under the request's entry lock. A losing concurrent approve sees
/// `AlreadyFinalized`; any failed check leaves the request `Pending` with
/// no delivery created.
pub fn approve(
    state: &AppState,
    request_id: Uuid,
    input: ApproveInput,
) -> Result<Delivery, AppError> {
    let drop_time = input
        .drop_time
        .as_deref()
        .map(|raw| parse_timestamp("drop_time", raw))
        .transpose()?;

    if let Some(pickup) = &input.pickup {
        pickup.location.validate()?;
    }
    if let Some(dropoff) = &input.dropoff {
        dropoff.location.validate()?;
    }

    let mut request = state
        .requests
        .get_mut(&request_id)
        .ok_or_else(|| AppError::NotFound(format!("order request {request_id} not found")))?;

    if request.status != RequestStatus::Pending {
        return Err(AppError::AlreadyFinalized(request.status.as_str().into()));
    }

    validate_assignment(
        state,
        input.driver_id,
        input.vehicle_id,
        Some(request.vehicle_type),
    )?;

    // Admin-entered fare is authoritative once supplied; otherwise the
    // server-side estimate from submission time is carried over.
    let base_fare = input.base_fare.unwrap_or(request.estimated_fare);
    if base_fare <= 0 {
        return Err(AppError::InvalidInput(
            "base_fare must be positive".to_string(),
        ));
    }

    let now = Utc::now();
    let delivery = Delivery {
        id: Uuid::new_v4(),
        pickup: input.pickup.unwrap_or_else(|| request.pickup.clone()),
        dropoff: input.dropoff.unwrap_or_else(|| request.dropoff.clone()),
        assigned_driver_id: input.driver_id,
        assigned_vehicle_id: input.vehicle_id,
        customer_name: request.customer_name.clone(),
        customer_mobile: request.customer_mobile.clone(),
        pickup_time: request.pickup_time,
        drop_time,
        base_fare,
        status: DeliveryStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        originating_request_id: Some(request.id),
        created_at: now,
        updated_at: now,
    };

    // Point of no return: both writes are infallible, and the entry lock
    // held on the request keeps the pair atomic to other approvers.
    state.deliveries.insert(delivery.id, delivery.clone());
    request.status = RequestStatus::Approved;
    request.delivery_id = Some(delivery.id);

    let request_id = request.id;
    let request_status = request.status;
    drop(request);

    state.metrics.active_deliveries.inc();
    state
        .metrics
        .order_requests_total
        .with_label_values(&["approved"])
        .inc();
    state
        .notifications
        .publish(Event::OrderRequestStatusChanged {
            request_id,
            status: request_status,
            delivery_id: Some(delivery.id),
        });

    info!(
        request_id = %request_id,
        delivery_id = %delivery.id,
        driver_id = %delivery.assigned_driver_id,
        base_fare,
        "order request approved"
    );

    Ok(delivery)
}

pub fn reject(state: &AppState, request_id: Uuid, reason: &str) -> Result<OrderRequest, AppError> {
    if reason.trim().is_empty() {
        return Err(AppError::EmptyReason);
    }

    let mut request = state
        .requests
        .get_mut(&request_id)
        .ok_or_else(|| AppError::NotFound(format!("order request {request_id} not found")))?;

    if request.status != RequestStatus::Pending {
        return Err(AppError::AlreadyFinalized(request.status.as_str().into()));
    }

    request.status = RequestStatus::Rejected;
    request.rejection_reason = Some(reason.trim().to_string());

    let snapshot = request.clone();
    drop(request);

    state
        .metrics
        .order_requests_total
        .with_label_values(&["rejected"])
        .inc();
    state
        .notifications
        .publish(Event::OrderRequestStatusChanged {
            request_id: snapshot.id,
            status: snapshot.status,
            delivery_id: None,
        });

    info!(request_id = %snapshot.id, "order request rejected");

    Ok(snapshot)
}
