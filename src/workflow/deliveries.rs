use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::fare;
use crate::geo::{Coordinate, Waypoint};
use crate::models::delivery::{Delivery, DeliveryStatus, PaymentStatus};
use crate::notify::Event;
use crate::routing::distance_with_fallback;
use crate::state::AppState;
use crate::workflow::availability::validate_assignment;
use crate::workflow::{parse_timestamp, validate_mobile, validate_non_empty};

#[derive(Debug, Deserialize)]
pub struct CreateDeliveryInput {
    pub pickup: Waypoint,
    pub dropoff: Waypoint,
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup_time: String,
    pub drop_time: Option<String>,
    pub base_fare: Option<i64>,
}

/// Admin path that bypasses the order-request review. Runs the same
/// commit-time assignment checks as `approve`; the fare is computed
/// server-side from the assigned vehicle's tariff unless the admin
/// supplies one, and is fixed from then on.
pub async fn create_direct(
    state: &AppState,
    input: CreateDeliveryInput,
) -> Result<Delivery, AppError> {
    validate_non_empty("customer_name", &input.customer_name)?;
    validate_mobile("customer_mobile", &input.customer_mobile)?;
    let pickup_time = parse_timestamp("pickup_time", &input.pickup_time)?;
    let drop_time = input
        .drop_time
        .as_deref()
        .map(|raw| parse_timestamp("drop_time", raw))
        .transpose()?;

    let vehicle = validate_assignment(state, input.driver_id, input.vehicle_id, None)?;

    let base_fare = match input.base_fare {
        Some(fare) if fare > 0 => fare,
        Some(_) => {
            return Err(AppError::InvalidInput(
                "base_fare must be positive".to_string(),
            ));
        }
        None => {
            let resolved = distance_with_fallback(
                state.route_resolver.as_ref(),
                input.pickup.location,
                input.dropoff.location,
            )
            .await?;
            state.metrics.route_source(resolved.routed);
            fare::estimate_fare(resolved.distance_km, &fare::tariff(vehicle.vehicle_type))
        }
    };

    let now = Utc::now();
    let delivery = Delivery {
        id: Uuid::new_v4(),
        pickup: input.pickup,
        dropoff: input.dropoff,
        assigned_driver_id: input.driver_id,
        assigned_vehicle_id: input.vehicle_id,
        customer_name: input.customer_name,
        customer_mobile: input.customer_mobile.trim().to_string(),
        pickup_time,
        drop_time,
        base_fare,
        status: DeliveryStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        originating_request_id: None,
        created_at: now,
        updated_at: now,
    };

    state.deliveries.insert(delivery.id, delivery.clone());
    state.metrics.active_deliveries.inc();
    state.notifications.publish(Event::DeliveryStatusChanged {
        delivery_id: delivery.id,
        status: delivery.status,
    });

    info!(
        delivery_id = %delivery.id,
        driver_id = %delivery.assigned_driver_id,
        base_fare,
        "delivery created"
    );

    Ok(delivery)
}

/// Forward-only, single-step status change by the assigned driver. The
/// explicit target makes stale-client skips and backward moves visible as
/// `InvalidTransition` instead of silently landing on the wrong state.
pub fn advance_status(
    state: &AppState,
    delivery_id: Uuid,
    driver_id: Uuid,
    target: DeliveryStatus,
) -> Result<Delivery, AppError> {
    let mut delivery = state
        .deliveries
        .get_mut(&delivery_id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {delivery_id} not found")))?;

    if delivery.assigned_driver_id != driver_id {
        return Err(AppError::Forbidden(
            "only the assigned driver can update this delivery".to_string(),
        ));
    }

    let Some(next) = delivery.status.next() else {
        return Err(AppError::AlreadyDelivered);
    };

    if target != next {
        return Err(AppError::InvalidTransition {
            from: delivery.status.as_str(),
            to: target.as_str(),
        });
    }

    delivery.status = target;
    delivery.updated_at = Utc::now();

    let snapshot = delivery.clone();
    drop(delivery);

    if target == DeliveryStatus::Delivered {
        state.metrics.active_deliveries.dec();
    }
    state
        .metrics
        .delivery_transitions_total
        .with_label_values(&[target.as_str()])
        .inc();
    state.notifications.publish(Event::DeliveryStatusChanged {
        delivery_id: snapshot.id,
        status: snapshot.status,
    });

    info!(
        delivery_id = %snapshot.id,
        status = target.as_str(),
        "delivery status advanced"
    );

    Ok(snapshot)
}

/// Live relay only: the coordinate goes out to the delivery's channel and
/// is never stored as history.
pub fn record_location(
    state: &AppState,
    delivery_id: Uuid,
    driver_id: Uuid,
    location: Coordinate,
) -> Result<(), AppError> {
    location.validate()?;

    let delivery = state
        .deliveries
        .get(&delivery_id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {delivery_id} not found")))?;

    if delivery.assigned_driver_id != driver_id {
        return Err(AppError::Forbidden(
            "only the assigned driver can report location".to_string(),
        ));
    }

    if delivery.status == DeliveryStatus::Delivered {
        return Err(AppError::AlreadyDelivered);
    }
    drop(delivery);

    state.metrics.location_updates_total.inc();
    state.notifications.publish(Event::LocationUpdate {
        delivery_id,
        driver_id,
        location,
    });

    debug!(delivery_id = %delivery_id, "location update relayed");
    Ok(())
}

pub fn mark_paid(state: &AppState, delivery_id: Uuid) -> Result<Delivery, AppError> {
    let mut delivery = state
        .deliveries
        .get_mut(&delivery_id)
        .ok_or_else(|| AppError::NotFound(format!("delivery {delivery_id} not found")))?;

    if delivery.payment_status == PaymentStatus::Paid {
        return Err(AppError::Conflict("delivery already paid".to_string()));
    }

    delivery.payment_status = PaymentStatus::Paid;
    delivery.updated_at = Utc::now();

    let snapshot = delivery.clone();
    drop(delivery);

    state.notifications.publish(Event::DeliveryPaid {
        delivery_id: snapshot.id,
        amount: snapshot.base_fare,
    });

    info!(delivery_id = %snapshot.id, amount = snapshot.base_fare, "delivery paid");
    Ok(snapshot)
}
