use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::{Availability, Driver};
use crate::models::vehicle::{Vehicle, VehicleType};
use crate::state::AppState;

/// Sets a driver's own availability. Caller identity (that the toggle comes
/// from the driver themself) is enforced by the HTTP layer upstream.
pub fn set_availability(
    state: &AppState,
    driver_id: Uuid,
    availability: Availability,
) -> Result<Driver, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

    driver.availability = availability;
    driver.updated_at = Utc::now();

    info!(driver_id = %driver_id, availability = ?availability, "driver availability changed");
    Ok(driver.clone())
}

pub fn is_available(state: &AppState, driver_id: Uuid) -> bool {
    state
        .drivers
        .get(&driver_id)
        .map(|driver| driver.availability == Availability::Available)
        .unwrap_or(false)
}

/// Drivers currently open for assignment. The vehicle-type filter is a
/// presentation convenience; an admin may still force-assign a driver whose
/// declared types differ.
pub fn assignable_drivers(state: &AppState, vehicle_type: Option<VehicleType>) -> Vec<Driver> {
    state
        .drivers
        .iter()
        .filter(|entry| entry.availability == Availability::Available)
        .filter(|entry| {
            vehicle_type
                .map(|vt| entry.vehicle_types.contains(&vt))
                .unwrap_or(true)
        })
        .map(|entry| entry.value().clone())
        .collect()
}

/// Active vehicles of exactly the requested type, for the admin review
/// screen. Unlike drivers, vehicle records are filtered strictly.
pub fn matching_vehicles(state: &AppState, vehicle_type: VehicleType) -> Vec<Vehicle> {
    state
        .vehicles
        .iter()
        .filter(|entry| entry.active && entry.vehicle_type == vehicle_type)
        .map(|entry| entry.value().clone())
        .collect()
}

/// Commit-time assignment check. Availability may have flipped between the
/// admin opening the review screen and submitting, so this runs inside
/// every approve/create, never trusting a stale read.
pub fn validate_assignment(
    state: &AppState,
    driver_id: Uuid,
    vehicle_id: Uuid,
    expected_type: Option<VehicleType>,
) -> Result<Vehicle, AppError> {
    if !state.drivers.contains_key(&driver_id) {
        return Err(AppError::NotFound(format!("driver {driver_id} not found")));
    }
    if !is_available(state, driver_id) {
        return Err(AppError::DriverUnavailable);
    }

    let vehicle = state
        .vehicles
        .get(&vehicle_id)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {vehicle_id} not found")))?;

    if !vehicle.active {
        return Err(AppError::VehicleTypeMismatch(format!(
            "vehicle {} is not active",
            vehicle.number_plate
        )));
    }

    if let Some(expected) = expected_type {
        if vehicle.vehicle_type != expected {
            return Err(AppError::VehicleTypeMismatch(format!(
                "vehicle {} is a {}, request needs a {}",
                vehicle.number_plate,
                vehicle.vehicle_type.as_str(),
                expected.as_str()
            )));
        }
    }

    Ok(vehicle.clone())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use super::{assignable_drivers, is_available, set_availability, validate_assignment};
    use crate::error::AppError;
    use crate::models::driver::{Availability, Driver};
    use crate::models::vehicle::{Vehicle, VehicleType};
    use crate::routing::RoutingDisabled;
    use crate::state::AppState;

    fn state() -> AppState {
        AppState::new(16, Arc::new(RoutingDisabled))
    }

    fn add_driver(state: &AppState, availability: Availability, types: Vec<VehicleType>) -> Uuid {
        let id = Uuid::new_v4();
        state.drivers.insert(
            id,
            Driver {
                id,
                name: "Ravi".to_string(),
                mobile: "9876543210".to_string(),
                vehicle_types: types,
                availability,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        id
    }

    fn add_vehicle(state: &AppState, vehicle_type: VehicleType, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        state.vehicles.insert(
            id,
            Vehicle {
                id,
                number_plate: "TS09AB1234".to_string(),
                vehicle_type,
                capacity_kg: 2500,
                active,
                created_at: Utc::now(),
            },
        );
        id
    }

    #[test]
    fn toggle_is_read_back_by_is_available() {
        let state = state();
        let id = add_driver(&state, Availability::Available, vec![]);
        assert!(is_available(&state, id));

        set_availability(&state, id, Availability::Unavailable).unwrap();
        assert!(!is_available(&state, id));

        set_availability(&state, id, Availability::Available).unwrap();
        assert!(is_available(&state, id));
    }

    #[test]
    fn unknown_driver_is_never_available() {
        let state = state();
        assert!(!is_available(&state, Uuid::new_v4()));
    }

    #[test]
    fn assignable_drivers_excludes_unavailable() {
        let state = state();
        let free = add_driver(&state, Availability::Available, vec![VehicleType::Tata407]);
        add_driver(&state, Availability::Unavailable, vec![VehicleType::Tata407]);

        let drivers = assignable_drivers(&state, None);
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].id, free);
    }

    #[test]
    fn assignable_drivers_can_filter_by_declared_type() {
        let state = state();
        add_driver(&state, Availability::Available, vec![VehicleType::Tata407]);
        let benz = add_driver(
            &state,
            Availability::Available,
            vec![VehicleType::BharathBenz2523r],
        );

        let drivers = assignable_drivers(&state, Some(VehicleType::BharathBenz2523r));
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].id, benz);
    }

    #[test]
    fn validate_assignment_rejects_unavailable_driver() {
        let state = state();
        let driver = add_driver(&state, Availability::Unavailable, vec![]);
        let vehicle = add_vehicle(&state, VehicleType::Tata407, true);

        let err = validate_assignment(&state, driver, vehicle, None).unwrap_err();
        assert!(matches!(err, AppError::DriverUnavailable));
    }

    #[test]
    fn validate_assignment_rejects_inactive_vehicle() {
        let state = state();
        let driver = add_driver(&state, Availability::Available, vec![]);
        let vehicle = add_vehicle(&state, VehicleType::Tata407, false);

        let err = validate_assignment(&state, driver, vehicle, None).unwrap_err();
        assert!(matches!(err, AppError::VehicleTypeMismatch(_)));
    }

    #[test]
    fn validate_assignment_rejects_wrong_vehicle_type() {
        let state = state();
        let driver = add_driver(&state, Availability::Available, vec![]);
        let vehicle = add_vehicle(&state, VehicleType::Tata407, true);

        let err =
            validate_assignment(&state, driver, vehicle, Some(VehicleType::EicherPro3015))
                .unwrap_err();
        assert!(matches!(err, AppError::VehicleTypeMismatch(_)));
    }
}
