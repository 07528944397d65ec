use serde::Serialize;

use crate::models::vehicle::VehicleType;

/// Per-vehicle-type pricing rule. Amounts are whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tariff {
    pub per_km_rate: i64,
    pub minimum_fare: i64,
}

/// Applied when a fare is requested for a vehicle type name that is not in
/// the fleet's tariff table.
pub const DEFAULT_TARIFF: Tariff = Tariff {
    per_km_rate: 10,
    minimum_fare: 100,
};

pub fn tariff(vehicle_type: VehicleType) -> Tariff {
    match vehicle_type {
        VehicleType::Tata407 => Tariff {
            per_km_rate: 15,
            minimum_fare: 300,
        },
        VehicleType::AshokLeylandEcomet => Tariff {
            per_km_rate: 18,
            minimum_fare: 400,
        },
        VehicleType::MahindraSuproMaxiTruck => Tariff {
            per_km_rate: 12,
            minimum_fare: 250,
        },
        VehicleType::EicherPro3015 => Tariff {
            per_km_rate: 20,
            minimum_fare: 500,
        },
        VehicleType::BharathBenz2523r => Tariff {
            per_km_rate: 25,
            minimum_fare: 600,
        },
    }
}

/// Case-insensitive tariff lookup by wire name, defaulting for unknown types.
pub fn tariff_by_name(raw: &str) -> Tariff {
    VehicleType::parse(raw).map(tariff).unwrap_or(DEFAULT_TARIFF)
}

/// Metered fare rounded up to the next whole unit, floored at the tariff
/// minimum. Zero or negative distance yields the minimum fare.
pub fn estimate_fare(distance_km: f64, tariff: &Tariff) -> i64 {
    if distance_km <= 0.0 {
        return tariff.minimum_fare;
    }

    let metered = (distance_km * tariff.per_km_rate as f64).ceil() as i64;
    metered.max(tariff.minimum_fare)
}
