use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fleet's closed set of truck models. Each maps to exactly one tariff
/// (see `fare::tariff`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "tata-407")]
    Tata407,
    #[serde(rename = "ashok-leyland-ecomet")]
    AshokLeylandEcomet,
    #[serde(rename = "mahindra-supro-maxi-truck")]
    MahindraSuproMaxiTruck,
    #[serde(rename = "eicher-pro-3015")]
    EicherPro3015,
    #[serde(rename = "bharath-benz-2523r")]
    BharathBenz2523r,
}

impl VehicleType {
    /// Case-insensitive lookup by wire name. Unknown names return `None`;
    /// fare estimation then falls back to the default tariff.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "tata-407" => Some(VehicleType::Tata407),
            "ashok-leyland-ecomet" => Some(VehicleType::AshokLeylandEcomet),
            "mahindra-supro-maxi-truck" => Some(VehicleType::MahindraSuproMaxiTruck),
            "eicher-pro-3015" => Some(VehicleType::EicherPro3015),
            "bharath-benz-2523r" => Some(VehicleType::BharathBenz2523r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Tata407 => "tata-407",
            VehicleType::AshokLeylandEcomet => "ashok-leyland-ecomet",
            VehicleType::MahindraSuproMaxiTruck => "mahindra-supro-maxi-truck",
            VehicleType::EicherPro3015 => "eicher-pro-3015",
            VehicleType::BharathBenz2523r => "bharath-benz-2523r",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub number_plate: String,
    pub vehicle_type: VehicleType,
    pub capacity_kg: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
