use serde::{Deserialize, Serialize};

use crate::error::AppError;

const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// A coordinate paired with the human-readable address it was geocoded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub label: String,
    pub location: Coordinate,
}

/// Great-circle distance in kilometers, rounded to one decimal place.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> Result<f64, AppError> {
    a.validate()?;
    b.validate()?;
    Ok(round_km(haversine_km(a, b)))
}

pub fn round_km(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, distance_km};

    #[test]
    fn zero_distance_for_same_point() {
        let p = Coordinate {
            lat: 17.385044,
            lng: 78.486671,
        };
        assert_eq!(distance_km(&p, &p).unwrap(), 0.0);
    }

    #[test]
    fn london_to_paris_is_around_343_km() {
        let london = Coordinate {
            lat: 51.5074,
            lng: -0.1278,
        };
        let paris = Coordinate {
            lat: 48.8566,
            lng: 2.3522,
        };
        let distance = distance_km(&london, &paris).unwrap();
        assert!((distance - 343.0).abs() < 5.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate {
            lat: 17.385044,
            lng: 78.486671,
        };
        let b = Coordinate {
            lat: 12.971599,
            lng: 77.594566,
        };
        assert_eq!(distance_km(&a, &b).unwrap(), distance_km(&b, &a).unwrap());
    }

    #[test]
    fn distance_is_non_negative() {
        let a = Coordinate {
            lat: -33.9,
            lng: 151.2,
        };
        let b = Coordinate {
            lat: 55.75,
            lng: 37.62,
        };
        assert!(distance_km(&a, &b).unwrap() >= 0.0);
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let bad = Coordinate { lat: 91.0, lng: 0.0 };
        let ok = Coordinate { lat: 0.0, lng: 0.0 };
        assert!(distance_km(&bad, &ok).is_err());
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        let bad = Coordinate {
            lat: 0.0,
            lng: -180.5,
        };
        let ok = Coordinate { lat: 0.0, lng: 0.0 };
        assert!(distance_km(&ok, &bad).is_err());
    }
}
