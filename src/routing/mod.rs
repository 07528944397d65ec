use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::error::AppError;
use crate::geo::{self, Coordinate};

/// Internal signal only: callers absorb it by falling back to straight-line
/// distance. It must never surface to the end caller as a failure.
#[derive(Debug, Error)]
#[error("routing service unavailable")]
pub struct RouteUnavailable;

/// A driving route as reported by the routing service, normalized to
/// kilometers and minutes.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub polyline: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_min: f64,
}

#[async_trait]
pub trait RouteResolver: Send + Sync {
    async fn resolve(
        &self,
        pickup: Coordinate,
        dropoff: Coordinate,
    ) -> Result<RouteSummary, RouteUnavailable>;
}

/// Distance between two points, routed when the service answers and
/// straight-line otherwise. Never fails once the coordinates are valid.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedDistance {
    pub distance_km: f64,
    pub routed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteSummary>,
}

pub async fn distance_with_fallback(
    resolver: &dyn RouteResolver,
    pickup: Coordinate,
    dropoff: Coordinate,
) -> Result<ResolvedDistance, AppError> {
    pickup.validate()?;
    dropoff.validate()?;

    match resolver.resolve(pickup, dropoff).await {
        Ok(route) => Ok(ResolvedDistance {
            distance_km: geo::round_km(route.distance_km),
            routed: true,
            route: Some(route),
        }),
        Err(RouteUnavailable) => Ok(ResolvedDistance {
            distance_km: geo::distance_km(&pickup, &dropoff)?,
            routed: false,
            route: None,
        }),
    }
}

/// OSRM-compatible HTTP resolver. The response is treated as untyped JSON;
/// anything that does not look like a successful route is `RouteUnavailable`.
pub struct OsrmResolver {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmResolver {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Internal(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RouteResolver for OsrmResolver {
    async fn resolve(
        &self,
        pickup: Coordinate,
        dropoff: Coordinate,
    ) -> Result<RouteSummary, RouteUnavailable> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, pickup.lng, pickup.lat, dropoff.lng, dropoff.lat
        );

        let response = self.client.get(&url).send().await.map_err(|err| {
            warn!(error = %err, "routing service request failed");
            RouteUnavailable
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "routing service returned non-ok status");
            return Err(RouteUnavailable);
        }

        let body: Value = response.json().await.map_err(|err| {
            warn!(error = %err, "routing service returned invalid json");
            RouteUnavailable
        })?;

        parse_osrm_route(&body).ok_or_else(|| {
            warn!("routing service response had no usable route");
            RouteUnavailable
        })
    }
}

fn parse_osrm_route(body: &Value) -> Option<RouteSummary> {
    let route = body.get("routes")?.get(0)?;
    let distance_m = route.get("distance")?.as_f64()?;
    let duration_s = route.get("duration")?.as_f64()?;

    let polyline = route
        .get("geometry")?
        .get("coordinates")?
        .as_array()?
        .iter()
        .filter_map(|pair| {
            Some(Coordinate {
                lng: pair.get(0)?.as_f64()?,
                lat: pair.get(1)?.as_f64()?,
            })
        })
        .collect();

    Some(RouteSummary {
        polyline,
        distance_km: distance_m / 1000.0,
        duration_min: duration_s / 60.0,
    })
}

/// Resolver used when no routing service is configured; every lookup falls
/// back to straight-line distance.
pub struct RoutingDisabled;

#[async_trait]
impl RouteResolver for RoutingDisabled {
    async fn resolve(
        &self,
        _pickup: Coordinate,
        _dropoff: Coordinate,
    ) -> Result<RouteSummary, RouteUnavailable> {
        Err(RouteUnavailable)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        RoutingDisabled, distance_with_fallback, parse_osrm_route, testing::FixedRoute,
    };
    use crate::geo::Coordinate;

    fn hyderabad() -> Coordinate {
        Coordinate {
            lat: 17.385044,
            lng: 78.486671,
        }
    }

    fn bangalore() -> Coordinate {
        Coordinate {
            lat: 12.971599,
            lng: 77.594566,
        }
    }

    #[tokio::test]
    async fn routed_distance_is_used_when_service_answers() {
        let resolver = FixedRoute {
            distance_km: 612.34,
            duration_min: 540.0,
        };

        let resolved = distance_with_fallback(&resolver, hyderabad(), bangalore())
            .await
            .unwrap();

        assert!(resolved.routed);
        assert_eq!(resolved.distance_km, 612.3);
        assert!(resolved.route.is_some());
    }

    #[tokio::test]
    async fn fallback_uses_straight_line_distance() {
        let resolved = distance_with_fallback(&RoutingDisabled, hyderabad(), bangalore())
            .await
            .unwrap();

        assert!(!resolved.routed);
        assert!(resolved.route.is_none());
        let straight = crate::geo::distance_km(&hyderabad(), &bangalore()).unwrap();
        assert_eq!(resolved.distance_km, straight);
    }

    #[tokio::test]
    async fn invalid_coordinates_are_rejected_before_any_lookup() {
        let bad = Coordinate {
            lat: 95.0,
            lng: 0.0,
        };
        let result = distance_with_fallback(&RoutingDisabled, bad, bangalore()).await;
        assert!(result.is_err());
    }

    #[test]
    fn osrm_response_is_normalized_to_km_and_minutes() {
        let body = json!({
            "code": "Ok",
            "routes": [{
                "distance": 14250.0,
                "duration": 1320.0,
                "geometry": {
                    "coordinates": [[78.486671, 17.385044], [78.5, 17.4]]
                }
            }]
        });

        let route = parse_osrm_route(&body).unwrap();
        assert_eq!(route.distance_km, 14.25);
        assert_eq!(route.duration_min, 22.0);
        assert_eq!(route.polyline.len(), 2);
        assert_eq!(route.polyline[0].lat, 17.385044);
    }

    #[test]
    fn malformed_osrm_response_yields_no_route() {
        assert!(parse_osrm_route(&json!({"code": "Ok", "routes": []})).is_none());
        assert!(parse_osrm_route(&json!({"message": "no segment"})).is_none());
    }
}
