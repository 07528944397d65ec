use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::delivery::Delivery;
use crate::models::driver::Driver;
use crate::models::request::OrderRequest;
use crate::models::vehicle::Vehicle;
use crate::notify::NotificationGateway;
use crate::observability::metrics::Metrics;
use crate::routing::RouteResolver;

/// Shared in-memory state. Request and delivery status are only ever
/// mutated through the workflow functions, which hold the entry lock for
/// the whole check-and-set.
pub struct AppState {
    pub drivers: DashMap<Uuid, Driver>,
    pub vehicles: DashMap<Uuid, Vehicle>,
    pub requests: DashMap<Uuid, OrderRequest>,
    pub deliveries: DashMap<Uuid, Delivery>,
    pub notifications: NotificationGateway,
    pub route_resolver: Arc<dyn RouteResolver>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, route_resolver: Arc<dyn RouteResolver>) -> Self {
        Self {
            drivers: DashMap::new(),
            vehicles: DashMap::new(),
            requests: DashMap::new(),
            deliveries: DashMap::new(),
            notifications: NotificationGateway::new(event_buffer_size),
            route_resolver,
            metrics: Metrics::new(),
        }
    }
}
