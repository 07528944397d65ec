use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub order_requests_total: IntCounterVec,
    pub delivery_transitions_total: IntCounterVec,
    pub route_resolutions_total: IntCounterVec,
    pub location_updates_total: IntCounter,
    pub active_deliveries: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let order_requests_total = IntCounterVec::new(
            Opts::new(
                "order_requests_total",
                "Order request transitions by outcome",
            ),
            &["outcome"],
        )
        .expect("valid order_requests_total metric");

        let delivery_transitions_total = IntCounterVec::new(
            Opts::new(
                "delivery_transitions_total",
                "Delivery status transitions by resulting status",
            ),
            &["status"],
        )
        .expect("valid delivery_transitions_total metric");

        let route_resolutions_total = IntCounterVec::new(
            Opts::new(
                "route_resolutions_total",
                "Route lookups by source (routed vs straight-line fallback)",
            ),
            &["source"],
        )
        .expect("valid route_resolutions_total metric");

        let location_updates_total = IntCounter::new(
            "location_updates_total",
            "Live location updates relayed to subscribers",
        )
        .expect("valid location_updates_total metric");

        let active_deliveries = IntGauge::new(
            "active_deliveries",
            "Deliveries not yet in the Delivered state",
        )
        .expect("valid active_deliveries metric");

        registry
            .register(Box::new(order_requests_total.clone()))
            .expect("register order_requests_total");
        registry
            .register(Box::new(delivery_transitions_total.clone()))
            .expect("register delivery_transitions_total");
        registry
            .register(Box::new(route_resolutions_total.clone()))
            .expect("register route_resolutions_total");
        registry
            .register(Box::new(location_updates_total.clone()))
            .expect("register location_updates_total");
        registry
            .register(Box::new(active_deliveries.clone()))
            .expect("register active_deliveries");

        Self {
            registry,
            order_requests_total,
            delivery_transitions_total,
            route_resolutions_total,
            location_updates_total,
            active_deliveries,
        }
    }

    pub fn route_source(&self, routed: bool) {
        let source = if routed { "routed" } else { "fallback" };
        self.route_resolutions_total
            .with_label_values(&[source])
            .inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
