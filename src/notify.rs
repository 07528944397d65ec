use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::geo::Coordinate;
use crate::models::delivery::DeliveryStatus;
use crate::models::request::RequestStatus;

/// Workflow-transition events fanned out to live subscribers. Purely a
/// relay; nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    OrderRequestCreated {
        request_id: Uuid,
        status: RequestStatus,
        estimated_fare: i64,
    },
    OrderRequestStatusChanged {
        request_id: Uuid,
        status: RequestStatus,
        delivery_id: Option<Uuid>,
    },
    DeliveryStatusChanged {
        delivery_id: Uuid,
        status: DeliveryStatus,
    },
    LocationUpdate {
        delivery_id: Uuid,
        driver_id: Uuid,
        location: Coordinate,
    },
    DeliveryPaid {
        delivery_id: Uuid,
        amount: i64,
    },
}

impl Event {
    fn delivery_channel(&self) -> Option<Uuid> {
        match self {
            Event::DeliveryStatusChanged { delivery_id, .. }
            | Event::LocationUpdate { delivery_id, .. }
            | Event::DeliveryPaid { delivery_id, .. } => Some(*delivery_id),
            Event::OrderRequestCreated { .. } | Event::OrderRequestStatusChanged { .. } => None,
        }
    }
}

/// Event fan-out with one global channel and a lazily-created channel per
/// delivery. Injected into the workflows rather than living as a module
/// global, so tests and alternative transports can subscribe directly.
pub struct NotificationGateway {
    global: broadcast::Sender<Event>,
    delivery_channels: DashMap<Uuid, broadcast::Sender<Event>>,
    buffer: usize,
}

impl NotificationGateway {
    pub fn new(buffer: usize) -> Self {
        let (global, _unused_rx) = broadcast::channel(buffer);
        Self {
            global,
            delivery_channels: DashMap::new(),
            buffer,
        }
    }

    /// Send failures mean no subscriber is listening right now; the relay
    /// contract makes that a non-event.
    pub fn publish(&self, event: Event) {
        if let Some(delivery_id) = event.delivery_channel() {
            if let Some(tx) = self.delivery_channels.get(&delivery_id) {
                let _ = tx.send(event.clone());
            }
        }
        let _ = self.global.send(event);
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<Event> {
        self.global.subscribe()
    }

    pub fn subscribe_delivery(&self, delivery_id: Uuid) -> broadcast::Receiver<Event> {
        self.delivery_channels
            .entry(delivery_id)
            .or_insert_with(|| broadcast::channel(self.buffer).0)
            .subscribe()
    }
}
