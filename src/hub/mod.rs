//! # Broadcast Hub
//!
//! Fans serialized telemetry events out to every connected subscriber and
//! records connection lifecycle in the flight log.
//!
//! Delivery is fire-and-forget over a [`tokio::sync::broadcast`] channel:
//! a subscriber joining late sees only what is published after it joined,
//! and one subscriber stalling or dropping never affects the others.

pub mod events;
pub mod server;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio::sync::RwLock;
use tracing::info;

use crate::flightlog::FlightLog;

/// Bookkeeping kept per connected subscriber
#[derive(Debug, Clone)]
struct SubscriberInfo {
    peer: SocketAddr,
    connected_at: Instant,
}

/// A registered subscriber's receiving end
pub struct Subscription {
    /// Hub-assigned subscriber id, unique for the process lifetime
    pub id: u64,

    /// Serialized events published after registration
    pub events: broadcast::Receiver<Arc<str>>,
}

/// Shared fan-out point between the pipeline and subscriber sessions
pub struct BroadcastHub {
    events: broadcast::Sender<Arc<str>>,
    subscribers: RwLock<HashMap<u64, SubscriberInfo>>,
    next_id: AtomicU64,
    log: FlightLog,
}

impl BroadcastHub {
    /// Create a hub whose per-subscriber queues hold `capacity` events
    pub fn new(log: FlightLog, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);

        Self {
            events,
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            log,
        }
    }

    /// Register a subscriber and hand it the receiving end
    pub async fn register(&self, peer: SocketAddr) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let events = self.events.subscribe();

        let online = {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(
                id,
                SubscriberInfo {
                    peer,
                    connected_at: Instant::now(),
                },
            );
            subscribers.len()
        };

        info!("Client {} connected from {} ({} online)", id, peer, online);
        self.log.append_event("Client connected");

        Subscription { id, events }
    }

    /// Remove a subscriber; repeated calls for the same id are no-ops
    pub async fn unregister(&self, id: u64) {
        let removed = self.subscribers.write().await.remove(&id);

        if let Some(info) = removed {
            info!(
                "Client {} from {} disconnected after {:?}",
                id,
                info.peer,
                info.connected_at.elapsed()
            );
            self.log.append_event("Client has Disconnected");
        }
    }

    /// Publish one serialized event to all current subscribers
    ///
    /// Returns how many subscribers the event was queued for; zero when
    /// nobody is listening.
    pub fn publish(&self, frame: Arc<str>) -> usize {
        self.events.send(frame).unwrap_or(0)
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}
