//! Event bus for broadcasting complaint changes to subscribers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::types::{ComplaintEvent, EventMessage};

const DEFAULT_CAPACITY: usize = 256;

/// Event bus for broadcasting events to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn publish(&self, event: ComplaintEvent) {
        let message = EventMessage::new(event);
        let event_type = message.event.kind.as_str();
        let complaint_id = message.event.complaint_id.clone();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(event_type, %complaint_id, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(event_type, %complaint_id, "Event published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Next message, skipping over any the subscriber lagged behind on.
    /// `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev.saturating_sub(1), "Event subscriber disconnected");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::ComplaintEventKind;
    use chrono::Utc;

    fn event(id: &str) -> ComplaintEvent {
        ComplaintEvent {
            kind: ComplaintEventKind::ComplaintCreated,
            complaint_id: id.into(),
            status: "open".into(),
            customer_id: "cust-1".into(),
            assigned_to: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(event("c-1"));
        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.event.complaint_id, "c-1");
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(event("c-1"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn dropping_a_subscriber_decrements_the_count() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn lagged_subscriber_skips_to_newest() {
        let bus = EventBus::with_capacity(2);
        let mut sub = bus.subscribe();
        for i in 0..5 {
            bus.publish(event(&format!("c-{}", i)));
        }
        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.event.complaint_id, "c-3");
    }
}
