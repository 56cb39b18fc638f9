//! Application layer: use-cases orchestrated over the domain repositories

pub mod complaints;
pub mod events;
pub mod identity;
pub mod seed;

pub use complaints::{AnalyticsService, ComplaintService};
pub use events::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use identity::UserService;
