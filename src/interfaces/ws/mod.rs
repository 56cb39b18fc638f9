//! WebSocket interfaces
//!
//! - `notifications`: live complaint updates for UI clients

pub mod notifications;

pub use notifications::{ws_notifications_handler, NotificationState};
