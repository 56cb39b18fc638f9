//! Domain events

pub mod types;

pub use types::{ComplaintEvent, ComplaintEventKind, EventMessage};
