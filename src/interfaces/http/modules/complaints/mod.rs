//! Complaints module: filing, listings, triage, status, notes, analytics

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
