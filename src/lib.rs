//! # Complaint Desk
//!
//! Role-based complaint tracking service: customers file complaints,
//! technicians work the ones assigned to them, admins triage, manage staff
//! and watch the numbers.
//!
//! ## Architecture
//!
//! - **domain**: entities, enums, invariants and repository traits
//! - **application**: use-cases (identity, complaints, analytics, events)
//! - **infrastructure**: SeaORM persistence, JWT and bcrypt
//! - **interfaces**: REST API (axum) and the live-update WebSocket
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::{create_api_router, ApiDependencies};
