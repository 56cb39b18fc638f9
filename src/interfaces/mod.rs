//! Inbound adapters: the REST API and the live-update WebSocket

pub mod http;
pub mod ws;

pub use http::{create_api_router, ApiDependencies};
