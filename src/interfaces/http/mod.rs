//! HTTP REST API interfaces
//!
//! - `middleware`: bearer-token and role gates
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;

pub use error::{ApiError, ApiResult};
pub use router::{create_api_router, ApiDependencies};
