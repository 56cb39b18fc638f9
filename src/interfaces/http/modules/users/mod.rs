//! Users module: staff accounts and account status (admin)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
