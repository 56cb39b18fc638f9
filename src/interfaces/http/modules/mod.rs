pub mod auth;
pub mod complaints;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod users;
