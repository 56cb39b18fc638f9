//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: registration, login, token checks, staff accounts.

pub mod service;

pub use service::{AuthResult, DefaultAdmin, UserService, ACCOUNT_DEACTIVATED, INVALID_CREDENTIALS};
