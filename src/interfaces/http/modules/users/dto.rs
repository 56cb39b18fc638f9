//! User management DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::interfaces::http::modules::auth::UserInfo;

/// Admin-created staff account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// technician or admin
    pub role: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Substring of name or email
    pub search: Option<String>,
    /// customer, technician or admin
    pub role: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub message: String,
    pub user: UserInfo,
}
