//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UserInfo};
use crate::application::identity::UserService;
use crate::interfaces::http::common::{ApiResponse, MessageData, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Customer account created", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Validation error or email already registered")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let auth = state
        .users
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse::from(auth))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials or deactivated account")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let auth = state.users.login(&request.email, &request.password).await?;
    Ok(Json(ApiResponse::success(AuthResponse::from(auth))))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<UserInfo>>> {
    let user = state.users.get_user(&user.id).await?;
    Ok(Json(ApiResponse::success(UserInfo::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageData>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Current password is incorrect")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageData>>> {
    state
        .users
        .change_password(&user.id, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(ApiResponse::success(MessageData::new(
        "Password changed successfully",
    ))))
}
