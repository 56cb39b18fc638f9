//! User management API handlers
//!
//! Admin-only endpoints. Delegates to `UserService` from the
//! application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, ListUsersParams, ToggleStatusResponse};
use crate::application::identity::UserService;
use crate::domain::user::{GetUserDto, UserRole};
use crate::interfaces::http::common::{
    filter_value, ApiQuery, ApiResponse, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::UserInfo;
use crate::shared::PageRequest;

const DEFAULT_USER_PAGE_SIZE: u32 = 20;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/users/create",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Staff account created", body = ApiResponse<UserInfo>),
        (status = 400, description = "Invalid role, validation error or duplicate email"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .users
        .create_staff(&request.name, &request.email, &request.password, &request.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserInfo::from(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/technicians",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active technicians", body = ApiResponse<Vec<UserInfo>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_technicians(
    State(state): State<UserHandlerState>,
) -> ApiResult<Json<ApiResponse<Vec<UserInfo>>>> {
    let technicians = state.users.list_technicians().await?;
    Ok(Json(ApiResponse::success(
        technicians.into_iter().map(UserInfo::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<PaginatedResponse<UserInfo>>),
        (status = 400, description = "Unknown role filter"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    ApiQuery(params): ApiQuery<ListUsersParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<UserInfo>>>> {
    let role = filter_value(&params.role)
        .map(str::parse::<UserRole>)
        .transpose()?;

    let dto = GetUserDto {
        search: filter_value(&params.search).map(String::from),
        role,
        page: PageRequest::new(params.page, params.limit, DEFAULT_USER_PAGE_SIZE),
    };

    let result = state.users.list_users(dto).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        UserInfo::from,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/toggle-status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<ToggleStatusResponse>),
        (status = 400, description = "Cannot deactivate own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle_user_status(
    State(state): State<UserHandlerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ToggleStatusResponse>>> {
    let updated = state.users.toggle_status(&user.actor(), &id).await?;

    let message = if updated.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };

    Ok(Json(ApiResponse::success(ToggleStatusResponse {
        message: message.to_string(),
        user: UserInfo::from(updated),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::domain::user::UserRole;
    use crate::test_support::TestApp;

    #[tokio::test]
    async fn admin_creates_staff_accounts() {
        let app = TestApp::new().await;
        let (_, admin) = app.user("Root", UserRole::Admin).await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/users/create",
                Some(&admin),
                Some(json!({
                    "name": "Tess",
                    "email": "tess@example.com",
                    "password": "secret1",
                    "role": "technician"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["role"], "technician");

        let (status, body) = app
            .request(Method::GET, "/api/users/technicians", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn customer_role_cannot_be_created_by_admin() {
        let app = TestApp::new().await;
        let (_, admin) = app.user("Root", UserRole::Admin).await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/users/create",
                Some(&admin),
                Some(json!({
                    "name": "Carl",
                    "email": "carl@example.com",
                    "password": "secret1",
                    "role": "customer"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid role");
    }

    #[tokio::test]
    async fn user_routes_are_admin_only() {
        let app = TestApp::new().await;
        let (_, tech) = app.user("Tess", UserRole::Technician).await;

        let (status, body) = app
            .request(Method::GET, "/api/users/technicians", Some(&tech), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["error"],
            "Access denied. Role 'technician' is not authorized for this resource"
        );
    }

    #[tokio::test]
    async fn list_users_filters_by_role() {
        let app = TestApp::new().await;
        let (_, admin) = app.user("Root", UserRole::Admin).await;
        app.user("Alice", UserRole::Customer).await;
        app.user("Bob", UserRole::Customer).await;

        let (status, body) = app
            .request(Method::GET, "/api/users?role=customer", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);

        let (status, _) = app
            .request(Method::GET, "/api/users?role=manager", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn toggle_status_flips_and_reports() {
        let app = TestApp::new().await;
        let (admin_user, admin) = app.user("Root", UserRole::Admin).await;
        let (alice, alice_token) = app.user("Alice", UserRole::Customer).await;

        let uri = format!("/api/users/{}/toggle-status", alice.id);
        let (status, body) = app.request(Method::PUT, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "User deactivated successfully");
        assert_eq!(body["data"]["user"]["is_active"], false);

        // Deactivated users lose access immediately
        let (status, _) = app
            .request(Method::GET, "/api/auth/me", Some(&alice_token), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, body) = app.request(Method::PUT, &uri, Some(&admin), None).await;
        assert_eq!(body["data"]["message"], "User activated successfully");

        let own = format!("/api/users/{}/toggle-status", admin_user.id);
        let (status, _) = app.request(Method::PUT, &own, Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .request(Method::PUT, "/api/users/missing/toggle-status", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
