//! Authentication and role gates for Axum
//!
//! `auth_middleware` turns a bearer token into an [`AuthenticatedUser`] in the
//! request extensions; `require_roles` then checks that user's role against
//! the roles a route permits.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use tracing::debug;

use super::error::ApiError;
use crate::application::identity::UserService;
use crate::domain::user::{Actor, User, UserRole};

pub const CUSTOMERS: &[UserRole] = &[UserRole::Customer];
pub const STAFF: &[UserRole] = &[UserRole::Technician, UserRole::Admin];
pub const ADMINS: &[UserRole] = &[UserRole::Admin];

/// State for the authentication gate
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService>,
}

/// The caller, as loaded from the user directory
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role)
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Bearer-token authentication gate
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return ApiError::unauthorized("Access denied. No token provided.").into_response();
    };

    let Some(token) = extract_token(auth_header) else {
        return ApiError::unauthorized("Invalid authorization header").into_response();
    };

    match auth_state.users.authenticate(token).await {
        Ok(user) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from(user));
            next.run(request).await
        }
        Err(err) => {
            debug!(error = %err, "Authentication rejected");
            ApiError::from(err).into_response()
        }
    }
}

/// Roles permitted on a route
#[derive(Clone, Copy, Debug)]
pub struct RoleGuard {
    pub allowed: &'static [UserRole],
}

impl RoleGuard {
    pub fn new(allowed: &'static [UserRole]) -> Self {
        Self { allowed }
    }
}

/// Pure set-membership check
pub fn authorize(user: &AuthenticatedUser, allowed: &[UserRole]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Access denied. Role '{}' is not authorized for this resource",
            user.role
        )))
    }
}

/// Role authorization gate. Must run after `auth_middleware`.
pub async fn require_roles(
    State(guard): State<RoleGuard>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return ApiError::unauthorized("Not authenticated").into_response();
    };

    if let Err(err) = authorize(user, guard.allowed) {
        debug!(user_id = %user.id, role = %user.role, "Role check failed");
        return err.into_response();
    }

    next.run(request).await
}

/// Wrap a method router in the role gate
pub fn restricted<S>(route: MethodRouter<S>, allowed: &'static [UserRole]) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(
        RoleGuard::new(allowed),
        require_roles,
    ))
}
