//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::{normalize_email, Actor, CreateUserDto, GetUserDto, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::{DomainError, DomainResult, PaginatedResult};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ACCOUNT_DEACTIVATED: &str = "Account is deactivated";

/// Authentication result returned after a successful login or registration
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Account created when the users table is empty
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User service: orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Register a new customer and sign them in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<AuthResult> {
        let user = self
            .create_account(name, email, password, UserRole::Customer)
            .await?;
        info!(user_id = %user.id, email = %user.email, "New customer registered");
        self.issue(user)
    }

    /// Check email + password and return a JWT.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().get_user_by_email(&email).await? else {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(DomainError::unauthorized(ACCOUNT_DEACTIVATED));
        }

        self.repos.users().record_login(&user.id).await?;
        info!(user_id = %user.id, role = %user.role, "User logged in");
        self.issue(user)
    }

    /// Resolve a bearer token to an active user.
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|_| DomainError::unauthorized("Invalid or expired token"))?;

        let Some(user) = self.repos.users().get_user_by_id(&claims.sub).await? else {
            return Err(DomainError::unauthorized("User not found"));
        };

        if !user.is_active {
            return Err(DomainError::unauthorized(ACCOUNT_DEACTIVATED));
        }

        Ok(user)
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user.id, &user.name, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_secs,
            user,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    pub async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.repos
            .users()
            .get_user_by_email(&normalize_email(email))
            .await
    }

    /// Active technicians, for the assignment picker.
    pub async fn list_technicians(&self) -> DomainResult<Vec<User>> {
        self.repos
            .users()
            .list_active_by_role(UserRole::Technician)
            .await
    }

    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(dto).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Admin-created technician or admin account.
    pub async fn create_staff(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> DomainResult<User> {
        let role = role
            .parse::<UserRole>()
            .ok()
            .filter(UserRole::is_staff)
            .ok_or_else(|| DomainError::validation("Invalid role"))?;

        let user = self.create_account(name, email, password, role).await?;
        info!(user_id = %user.id, role = %user.role, "Staff account created");
        Ok(user)
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self.get_user(user_id).await?;

        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::unauthorized("Current password is incorrect"));
        }

        let new_hash = self.hash(new_password)?;
        self.repos.users().update_password(user_id, &new_hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    /// Flip a user's active flag. Admins cannot lock themselves out.
    pub async fn toggle_status(&self, actor: &Actor, user_id: &str) -> DomainResult<User> {
        let user = self.get_user(user_id).await?;

        if user.id == actor.id && user.is_active {
            return Err(DomainError::validation("You cannot deactivate your own account"));
        }

        let updated = self
            .repos
            .users()
            .set_active(user_id, !user.is_active)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        info!(
            user_id,
            actor = %actor.id,
            is_active = updated.is_active,
            "User status toggled"
        );
        Ok(updated)
    }

    /// Create the configured admin when nobody has an account yet.
    pub async fn ensure_default_admin(&self, admin: &DefaultAdmin) -> DomainResult<Option<User>> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(None);
        }

        let user = self
            .create_account(&admin.name, &admin.email, &admin.password, UserRole::Admin)
            .await?;
        warn!(
            email = %user.email,
            "Default admin account created; change its password"
        );
        Ok(Some(user))
    }

    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Name is required"));
        }

        let email = normalize_email(email);
        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("User already exists with this email".into()));
        }

        let password_hash = self.hash(password)?;
        self.repos
            .users()
            .create_user(CreateUserDto {
                name: name.to_string(),
                email,
                password_hash,
                role,
            })
            .await
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }
}
