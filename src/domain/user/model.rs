use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::DomainError;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    #[default]
    Customer,
    Technician,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Technician => "technician",
            UserRole::Admin => "admin",
        }
    }

    /// Roles an administrator may hand out when creating staff accounts
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Technician | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(UserRole::Customer),
            "technician" => Ok(UserRole::Technician),
            "admin" => Ok(UserRole::Admin),
            other => Err(DomainError::Validation(format!("Invalid role '{}'", other))),
        }
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id.clone(),
            role: self.role,
        }
    }
}

/// The public face of a user, joined into complaint and note listings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Whoever is performing an operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Lowercase and trim an email so lookups and uniqueness are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
