use super::UserRole;

/// Everything the repository needs to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}
