use super::UserRole;
use crate::shared::PageRequest;

#[derive(Debug, Clone)]
pub struct GetUserDto {
    /// Substring match on name or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub page: PageRequest,
}
