pub mod complaint;
pub mod events;
pub mod note;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use complaint::{Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus};
pub use note::ComplaintNote;
pub use repositories::RepositoryProvider;
pub use user::{Actor, User, UserRole, UserSummary};

pub use crate::shared::{DomainError, DomainResult};
