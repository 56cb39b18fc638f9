//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod complaint_repository;
pub mod note_repository;
pub mod repository_provider;
pub mod user_repository;

pub use complaint_repository::SeaOrmComplaintRepository;
pub use note_repository::SeaOrmNoteRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;

use crate::shared::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}
