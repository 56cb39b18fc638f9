//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::complaint::ComplaintRepository;
use crate::domain::note::NoteRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;

use super::complaint_repository::SeaOrmComplaintRepository;
use super::note_repository::SeaOrmNoteRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    complaints: SeaOrmComplaintRepository,
    notes: SeaOrmNoteRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            complaints: SeaOrmComplaintRepository::new(db.clone()),
            notes: SeaOrmNoteRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn complaints(&self) -> &dyn ComplaintRepository {
        &self.complaints
    }

    fn notes(&self) -> &dyn NoteRepository {
        &self.notes
    }
}
