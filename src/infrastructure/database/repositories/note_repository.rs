use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::db_err;
use crate::domain::note::{ComplaintNote, NoteRepository};
use crate::infrastructure::database::entities::complaint_note;
use crate::shared::DomainResult;

pub struct SeaOrmNoteRepository {
    db: DatabaseConnection,
}

impl SeaOrmNoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(model: complaint_note::Model) -> ComplaintNote {
    ComplaintNote {
        id: model.id,
        complaint_id: model.complaint_id,
        author_id: model.author_id,
        content: model.content,
        created_at: model.created_at,
    }
}

#[async_trait]
impl NoteRepository for SeaOrmNoteRepository {
    async fn save(&self, note: ComplaintNote) -> DomainResult<()> {
        let active = complaint_note::ActiveModel {
            id: Set(note.id),
            complaint_id: Set(note.complaint_id),
            author_id: Set(note.author_id),
            content: Set(note.content),
            created_at: Set(note.created_at),
        };
        complaint_note::Entity::insert(active)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_complaint(&self, complaint_id: &str) -> DomainResult<Vec<ComplaintNote>> {
        let models = complaint_note::Entity::find()
            .filter(complaint_note::Column::ComplaintId.eq(complaint_id))
            .order_by_asc(complaint_note::Column::CreatedAt)
            .order_by_asc(complaint_note::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
