//! Create complaint_notes table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_complaints::Complaints;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComplaintNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintNotes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintNotes::ComplaintId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ComplaintNotes::AuthorId).string().not_null())
                    .col(ColumnDef::new(ComplaintNotes::Content).text().not_null())
                    .col(
                        ColumnDef::new(ComplaintNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_notes_complaint")
                            .from(ComplaintNotes::Table, ComplaintNotes::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_notes_author")
                            .from(ComplaintNotes::Table, ComplaintNotes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_notes_complaint")
                    .table(ComplaintNotes::Table)
                    .col(ComplaintNotes::ComplaintId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComplaintNotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ComplaintNotes {
    Table,
    Id,
    ComplaintId,
    AuthorId,
    Content,
    CreatedAt,
}
