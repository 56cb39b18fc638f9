//! Create complaints table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaints::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complaints::Title).string().not_null())
                    .col(ColumnDef::new(Complaints::Description).text().not_null())
                    .col(
                        ColumnDef::new(Complaints::Category)
                            .string_len(20)
                            .not_null()
                            .default("general"),
                    )
                    .col(
                        ColumnDef::new(Complaints::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Complaints::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Complaints::CustomerId).string().not_null())
                    .col(ColumnDef::new(Complaints::AssignedTo).string())
                    .col(ColumnDef::new(Complaints::Remarks).text())
                    .col(
                        ColumnDef::new(Complaints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Complaints::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Complaints::ResolvedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_customer")
                            .from(Complaints::Table, Complaints::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_technician")
                            .from(Complaints::Table, Complaints::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_complaints_customer", Complaints::CustomerId),
            ("idx_complaints_assigned_to", Complaints::AssignedTo),
            ("idx_complaints_status", Complaints::Status),
            ("idx_complaints_created_at", Complaints::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Complaints::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Complaints {
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    Status,
    CustomerId,
    AssignedTo,
    Remarks,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
}
