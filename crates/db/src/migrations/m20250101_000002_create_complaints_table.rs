//! Create complaints table migration.

use sea_orm_migration::prelude::*;

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
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Complaints::Name)
                            .string_len(256)
                            .not_null()
                            .default("Anonymous"),
                    )
                    .col(ColumnDef::new(Complaints::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Complaints::Department).string_len(128).not_null())
                    .col(ColumnDef::new(Complaints::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Complaints::Description).text().not_null())
                    .col(
                        ColumnDef::new(Complaints::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Complaints::HasAttachment)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Complaints::UserId).string_len(32))
                    .col(
                        ColumnDef::new(Complaints::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Complaints::AdminResponse).text())
                    .col(
                        ColumnDef::new(Complaints::Date)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Complaints::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: user_id (history lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_user_id")
                    .table(Complaints::Table)
                    .col(Complaints::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: date (listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_date")
                    .table(Complaints::Table)
                    .col(Complaints::Date)
                    .to_owned(),
            )
            .await?;

        // Index: status (stats and dashboard filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_status")
                    .table(Complaints::Table)
                    .col(Complaints::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Complaints {
    Table,
    Id,
    Name,
    Role,
    Department,
    Category,
    Description,
    IsAnonymous,
    HasAttachment,
    UserId,
    Status,
    AdminResponse,
    Date,
    UpdatedAt,
}
