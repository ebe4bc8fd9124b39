//! Create saved item table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SavedItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedItem::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(SavedItem::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SavedItem::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(SavedItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // One saved row per (kind, subject, user)
                    .primary_key(
                        Index::create()
                            .col(SavedItem::Kind)
                            .col(SavedItem::SubjectId)
                            .col(SavedItem::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (kind, user_id) for "my saved" listings
        manager
            .create_index(
                Index::create()
                    .name("idx_saved_item_kind_user_id")
                    .table(SavedItem::Table)
                    .col(SavedItem::Kind)
                    .col(SavedItem::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SavedItem {
    Table,
    Kind,
    SubjectId,
    UserId,
    CreatedAt,
}
