//! Create reaction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reaction::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reaction::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Reaction::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Reaction::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Reaction::Reaction).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Reaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // One reaction per (kind, subject, user); doubles as the
                    // uniqueness constraint the toggle race relies on.
                    .primary_key(
                        Index::create()
                            .col(Reaction::Kind)
                            .col(Reaction::SubjectId)
                            .col(Reaction::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (kind, user_id) for per-user reaction lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_reaction_kind_user_id")
                    .table(Reaction::Table)
                    .col(Reaction::Kind)
                    .col(Reaction::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reaction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reaction {
    Table,
    Kind,
    SubjectId,
    UserId,
    Reaction,
    CreatedAt,
}
