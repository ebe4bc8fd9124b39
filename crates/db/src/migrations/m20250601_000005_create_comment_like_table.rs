//! Create comment like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommentLike::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CommentLike::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(CommentLike::CommentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommentLike::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CommentLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // One like per (kind, comment, user)
                    .primary_key(
                        Index::create()
                            .col(CommentLike::Kind)
                            .col(CommentLike::CommentId)
                            .col(CommentLike::UserId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentLike::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CommentLike {
    Table,
    Kind,
    CommentId,
    UserId,
    CreatedAt,
}
