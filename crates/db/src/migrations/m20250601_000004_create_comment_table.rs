//! Create comment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comment::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Comment::CommentId).big_integer().not_null())
                    .col(ColumnDef::new(Comment::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Comment::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Comment::Body).text().not_null())
                    .col(ColumnDef::new(Comment::ParentCommentId).big_integer())
                    .col(
                        ColumnDef::new(Comment::Depth)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comment::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Comment::Kind)
                            .col(Comment::CommentId),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (kind, subject_id) for listing a subject's comments
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_kind_subject_id")
                    .table(Comment::Table)
                    .col(Comment::Kind)
                    .col(Comment::SubjectId)
                    .to_owned(),
            )
            .await?;

        // Index: (kind, parent_comment_id) for reply lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_kind_parent_id")
                    .table(Comment::Table)
                    .col(Comment::Kind)
                    .col(Comment::ParentCommentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    Kind,
    CommentId,
    SubjectId,
    UserId,
    Body,
    ParentCommentId,
    Depth,
    LikeCount,
    CreatedAt,
}
