//! Create subject table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subject::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Subject::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Subject::ExternalRef).string_len(128))
                    .col(ColumnDef::new(Subject::Title).string_len(512))
                    .col(ColumnDef::new(Subject::Body).text())
                    .col(ColumnDef::new(Subject::OwnerUserId).big_integer())
                    .col(ColumnDef::new(Subject::CategoryId).big_integer())
                    .col(
                        ColumnDef::new(Subject::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Subject::DislikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Subject::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Subject::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subject::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Subject::Kind)
                            .col(Subject::SubjectId),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (kind, external_ref) - one row per foreign content ID
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_kind_external_ref")
                    .table(Subject::Table)
                    .col(Subject::Kind)
                    .col(Subject::ExternalRef)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: owner (for "my subjects" listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_owner_user_id")
                    .table(Subject::Table)
                    .col(Subject::OwnerUserId)
                    .to_owned(),
            )
            .await?;

        // Index: category (for category listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_category_id")
                    .table(Subject::Table)
                    .col(Subject::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    Kind,
    SubjectId,
    ExternalRef,
    Title,
    Body,
    OwnerUserId,
    CategoryId,
    LikeCount,
    DislikeCount,
    CommentCount,
    CreatedAt,
    UpdatedAt,
}
