//! Comment like repository.

use std::sync::Arc;

use crate::entities::{comment_like, CommentLike, SubjectKind};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tribune_common::{AppError, AppResult};

/// Comment like repository for database operations.
#[derive(Clone)]
pub struct CommentLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentLikeRepository {
    /// Create a new comment like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's like on a comment.
    pub async fn find_by_comment_and_user(
        &self,
        kind: SubjectKind,
        comment_id: i64,
        user_id: i64,
    ) -> AppResult<Option<comment_like::Model>> {
        CommentLike::find_by_id((kind, comment_id, user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new comment like. Duplicates surface as `Conflict`.
    pub async fn insert(
        &self,
        model: comment_like::ActiveModel,
    ) -> AppResult<comment_like::Model> {
        CommentLike::insert(model)
            .on_conflict(
                OnConflict::columns([
                    comment_like::Column::Kind,
                    comment_like::Column::CommentId,
                    comment_like::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(super::map_insert_err)
    }

    /// Remove a user's like on a comment; returns the number of rows
    /// removed so callers can tell whether this call took effect.
    pub async fn delete_by_comment_and_user(
        &self,
        kind: SubjectKind,
        comment_id: i64,
        user_id: i64,
    ) -> AppResult<u64> {
        let res = CommentLike::delete_by_id((kind, comment_id, user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(res.rows_affected)
    }

    /// All likes on the given comments, for the listing join.
    pub async fn find_by_comment_ids(
        &self,
        kind: SubjectKind,
        comment_ids: &[i64],
    ) -> AppResult<Vec<comment_like::Model>> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        CommentLike::find()
            .filter(comment_like::Column::Kind.eq(kind))
            .filter(comment_like::Column::CommentId.is_in(comment_ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
