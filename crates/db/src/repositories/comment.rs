//! Comment repository.

use std::sync::Arc;

use crate::entities::{comment, Comment, SubjectKind};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tribune_common::{AppError, AppResult};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by kind and ID.
    pub async fn find_by_id(
        &self,
        kind: SubjectKind,
        comment_id: i64,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id((kind, comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new comment.
    pub async fn insert(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(super::map_insert_err)
    }

    /// All comments on a subject, oldest first. Tree assembly relies on
    /// this ordering for sibling order.
    pub async fn find_by_subject(
        &self,
        kind: SubjectKind,
        subject_id: i64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::Kind.eq(kind))
            .filter(comment::Column::SubjectId.eq(subject_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::CommentId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the like counter (single UPDATE, no fetch).
    pub async fn increment_like_count(
        &self,
        kind: SubjectKind,
        comment_id: i64,
    ) -> AppResult<()> {
        Comment::update_many()
            .col_expr(
                comment::Column::LikeCount,
                Expr::col(comment::Column::LikeCount).add(1),
            )
            .filter(comment::Column::Kind.eq(kind))
            .filter(comment::Column::CommentId.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the like counter, floored at zero.
    pub async fn decrement_like_count(
        &self,
        kind: SubjectKind,
        comment_id: i64,
    ) -> AppResult<()> {
        Comment::update_many()
            .col_expr(
                comment::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            )
            .filter(comment::Column::Kind.eq(kind))
            .filter(comment::Column::CommentId.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(comment_id: i64, parent: Option<i64>, depth: i32) -> comment::Model {
        comment::Model {
            kind: SubjectKind::Thread,
            comment_id,
            subject_id: 1,
            user_id: 42,
            body: "Test comment".to_string(),
            parent_comment_id: parent,
            depth,
            like_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let comment = create_test_comment(5, None, 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_id(SubjectKind::Thread, 5).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().comment_id, 5);
    }

    #[tokio::test]
    async fn test_find_by_subject() {
        let c1 = create_test_comment(1, None, 0);
        let c2 = create_test_comment(2, Some(1), 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_subject(SubjectKind::Thread, 1).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
