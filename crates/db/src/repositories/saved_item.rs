//! Saved item (bookmark) repository.

use std::sync::Arc;

use crate::entities::{saved_item, SavedItem, SubjectKind};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tribune_common::{AppError, AppResult};

/// Saved item repository for database operations.
#[derive(Clone)]
pub struct SavedItemRepository {
    db: Arc<DatabaseConnection>,
}

impl SavedItemRepository {
    /// Create a new saved item repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's saved row for a subject.
    pub async fn find_by_subject_and_user(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        user_id: i64,
    ) -> AppResult<Option<saved_item::Model>> {
        SavedItem::find_by_id((kind, subject_id, user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new saved row. Duplicates surface as `Conflict`.
    pub async fn insert(&self, model: saved_item::ActiveModel) -> AppResult<saved_item::Model> {
        SavedItem::insert(model)
            .on_conflict(
                OnConflict::columns([
                    saved_item::Column::Kind,
                    saved_item::Column::SubjectId,
                    saved_item::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(super::map_insert_err)
    }

    /// Remove a user's saved row for a subject.
    pub async fn delete_by_subject_and_user(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        SavedItem::delete_by_id((kind, subject_id, user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// A user's saved rows of one kind, newest save first, with the total.
    pub async fn find_by_user(
        &self,
        kind: SubjectKind,
        user_id: i64,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<saved_item::Model>, u64)> {
        let query = SavedItem::find()
            .filter(saved_item::Column::Kind.eq(kind))
            .filter(saved_item::Column::UserId.eq(user_id));

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = query
            .order_by_desc(saved_item::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }

    /// Saved rows for one subject, newest save first, with the total.
    pub async fn find_by_subject(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<saved_item::Model>, u64)> {
        let query = SavedItem::find()
            .filter(saved_item::Column::Kind.eq(kind))
            .filter(saved_item::Column::SubjectId.eq(subject_id));

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = query
            .order_by_desc(saved_item::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_saved(subject_id: i64, user_id: i64) -> saved_item::Model {
        saved_item::Model {
            kind: SubjectKind::Podcast,
            subject_id,
            user_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_subject_and_user_found() {
        let saved = create_test_saved(1, 42);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[saved.clone()]])
                .into_connection(),
        );

        let repo = SavedItemRepository::new(db);
        let result = repo
            .find_by_subject_and_user(SubjectKind::Podcast, 1, 42)
            .await
            .unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_find_by_subject_and_user_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<saved_item::Model>::new()])
                .into_connection(),
        );

        let repo = SavedItemRepository::new(db);
        let result = repo
            .find_by_subject_and_user(SubjectKind::Podcast, 1, 42)
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
