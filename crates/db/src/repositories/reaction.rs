//! Reaction repository.

use std::sync::Arc;

use crate::entities::{reaction, Reaction, ReactionKind, SubjectKind};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tribune_common::{AppError, AppResult};

/// Reaction repository for database operations.
#[derive(Clone)]
pub struct ReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl ReactionRepository {
    /// Create a new reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's reaction on a subject.
    pub async fn find_by_subject_and_user(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        user_id: i64,
    ) -> AppResult<Option<reaction::Model>> {
        Reaction::find_by_id((kind, subject_id, user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new reaction. A concurrent duplicate surfaces as `Conflict`
    /// via the composite primary key.
    pub async fn insert(&self, model: reaction::ActiveModel) -> AppResult<reaction::Model> {
        Reaction::insert(model)
            .on_conflict(
                OnConflict::columns([
                    reaction::Column::Kind,
                    reaction::Column::SubjectId,
                    reaction::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(super::map_insert_err)
    }

    /// Change the kind of an existing reaction in place.
    pub async fn update_kind(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        user_id: i64,
        new_reaction: ReactionKind,
    ) -> AppResult<()> {
        Reaction::update_many()
            .set(reaction::ActiveModel {
                reaction: Set(new_reaction),
                ..Default::default()
            })
            .filter(reaction::Column::Kind.eq(kind))
            .filter(reaction::Column::SubjectId.eq(subject_id))
            .filter(reaction::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a user's reaction on a subject; returns the number of rows
    /// removed so callers can tell whether this call took effect.
    pub async fn delete_by_subject_and_user(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        user_id: i64,
    ) -> AppResult<u64> {
        let res = Reaction::delete_by_id((kind, subject_id, user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(res.rows_affected)
    }
}
