//! Subject repository.

use std::sync::Arc;

use crate::entities::{subject, ReactionKind, Subject, SubjectKind};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tribune_common::{AppError, AppResult};

/// Allow-listed filters for subject listings.
///
/// Clients never get to fold arbitrary query keys into the filter; only
/// these fields are queryable.
#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    /// Restrict to subjects owned by this user.
    pub owner_user_id: Option<i64>,
    /// Restrict to subjects in this category.
    pub category_id: Option<i64>,
    /// Substring match on title or body.
    pub search: Option<String>,
}

/// Subject repository for database operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subject by kind and allocator-issued ID.
    pub async fn find_by_id(
        &self,
        kind: SubjectKind,
        subject_id: i64,
    ) -> AppResult<Option<subject::Model>> {
        Subject::find_by_id((kind, subject_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a subject by its external content-system reference.
    pub async fn find_by_external_ref(
        &self,
        kind: SubjectKind,
        external_ref: &str,
    ) -> AppResult<Option<subject::Model>> {
        Subject::find()
            .filter(subject::Column::Kind.eq(kind))
            .filter(subject::Column::ExternalRef.eq(external_ref))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch several subjects of one kind by ID, unordered.
    pub async fn find_by_ids(
        &self,
        kind: SubjectKind,
        subject_ids: &[i64],
    ) -> AppResult<Vec<subject::Model>> {
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }
        Subject::find()
            .filter(subject::Column::Kind.eq(kind))
            .filter(subject::Column::SubjectId.is_in(subject_ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new subject. Duplicate external refs surface as `Conflict`.
    pub async fn insert(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        Subject::insert(model)
            .on_conflict(
                OnConflict::columns([subject::Column::Kind, subject::Column::ExternalRef])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(super::map_insert_err)
    }

    /// Apply a partial update. The active model must carry the primary key.
    /// A row that vanished since it was last read is `SubjectNotFound`.
    pub async fn update(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model.update(self.db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::SubjectNotFound("row no longer exists".to_string()),
            e => AppError::Database(e.to_string()),
        })
    }

    /// Delete a subject row; returns the number of rows removed.
    pub async fn delete(&self, kind: SubjectKind, subject_id: i64) -> AppResult<u64> {
        let res = Subject::delete_by_id((kind, subject_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(res.rows_affected)
    }

    /// List subjects of a kind, filtered and paginated, newest first.
    /// Returns the page of rows and the total match count.
    pub async fn list(
        &self,
        kind: SubjectKind,
        filter: &SubjectFilter,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<subject::Model>, u64)> {
        let mut query = Subject::find().filter(subject::Column::Kind.eq(kind));

        if let Some(owner) = filter.owner_user_id {
            query = query.filter(subject::Column::OwnerUserId.eq(owner));
        }
        if let Some(category) = filter.category_id {
            query = query.filter(subject::Column::CategoryId.eq(category));
        }
        if let Some(ref search) = filter.search {
            query = query.filter(
                subject::Column::Title
                    .contains(search)
                    .or(subject::Column::Body.contains(search)),
            );
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = query
            .order_by_desc(subject::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }

    /// Increment the reaction counter matching `reaction` (single UPDATE).
    pub async fn increment_reaction_count(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        reaction: ReactionKind,
    ) -> AppResult<()> {
        let column = Self::reaction_column(reaction);
        Subject::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(subject::Column::Kind.eq(kind))
            .filter(subject::Column::SubjectId.eq(subject_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the reaction counter matching `reaction`, floored at zero.
    pub async fn decrement_reaction_count(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        reaction: ReactionKind,
    ) -> AppResult<()> {
        let (column, floored) = match reaction {
            ReactionKind::Like => (
                subject::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            ),
            ReactionKind::Dislike => (
                subject::Column::DislikeCount,
                Expr::cust("GREATEST(dislike_count - 1, 0)"),
            ),
        };
        Subject::update_many()
            .col_expr(column, floored)
            .filter(subject::Column::Kind.eq(kind))
            .filter(subject::Column::SubjectId.eq(subject_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Switch counters when a user changes reaction kind: increments the
    /// new counter and decrements the old one in a single UPDATE, so both
    /// deltas apply atomically or not at all.
    pub async fn switch_reaction_counts(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        from: ReactionKind,
        to: ReactionKind,
    ) -> AppResult<()> {
        let to_column = Self::reaction_column(to);
        let (from_column, from_floored) = match from {
            ReactionKind::Like => (
                subject::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            ),
            ReactionKind::Dislike => (
                subject::Column::DislikeCount,
                Expr::cust("GREATEST(dislike_count - 1, 0)"),
            ),
        };
        Subject::update_many()
            .col_expr(to_column, Expr::col(to_column).add(1))
            .col_expr(from_column, from_floored)
            .filter(subject::Column::Kind.eq(kind))
            .filter(subject::Column::SubjectId.eq(subject_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the comment counter (single UPDATE, no fetch).
    pub async fn increment_comment_count(
        &self,
        kind: SubjectKind,
        subject_id: i64,
    ) -> AppResult<()> {
        Subject::update_many()
            .col_expr(
                subject::Column::CommentCount,
                Expr::col(subject::Column::CommentCount).add(1),
            )
            .filter(subject::Column::Kind.eq(kind))
            .filter(subject::Column::SubjectId.eq(subject_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    const fn reaction_column(reaction: ReactionKind) -> subject::Column {
        match reaction {
            ReactionKind::Like => subject::Column::LikeCount,
            ReactionKind::Dislike => subject::Column::DislikeCount,
        }
    }
}
