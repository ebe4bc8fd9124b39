//! Subject service (generic entity store over thread/article/podcast/poll).

use std::sync::Arc;

use sea_orm::{ActiveValue::NotSet, Set};
use tribune_common::{
    pagination::{clamp_page_params, page_offset},
    AppError, AppResult, Page,
};
use tribune_db::{
    entities::{subject, SubjectKind},
    repositories::{SequenceAllocator, SubjectFilter, SubjectRepository},
};

/// Input for creating a subject explicitly.
#[derive(Debug, Clone, Default)]
pub struct CreateSubjectInput {
    pub external_ref: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub owner_user_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// Partial update for a subject; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubjectInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<i64>,
    pub owner_user_id: Option<i64>,
}

/// Subject service for the generic CRUD surface.
#[derive(Clone)]
pub struct SubjectService {
    subject_repo: SubjectRepository,
    allocator: Arc<dyn SequenceAllocator>,
}

impl SubjectService {
    /// Create a new subject service.
    #[must_use]
    pub fn new(subject_repo: SubjectRepository, allocator: Arc<dyn SequenceAllocator>) -> Self {
        Self {
            subject_repo,
            allocator,
        }
    }

    /// Create a subject, allocating its per-kind sequence ID.
    ///
    /// A duplicate external ref fails with `Conflict`. An allocation whose
    /// insert then fails leaves a gap in the sequence, which is fine; the
    /// ID is never reused.
    pub async fn create(
        &self,
        kind: SubjectKind,
        input: CreateSubjectInput,
    ) -> AppResult<subject::Model> {
        let subject_id = self.allocator.next_value(kind.counter_name()).await?;
        let now = chrono::Utc::now();

        let model = subject::ActiveModel {
            kind: Set(kind),
            subject_id: Set(subject_id),
            external_ref: Set(input.external_ref),
            title: Set(input.title),
            body: Set(input.body),
            owner_user_id: Set(input.owner_user_id),
            category_id: Set(input.category_id),
            like_count: Set(0),
            dislike_count: Set(0),
            comment_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = self.subject_repo.insert(model).await?;
        tracing::debug!(kind = ?kind, subject_id, "Subject created");
        Ok(created)
    }

    /// Fetch a subject by ID.
    pub async fn get(&self, kind: SubjectKind, subject_id: i64) -> AppResult<subject::Model> {
        self.subject_repo
            .find_by_id(kind, subject_id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(format!("{kind:?} {subject_id}")))
    }

    /// Fetch a subject by its external content-system reference.
    pub async fn get_by_external_ref(
        &self,
        kind: SubjectKind,
        external_ref: &str,
    ) -> AppResult<subject::Model> {
        self.subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(external_ref.to_string()))
    }

    /// Apply a partial update; returns the post-update row.
    pub async fn update(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        patch: UpdateSubjectInput,
    ) -> AppResult<subject::Model> {
        // Existence check first so a missing row is NotFound, not a silent no-op.
        self.get(kind, subject_id).await?;

        let model = subject::ActiveModel {
            kind: Set(kind),
            subject_id: Set(subject_id),
            title: patch.title.map_or(NotSet, |v| Set(Some(v))),
            body: patch.body.map_or(NotSet, |v| Set(Some(v))),
            category_id: patch.category_id.map_or(NotSet, |v| Set(Some(v))),
            owner_user_id: patch.owner_user_id.map_or(NotSet, |v| Set(Some(v))),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.subject_repo.update(model).await
    }

    /// Delete a subject; returns the removed row for audit echo.
    ///
    /// Reactions, comments and saved rows referencing the subject are
    /// retained; they become unreachable through the API.
    pub async fn delete(&self, kind: SubjectKind, subject_id: i64) -> AppResult<subject::Model> {
        let existing = self.get(kind, subject_id).await?;
        self.subject_repo.delete(kind, subject_id).await?;
        tracing::debug!(kind = ?kind, subject_id, "Subject deleted");
        Ok(existing)
    }

    /// List subjects of a kind, filtered and paginated, newest first.
    pub async fn list(
        &self,
        kind: SubjectKind,
        filter: SubjectFilter,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<subject::Model>> {
        let (page, limit) = clamp_page_params(page, limit);
        let offset = page_offset(page, limit);

        let (items, total) = self.subject_repo.list(kind, &filter, offset, limit).await?;
        Ok(Page::new(items, total, page, limit))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use tribune_db::test_utils::MemorySequenceAllocator;

    fn create_test_subject(kind: SubjectKind, subject_id: i64) -> subject::Model {
        subject::Model {
            kind,
            subject_id,
            external_ref: Some(format!("ext-{subject_id}")),
            title: Some("Test subject".to_string()),
            body: Some("Body".to_string()),
            owner_user_id: Some(1),
            category_id: None,
            like_count: 0,
            dislike_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_allocates_sequence_id() {
        let created = create_test_subject(SubjectKind::Thread, 1);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created.clone()]])
                .into_connection(),
        );

        let allocator = Arc::new(MemorySequenceAllocator::new());
        let service = SubjectService::new(SubjectRepository::new(db), allocator.clone());

        let result = service
            .create(
                SubjectKind::Thread,
                CreateSubjectInput {
                    title: Some("Test subject".to_string()),
                    owner_user_id: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(result.subject_id, 1);
        // A second create of the same kind would receive 2.
        assert_eq!(allocator.next_value("ThreadId").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subject::Model>::new()])
                .into_connection(),
        );

        let service = SubjectService::new(
            SubjectRepository::new(db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service.get(SubjectKind::Article, 99).await;
        assert!(matches!(result, Err(AppError::SubjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let subject = create_test_subject(SubjectKind::Poll, 3);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subject.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = SubjectService::new(
            SubjectRepository::new(db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let deleted = service.delete(SubjectKind::Poll, 3).await.unwrap();
        assert_eq!(deleted.subject_id, 3);
    }

    #[tokio::test]
    async fn test_update_vanished_row_is_not_found() {
        // The existence check passes, then the row is gone by the time the
        // UPDATE runs; RETURNING comes back empty.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_subject(SubjectKind::Thread, 1)]])
                .append_query_results([Vec::<subject::Model>::new()])
                .into_connection(),
        );

        let service = SubjectService::new(
            SubjectRepository::new(db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service
            .update(
                SubjectKind::Thread,
                1,
                UpdateSubjectInput {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::SubjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_missing_subject_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subject::Model>::new()])
                .into_connection(),
        );

        let service = SubjectService::new(
            SubjectRepository::new(db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service
            .update(SubjectKind::Thread, 42, UpdateSubjectInput::default())
            .await;
        assert!(matches!(result, Err(AppError::SubjectNotFound(_))));
    }
}
