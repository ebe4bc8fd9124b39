//! Threaded comment service.
//!
//! Comments nest up to two levels below a root comment. The listing
//! returns the full tree for a subject with per-comment like counts and
//! a liked-by-caller flag when the caller is authenticated.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use sea_orm::Set;
use serde::Serialize;
use tribune_common::{AppError, AppResult};
use tribune_db::{
    entities::{comment, comment_like, SubjectKind, MAX_COMMENT_DEPTH},
    repositories::{CommentLikeRepository, CommentRepository, SequenceAllocator, SubjectRepository},
};

/// What a like toggle call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentLikeOutcome {
    Liked,
    Unliked,
}

impl CommentLikeOutcome {
    /// Human-readable message for the API response.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Liked => "Comment liked",
            Self::Unliked => "Comment unliked",
        }
    }
}

/// One comment with its nested replies, as returned by the listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub comment_id: i64,
    pub user_id: i64,
    pub body: String,
    pub parent_comment_id: Option<i64>,
    pub depth: i32,
    pub like_count: i32,
    pub liked_by_caller: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub replies: Vec<CommentNode>,
}

/// Service handling comments and comment likes on subjects.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    comment_like_repo: CommentLikeRepository,
    subject_repo: SubjectRepository,
    allocator: Arc<dyn SequenceAllocator>,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        comment_like_repo: CommentLikeRepository,
        subject_repo: SubjectRepository,
        allocator: Arc<dyn SequenceAllocator>,
    ) -> Self {
        Self {
            comment_repo,
            comment_like_repo,
            subject_repo,
            allocator,
        }
    }

    /// Add a comment (or reply) to the subject named by `external_ref`.
    ///
    /// Replies must name a parent on the same subject, and a parent at the
    /// maximum depth rejects further replies.
    pub async fn add(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        user_id: i64,
        body: String,
        parent_comment_id: Option<i64>,
    ) -> AppResult<comment::Model> {
        let subject = self
            .subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(external_ref.to_string()))?;

        let depth = match parent_comment_id {
            None => 0,
            Some(parent_id) => {
                let parent = self
                    .comment_repo
                    .find_by_id(kind, parent_id)
                    .await?
                    .ok_or_else(|| AppError::CommentNotFound(parent_id.to_string()))?;
                if parent.subject_id != subject.subject_id {
                    return Err(AppError::CommentNotFound(parent_id.to_string()));
                }
                if parent.depth >= MAX_COMMENT_DEPTH {
                    return Err(AppError::DepthExceeded(MAX_COMMENT_DEPTH));
                }
                parent.depth + 1
            }
        };

        let comment_id = self
            .allocator
            .next_value(kind.comment_counter_name())
            .await?;

        let model = comment::ActiveModel {
            kind: Set(kind),
            comment_id: Set(comment_id),
            subject_id: Set(subject.subject_id),
            user_id: Set(user_id),
            body: Set(body),
            parent_comment_id: Set(parent_comment_id),
            depth: Set(depth),
            like_count: Set(0),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.comment_repo.insert(model).await?;
        self.subject_repo
            .increment_comment_count(kind, subject.subject_id)
            .await?;
        tracing::debug!(kind = ?kind, comment_id, depth, "Comment added");
        Ok(created)
    }

    /// The full comment tree for a subject, roots oldest first.
    ///
    /// Like counts come from the like table rather than the cached counter
    /// so the listing and the flags always agree. Replies whose parent no
    /// longer exists are dropped from the tree.
    pub async fn list(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        caller_user_id: Option<i64>,
    ) -> AppResult<Vec<CommentNode>> {
        let subject = self
            .subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(external_ref.to_string()))?;

        let rows = self
            .comment_repo
            .find_by_subject(kind, subject.subject_id)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|c| c.comment_id).collect();
        let likes = self.comment_like_repo.find_by_comment_ids(kind, &ids).await?;

        let mut like_counts: HashMap<i64, i32> = HashMap::new();
        let mut liked_by_caller: HashSet<i64> = HashSet::new();
        for like in &likes {
            *like_counts.entry(like.comment_id).or_insert(0) += 1;
            if Some(like.user_id) == caller_user_id {
                liked_by_caller.insert(like.comment_id);
            }
        }

        Ok(build_tree(rows, &like_counts, &liked_by_caller))
    }

    /// Toggle the caller's like on a comment.
    pub async fn toggle_like(
        &self,
        kind: SubjectKind,
        comment_id: i64,
        user_id: i64,
    ) -> AppResult<CommentLikeOutcome> {
        self.comment_repo
            .find_by_id(kind, comment_id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(comment_id.to_string()))?;

        let existing = self
            .comment_like_repo
            .find_by_comment_and_user(kind, comment_id, user_id)
            .await?;

        if existing.is_some() {
            return self.remove_like(kind, comment_id, user_id).await;
        }

        let model = comment_like::ActiveModel {
            kind: Set(kind),
            comment_id: Set(comment_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().into()),
        };
        match self.comment_like_repo.insert(model).await {
            Ok(_) => {
                self.comment_repo
                    .increment_like_count(kind, comment_id)
                    .await?;
                Ok(CommentLikeOutcome::Liked)
            }
            // A concurrent like won the insert; this call becomes the
            // toggle-off half of the pair.
            Err(AppError::Conflict(_)) => self.remove_like(kind, comment_id, user_id).await,
            Err(e) => Err(e),
        }
    }

    /// Delete the caller's like. A racing unlike may have deleted the row
    /// first; only the call whose delete took effect decrements the counter.
    async fn remove_like(
        &self,
        kind: SubjectKind,
        comment_id: i64,
        user_id: i64,
    ) -> AppResult<CommentLikeOutcome> {
        let removed = self
            .comment_like_repo
            .delete_by_comment_and_user(kind, comment_id, user_id)
            .await?;
        if removed > 0 {
            self.comment_repo
                .decrement_like_count(kind, comment_id)
                .await?;
        }
        Ok(CommentLikeOutcome::Unliked)
    }
}

/// Assemble the flat, created_at-ascending rows into a tree of nodes.
fn build_tree(
    rows: Vec<comment::Model>,
    like_counts: &HashMap<i64, i32>,
    liked_by_caller: &HashSet<i64>,
) -> Vec<CommentNode> {
    let mut children: HashMap<i64, Vec<comment::Model>> = HashMap::new();
    let mut roots: Vec<comment::Model> = Vec::new();

    for row in rows {
        match row.parent_comment_id {
            Some(parent_id) => children.entry(parent_id).or_default().push(row),
            None => roots.push(row),
        }
    }

    roots
        .into_iter()
        .map(|root| into_node(root, &mut children, like_counts, liked_by_caller))
        .collect()
}

fn into_node(
    row: comment::Model,
    children: &mut HashMap<i64, Vec<comment::Model>>,
    like_counts: &HashMap<i64, i32>,
    liked_by_caller: &HashSet<i64>,
) -> CommentNode {
    let replies = children
        .remove(&row.comment_id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| into_node(child, children, like_counts, liked_by_caller))
        .collect();

    CommentNode {
        comment_id: row.comment_id,
        user_id: row.user_id,
        body: row.body,
        parent_comment_id: row.parent_comment_id,
        depth: row.depth,
        like_count: like_counts.get(&row.comment_id).copied().unwrap_or(0),
        liked_by_caller: liked_by_caller.contains(&row.comment_id),
        created_at: row.created_at,
        replies,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use tribune_db::entities::subject;
    use tribune_db::test_utils::MemorySequenceAllocator;

    fn test_subject(subject_id: i64) -> subject::Model {
        subject::Model {
            kind: SubjectKind::Thread,
            subject_id,
            external_ref: Some("thread-1".to_string()),
            title: Some("A thread".to_string()),
            body: None,
            owner_user_id: Some(1),
            category_id: None,
            like_count: 0,
            dislike_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn test_comment(comment_id: i64, parent: Option<i64>, depth: i32) -> comment::Model {
        comment::Model {
            kind: SubjectKind::Thread,
            comment_id,
            subject_id: 1,
            user_id: 42,
            body: format!("comment {comment_id}"),
            parent_comment_id: parent,
            depth,
            like_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn test_like(comment_id: i64, user_id: i64) -> comment_like::Model {
        comment_like::Model {
            kind: SubjectKind::Thread,
            comment_id,
            user_id,
            created_at: Utc::now().into(),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn exec_noop() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }
    }

    fn empty_like_repo() -> CommentLikeRepository {
        CommentLikeRepository::new(Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        ))
    }

    #[tokio::test]
    async fn test_add_root_comment() {
        let created = test_comment(1, None, 0);
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );
        let subject_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_subject(1)]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let allocator = Arc::new(MemorySequenceAllocator::new());
        let service = CommentService::new(
            CommentRepository::new(comment_db),
            empty_like_repo(),
            SubjectRepository::new(subject_db),
            allocator.clone(),
        );

        let result = service
            .add(SubjectKind::Thread, "thread-1", 42, "hello".to_string(), None)
            .await
            .unwrap();

        assert_eq!(result.depth, 0);
        // The comment consumed ThreadCommentId 1.
        assert_eq!(allocator.next_value("ThreadCommentId").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_reply_increments_depth() {
        let parent = test_comment(1, None, 1);
        let created = test_comment(2, Some(1), 2);
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[parent]])
                .append_query_results([[created]])
                .into_connection(),
        );
        let subject_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_subject(1)]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            empty_like_repo(),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service
            .add(
                SubjectKind::Thread,
                "thread-1",
                42,
                "reply".to_string(),
                Some(1),
            )
            .await
            .unwrap();

        assert_eq!(result.depth, 2);
    }

    #[tokio::test]
    async fn test_add_reply_at_max_depth_rejected() {
        let parent = test_comment(1, Some(0), MAX_COMMENT_DEPTH);
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[parent]])
                .into_connection(),
        );
        let subject_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_subject(1)]])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            empty_like_repo(),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service
            .add(
                SubjectKind::Thread,
                "thread-1",
                42,
                "too deep".to_string(),
                Some(1),
            )
            .await;

        match result {
            Err(AppError::DepthExceeded(max)) => assert_eq!(max, MAX_COMMENT_DEPTH),
            other => panic!("expected DepthExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_reply_to_comment_on_other_subject_rejected() {
        let mut parent = test_comment(1, None, 0);
        parent.subject_id = 9;
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[parent]])
                .into_connection(),
        );
        let subject_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_subject(1)]])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            empty_like_repo(),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service
            .add(
                SubjectKind::Thread,
                "thread-1",
                42,
                "wrong place".to_string(),
                Some(1),
            )
            .await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_builds_tree_with_likes() {
        let rows = vec![
            test_comment(1, None, 0),
            test_comment(2, None, 0),
            test_comment(3, Some(1), 1),
            test_comment(4, Some(3), 2),
        ];
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_like(1, 42), test_like(1, 7), test_like(3, 7)]])
                .into_connection(),
        );
        let subject_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_subject(1)]])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            CommentLikeRepository::new(like_db),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let tree = service
            .list(SubjectKind::Thread, "thread-1", Some(42))
            .await
            .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].comment_id, 1);
        assert_eq!(tree[0].like_count, 2);
        assert!(tree[0].liked_by_caller);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].comment_id, 3);
        assert!(!tree[0].replies[0].liked_by_caller);
        assert_eq!(tree[0].replies[0].replies[0].comment_id, 4);
        assert!(tree[1].replies.is_empty());
    }

    #[tokio::test]
    async fn test_list_drops_orphan_replies() {
        // Reply 5 points at a parent that no longer exists.
        let rows = vec![test_comment(1, None, 0), test_comment(5, Some(99), 1)];
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment_like::Model>::new()])
                .into_connection(),
        );
        let subject_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_subject(1)]])
                .into_connection(),
        );

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            CommentLikeRepository::new(like_db),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let tree = service
            .list(SubjectKind::Thread, "thread-1", None)
            .await
            .unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comment_id, 1);
        assert!(tree[0].replies.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_like_then_unlike() {
        let target = test_comment(1, None, 0);
        let like = test_like(1, 42);
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lookup finds nothing, then the insert returns the new row
                .append_query_results([Vec::<comment_like::Model>::new()])
                .append_query_results([[like]])
                .into_connection(),
        );
        let subject_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            CommentLikeRepository::new(like_db),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let outcome = service
            .toggle_like(SubjectKind::Thread, 1, 42)
            .await
            .unwrap();
        assert_eq!(outcome, CommentLikeOutcome::Liked);
        assert_eq!(outcome.message(), "Comment liked");
    }

    #[tokio::test]
    async fn test_toggle_like_existing_unlikes() {
        let target = test_comment(1, None, 0);
        let like = test_like(1, 42);
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let subject_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            CommentLikeRepository::new(like_db),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let outcome = service
            .toggle_like(SubjectKind::Thread, 1, 42)
            .await
            .unwrap();
        assert_eq!(outcome, CommentLikeOutcome::Unliked);
    }

    #[tokio::test]
    async fn test_unlike_lost_delete_race_skips_decrement() {
        let target = test_comment(1, None, 0);
        let like = test_like(1, 42);
        // No exec result for a decrement: issuing one would fail the call.
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lookup hits, but a racing unlike already deleted the row
                .append_query_results([[like]])
                .append_exec_results([exec_noop()])
                .into_connection(),
        );
        let subject_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            CommentLikeRepository::new(like_db),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let outcome = service
            .toggle_like(SubjectKind::Thread, 1, 42)
            .await
            .unwrap();
        assert_eq!(outcome, CommentLikeOutcome::Unliked);
    }

    #[tokio::test]
    async fn test_toggle_like_insert_race_settles_as_unlike() {
        let target = test_comment(1, None, 0);
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lookup misses; the insert hits ON CONFLICT and returns no
                // row; the delete then removes the winner's like
                .append_query_results([Vec::<comment_like::Model>::new()])
                .append_query_results([Vec::<comment_like::Model>::new()])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let subject_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            CommentLikeRepository::new(like_db),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let outcome = service
            .toggle_like(SubjectKind::Thread, 1, 42)
            .await
            .unwrap();
        assert_eq!(outcome, CommentLikeOutcome::Unliked);
    }

    #[tokio::test]
    async fn test_toggle_like_missing_comment() {
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );
        let subject_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = CommentService::new(
            CommentRepository::new(comment_db),
            empty_like_repo(),
            SubjectRepository::new(subject_db),
            Arc::new(MemorySequenceAllocator::new()),
        );

        let result = service.toggle_like(SubjectKind::Thread, 99, 42).await;
        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }
}
