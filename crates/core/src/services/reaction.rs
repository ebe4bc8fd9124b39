//! Reaction toggle service.
//!
//! A user holds at most one reaction per subject; the composite primary
//! key on the reaction table enforces this even under concurrent toggles.

use std::sync::Arc;

use sea_orm::Set;
use serde::Serialize;
use tribune_common::{AppError, AppResult};
use tribune_db::{
    entities::{reaction, ReactionKind, SubjectKind},
    repositories::{ReactionRepository, SequenceAllocator, SubjectRepository},
};

/// What a toggle call did, for the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    Added,
    Removed,
    Updated,
}

impl ReactionOutcome {
    /// Human-readable message for the API response.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Reaction added",
            Self::Removed => "Reaction removed",
            Self::Updated => "Reaction updated",
        }
    }
}

/// Reaction counts plus the caller's own reaction, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionStatus {
    pub like_count: i32,
    pub dislike_count: i32,
    pub user_reaction: Option<ReactionKind>,
}

/// Service handling like/dislike toggles on subjects.
#[derive(Clone)]
pub struct ReactionService {
    reaction_repo: ReactionRepository,
    subject_repo: SubjectRepository,
    allocator: Arc<dyn SequenceAllocator>,
}

impl ReactionService {
    /// Create a new reaction service.
    #[must_use]
    pub fn new(
        reaction_repo: ReactionRepository,
        subject_repo: SubjectRepository,
        allocator: Arc<dyn SequenceAllocator>,
    ) -> Self {
        Self {
            reaction_repo,
            subject_repo,
            allocator,
        }
    }

    /// Toggle a user's reaction on the subject named by `external_ref`.
    ///
    /// Three branches: no existing reaction inserts one, the same kind
    /// removes it, a different kind switches it in place. The subject row
    /// is created lazily from `(external_ref, title)` on first contact.
    pub async fn toggle(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        title: Option<&str>,
        user_id: i64,
        new_reaction: ReactionKind,
    ) -> AppResult<ReactionOutcome> {
        let subject = self
            .resolve_or_create_subject(kind, external_ref, title)
            .await?;

        let existing = self
            .reaction_repo
            .find_by_subject_and_user(kind, subject.subject_id, user_id)
            .await?;

        match existing {
            None => {
                let model = reaction::ActiveModel {
                    kind: Set(kind),
                    subject_id: Set(subject.subject_id),
                    user_id: Set(user_id),
                    reaction: Set(new_reaction),
                    created_at: Set(chrono::Utc::now().into()),
                };
                match self.reaction_repo.insert(model).await {
                    Ok(_) => {
                        self.subject_repo
                            .increment_reaction_count(kind, subject.subject_id, new_reaction)
                            .await?;
                        Ok(ReactionOutcome::Added)
                    }
                    // A concurrent toggle won the insert; treat the winner's
                    // row as the existing reaction.
                    Err(AppError::Conflict(_)) => {
                        let winner = self
                            .reaction_repo
                            .find_by_subject_and_user(kind, subject.subject_id, user_id)
                            .await?
                            .ok_or_else(|| {
                                AppError::Database("reaction vanished during toggle".to_string())
                            })?;
                        self.settle_existing(kind, subject.subject_id, user_id, winner, new_reaction)
                            .await
                    }
                    Err(e) => Err(e),
                }
            }
            Some(current) => {
                self.settle_existing(kind, subject.subject_id, user_id, current, new_reaction)
                    .await
            }
        }
    }

    /// Current counts and the caller's reaction for a subject.
    ///
    /// Unknown subjects are `SubjectNotFound`; a known subject nobody has
    /// reacted to reports zeroed counts.
    pub async fn status(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        user_id: Option<i64>,
    ) -> AppResult<ReactionStatus> {
        let subject = self
            .subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(external_ref.to_string()))?;

        let user_reaction = match user_id {
            Some(uid) => self
                .reaction_repo
                .find_by_subject_and_user(kind, subject.subject_id, uid)
                .await?
                .map(|r| r.reaction),
            None => None,
        };

        Ok(ReactionStatus {
            like_count: subject.like_count,
            dislike_count: subject.dislike_count,
            user_reaction,
        })
    }

    /// Remove or switch an already-present reaction.
    async fn settle_existing(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        user_id: i64,
        current: reaction::Model,
        new_reaction: ReactionKind,
    ) -> AppResult<ReactionOutcome> {
        if current.reaction == new_reaction {
            let removed = self
                .reaction_repo
                .delete_by_subject_and_user(kind, subject_id, user_id)
                .await?;
            // A racing toggle may have deleted the row first; only the
            // call whose delete took effect decrements the counter.
            if removed > 0 {
                self.subject_repo
                    .decrement_reaction_count(kind, subject_id, new_reaction)
                    .await?;
            }
            Ok(ReactionOutcome::Removed)
        } else {
            self.reaction_repo
                .update_kind(kind, subject_id, user_id, new_reaction)
                .await?;
            self.subject_repo
                .switch_reaction_counts(kind, subject_id, current.reaction, new_reaction)
                .await?;
            Ok(ReactionOutcome::Updated)
        }
    }

    /// Find the subject for an external ref, creating a stub row on first
    /// contact. Created stubs carry no owner, so their saver listing stays
    /// forbidden until an owner claims them.
    async fn resolve_or_create_subject(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        title: Option<&str>,
    ) -> AppResult<tribune_db::entities::subject::Model> {
        if let Some(subject) = self
            .subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
        {
            return Ok(subject);
        }

        let subject_id = self.allocator.next_value(kind.counter_name()).await?;
        let now = chrono::Utc::now();
        let model = tribune_db::entities::subject::ActiveModel {
            kind: Set(kind),
            subject_id: Set(subject_id),
            external_ref: Set(Some(external_ref.to_string())),
            title: Set(title.map(ToString::to_string)),
            body: Set(None),
            owner_user_id: Set(None),
            category_id: Set(None),
            like_count: Set(0),
            dislike_count: Set(0),
            comment_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        match self.subject_repo.insert(model).await {
            Ok(subject) => {
                tracing::debug!(kind = ?kind, external_ref, "Subject created lazily");
                Ok(subject)
            }
            // Another request created the row first; use theirs.
            Err(AppError::Conflict(_)) => self
                .subject_repo
                .find_by_external_ref(kind, external_ref)
                .await?
                .ok_or_else(|| {
                    AppError::Database("subject vanished after conflict".to_string())
                }),
            Err(e) => Err(e),
        }
    }
}
