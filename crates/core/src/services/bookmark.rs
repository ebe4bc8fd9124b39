//! Saved item (bookmark) service.

use sea_orm::Set;
use serde::Serialize;
use std::collections::HashMap;
use tribune_common::{
    pagination::{clamp_page_params, page_offset},
    AppError, AppResult, Page,
};
use tribune_db::{
    entities::{saved_item, subject, SubjectKind},
    repositories::{SavedItemRepository, SubjectRepository},
};

/// What a save toggle call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Unsaved,
}

impl SaveOutcome {
    /// Human-readable message for the API response.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Saved => "Item saved",
            Self::Unsaved => "Item unsaved",
        }
    }
}

/// A saved subject with its snapshot, for the caller's own listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSubjectView {
    pub subject_id: i64,
    pub external_ref: Option<String>,
    pub title: Option<String>,
    pub like_count: i32,
    pub dislike_count: i32,
    pub comment_count: i32,
    pub saved_at: chrono::DateTime<chrono::FixedOffset>,
}

/// One saver of a subject, for the owner-only listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaverView {
    pub user_id: i64,
    pub saved_at: chrono::DateTime<chrono::FixedOffset>,
}

/// Service handling per-user bookmarks on subjects.
#[derive(Clone)]
pub struct BookmarkService {
    saved_repo: SavedItemRepository,
    subject_repo: SubjectRepository,
}

impl BookmarkService {
    /// Create a new bookmark service.
    #[must_use]
    pub const fn new(saved_repo: SavedItemRepository, subject_repo: SubjectRepository) -> Self {
        Self {
            saved_repo,
            subject_repo,
        }
    }

    /// Toggle the caller's bookmark on the subject named by `external_ref`.
    ///
    /// Unlike reactions, bookmarks never create the subject; saving
    /// something that does not exist is `SubjectNotFound`.
    pub async fn toggle(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        user_id: i64,
    ) -> AppResult<SaveOutcome> {
        let subject = self
            .subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(external_ref.to_string()))?;

        let existing = self
            .saved_repo
            .find_by_subject_and_user(kind, subject.subject_id, user_id)
            .await?;

        if existing.is_some() {
            self.saved_repo
                .delete_by_subject_and_user(kind, subject.subject_id, user_id)
                .await?;
            return Ok(SaveOutcome::Unsaved);
        }

        let model = saved_item::ActiveModel {
            kind: Set(kind),
            subject_id: Set(subject.subject_id),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().into()),
        };
        match self.saved_repo.insert(model).await {
            Ok(_) => Ok(SaveOutcome::Saved),
            // A concurrent save won the insert; this call becomes the
            // toggle-off half of the pair.
            Err(AppError::Conflict(_)) => {
                self.saved_repo
                    .delete_by_subject_and_user(kind, subject.subject_id, user_id)
                    .await?;
                Ok(SaveOutcome::Unsaved)
            }
            Err(e) => Err(e),
        }
    }

    /// The caller's saved subjects of one kind, newest save first.
    ///
    /// Saved rows whose subject has since been deleted are dropped from
    /// the page; the total still counts them.
    pub async fn my_saved(
        &self,
        kind: SubjectKind,
        user_id: i64,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<SavedSubjectView>> {
        let (page, limit) = clamp_page_params(page, limit);
        let offset = page_offset(page, limit);

        let (rows, total) = self
            .saved_repo
            .find_by_user(kind, user_id, offset, limit)
            .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.subject_id).collect();
        let subjects = self.subject_repo.find_by_ids(kind, &ids).await?;
        let by_id: HashMap<i64, subject::Model> =
            subjects.into_iter().map(|s| (s.subject_id, s)).collect();

        let items = rows
            .into_iter()
            .filter_map(|row| {
                by_id.get(&row.subject_id).map(|s| SavedSubjectView {
                    subject_id: s.subject_id,
                    external_ref: s.external_ref.clone(),
                    title: s.title.clone(),
                    like_count: s.like_count,
                    dislike_count: s.dislike_count,
                    comment_count: s.comment_count,
                    saved_at: row.created_at,
                })
            })
            .collect();

        Ok(Page::new(items, total, page, limit))
    }

    /// Who saved a subject, newest save first. Owner-only: any caller who
    /// is not the subject's owner is refused, including callers asking
    /// about ownerless stub subjects.
    pub async fn savers_of(
        &self,
        kind: SubjectKind,
        external_ref: &str,
        requesting_user_id: i64,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<SaverView>> {
        let subject = self
            .subject_repo
            .find_by_external_ref(kind, external_ref)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(external_ref.to_string()))?;

        if subject.owner_user_id != Some(requesting_user_id) {
            return Err(AppError::Forbidden(
                "Only the owner can view who saved this".to_string(),
            ));
        }

        let (page, limit) = clamp_page_params(page, limit);
        let offset = page_offset(page, limit);

        let (rows, total) = self
            .saved_repo
            .find_by_subject(kind, subject.subject_id, offset, limit)
            .await?;

        let items = rows
            .into_iter()
            .map(|row| SaverView {
                user_id: row.user_id,
                saved_at: row.created_at,
            })
            .collect();

        Ok(Page::new(items, total, page, limit))
    }
}
