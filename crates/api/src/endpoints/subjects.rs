//! Subject CRUD endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tribune_common::{AppError, AppResult, Page};
use tribune_db::{entities::subject, repositories::SubjectFilter};
use tribune_core::{CreateSubjectInput, UpdateSubjectInput};
use validator::Validate;

use crate::{
    endpoints::{default_limit, default_page},
    extractors::{parse_kind, AuthUser, KindPath},
    middleware::AppState,
    response::ApiResponse,
};

/// Create subject request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    pub external_ref: Option<String>,
    #[validate(length(min = 1, max = 512))]
    pub title: Option<String>,
    #[validate(length(max = 65536))]
    pub body: Option<String>,
    pub category_id: Option<i64>,
}

/// Update subject request; absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 512))]
    pub title: Option<String>,
    #[validate(length(max = 65536))]
    pub body: Option<String>,
    pub category_id: Option<i64>,
}

/// List subjects request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubjectsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub owner_user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

/// Subject response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: i64,
    pub external_ref: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub owner_user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub like_count: i32,
    pub dislike_count: i32,
    pub comment_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(subject: subject::Model) -> Self {
        Self {
            id: subject.subject_id,
            external_ref: subject.external_ref,
            title: subject.title,
            body: subject.body,
            owner_user_id: subject.owner_user_id,
            category_id: subject.category_id,
            like_count: subject.like_count,
            dislike_count: subject.dislike_count,
            comment_count: subject.comment_count,
            created_at: subject.created_at.to_rfc3339(),
            updated_at: subject.updated_at.to_rfc3339(),
        }
    }
}

/// Create a subject owned by the caller.
async fn create(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateSubjectRequest>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    req.validate()?;

    let subject = state
        .subject_service
        .create(
            kind,
            CreateSubjectInput {
                external_ref: req.external_ref,
                title: req.title,
                body: req.body,
                owner_user_id: Some(user.user_id),
                category_id: req.category_id,
            },
        )
        .await?;

    Ok(ApiResponse::ok(subject.into()))
}

/// List subjects of a kind, filtered and paginated.
async fn list(
    KindPath(kind): KindPath,
    State(state): State<AppState>,
    Query(query): Query<ListSubjectsQuery>,
) -> AppResult<ApiResponse<Page<SubjectResponse>>> {
    let filter = SubjectFilter {
        owner_user_id: query.owner_user_id,
        category_id: query.category_id,
        search: query.search,
    };

    let page = state
        .subject_service
        .list(kind, filter, query.page, query.limit)
        .await?;

    Ok(ApiResponse::ok(page.map(SubjectResponse::from)))
}

/// Get a subject by ID.
async fn get_one(
    Path((kind, id)): Path<(String, i64)>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    let kind = parse_kind(&kind)?;
    let subject = state.subject_service.get(kind, id).await?;
    Ok(ApiResponse::ok(subject.into()))
}

/// Update a subject. Owner only.
async fn update(
    Path((kind, id)): Path<(String, i64)>,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateSubjectRequest>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    req.validate()?;
    let kind = parse_kind(&kind)?;

    let existing = state.subject_service.get(kind, id).await?;
    if existing.owner_user_id != Some(user.user_id) {
        return Err(AppError::Forbidden(
            "Only the owner can update this".to_string(),
        ));
    }

    let updated = state
        .subject_service
        .update(
            kind,
            id,
            UpdateSubjectInput {
                title: req.title,
                body: req.body,
                category_id: req.category_id,
                owner_user_id: None,
            },
        )
        .await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Delete a subject. Owner only.
async fn delete(
    Path((kind, id)): Path<(String, i64)>,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    let kind = parse_kind(&kind)?;

    let existing = state.subject_service.get(kind, id).await?;
    if existing.owner_user_id != Some(user.user_id) {
        return Err(AppError::Forbidden(
            "Only the owner can delete this".to_string(),
        ));
    }

    let deleted = state.subject_service.delete(kind, id).await?;
    Ok(ApiResponse::ok(deleted.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).patch(update).delete(delete))
}
