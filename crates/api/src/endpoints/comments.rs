//! Threaded comment endpoints.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tribune_common::AppResult;
use tribune_core::CommentNode;
use tribune_db::entities::comment;
use validator::Validate;

use crate::{
    extractors::{AuthUser, KindPath, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Add comment request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 256))]
    pub external_ref: String,
    #[validate(length(min = 1, max = 4096))]
    pub body: String,
    pub parent_comment_id: Option<i64>,
}

/// List comments request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    pub external_ref: String,
}

/// Toggle comment like request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCommentLikeRequest {
    pub comment_id: i64,
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: i64,
    pub subject_id: i64,
    pub user_id: i64,
    pub body: String,
    pub parent_comment_id: Option<i64>,
    pub depth: i32,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            comment_id: comment.comment_id,
            subject_id: comment.subject_id,
            user_id: comment.user_id,
            body: comment.body,
            parent_comment_id: comment.parent_comment_id,
            depth: comment.depth,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Add a comment or reply to a subject.
async fn add(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    req.validate()?;

    let comment = state
        .comment_service
        .add(
            kind,
            &req.external_ref,
            user.user_id,
            req.body,
            req.parent_comment_id,
        )
        .await?;

    Ok(ApiResponse::ok(comment.into()))
}

/// The full comment tree for a subject.
async fn list(
    KindPath(kind): KindPath,
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<ApiResponse<Vec<CommentNode>>> {
    let tree = state
        .comment_service
        .list(kind, &query.external_ref, user.map(|u| u.user_id))
        .await?;

    Ok(ApiResponse::ok(tree))
}

/// Toggle the caller's like on a comment.
async fn toggle_like(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleCommentLikeRequest>,
) -> AppResult<ApiResponse<()>> {
    let outcome = state
        .comment_service
        .toggle_like(kind, req.comment_id, user.user_id)
        .await?;

    Ok(ApiResponse::message(outcome.message()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(list).post(add))
        .route("/comments/like", post(toggle_like))
}
