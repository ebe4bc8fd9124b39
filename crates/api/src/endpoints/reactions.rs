//! Reaction (like/dislike) endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tribune_common::AppResult;
use tribune_core::ReactionStatus;
use tribune_db::entities::ReactionKind;
use validator::Validate;

use crate::{
    extractors::{AuthUser, KindPath, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Toggle reaction request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    #[validate(length(min = 1, max = 256))]
    pub external_ref: String,
    #[validate(length(max = 512))]
    pub title: Option<String>,
    pub reaction: ReactionKind,
}

/// Reaction status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub external_ref: String,
}

/// Toggle the caller's reaction on a subject.
async fn toggle(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleReactionRequest>,
) -> AppResult<ApiResponse<()>> {
    req.validate()?;

    let outcome = state
        .reaction_service
        .toggle(
            kind,
            &req.external_ref,
            req.title.as_deref(),
            user.user_id,
            req.reaction,
        )
        .await?;

    Ok(ApiResponse::message(outcome.message()))
}

/// Reaction counts plus the caller's own reaction.
async fn status(
    KindPath(kind): KindPath,
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<ApiResponse<ReactionStatus>> {
    let status = state
        .reaction_service
        .status(kind, &query.external_ref, user.map(|u| u.user_id))
        .await?;

    Ok(ApiResponse::ok(status))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/like", get(status).post(toggle))
}
