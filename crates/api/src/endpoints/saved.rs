//! Saved item (bookmark) endpoints.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tribune_common::{AppResult, Page};
use tribune_core::{SavedSubjectView, SaverView};
use validator::Validate;

use crate::{
    endpoints::{default_limit, default_page},
    extractors::{AuthUser, KindPath},
    middleware::AppState,
    response::ApiResponse,
};

/// Toggle save request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSaveRequest {
    #[validate(length(min = 1, max = 256))]
    pub external_ref: String,
}

/// My saved subjects request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MySavedQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Savers listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaversQuery {
    pub external_ref: String,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Toggle the caller's bookmark on a subject.
async fn toggle(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ToggleSaveRequest>,
) -> AppResult<ApiResponse<()>> {
    req.validate()?;

    let outcome = state
        .bookmark_service
        .toggle(kind, &req.external_ref, user.user_id)
        .await?;

    Ok(ApiResponse::message(outcome.message()))
}

/// The caller's saved subjects, newest save first.
async fn mine(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<MySavedQuery>,
) -> AppResult<ApiResponse<Page<SavedSubjectView>>> {
    let page = state
        .bookmark_service
        .my_saved(kind, user.user_id, query.page, query.limit)
        .await?;

    Ok(ApiResponse::ok(page))
}

/// Who saved a subject. Owner only.
async fn savers(
    KindPath(kind): KindPath,
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SaversQuery>,
) -> AppResult<ApiResponse<Page<SaverView>>> {
    let page = state
        .bookmark_service
        .savers_of(
            kind,
            &query.external_ref,
            user.user_id,
            query.page,
            query.limit,
        )
        .await?;

    Ok(ApiResponse::ok(page))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/save", post(toggle))
        .route("/saved/mine", get(mine))
        .route("/saved/users", get(savers))
}
