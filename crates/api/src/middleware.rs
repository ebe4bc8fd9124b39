//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tribune_common::TokenVerifier;
use tribune_core::{BookmarkService, CommentService, ReactionService, SubjectService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub subject_service: SubjectService,
    pub reaction_service: ReactionService,
    pub comment_service: CommentService,
    pub bookmark_service: BookmarkService,
    pub token_verifier: TokenVerifier,
}

/// Authentication middleware.
///
/// Verifies the bearer token if one is present and stores the claims in
/// request extensions. Requests without a valid token continue
/// unauthenticated; handlers that require identity reject them via the
/// `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.token_verifier.verify(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(_) => {
                tracing::debug!("Rejected bearer token");
            }
        }
    }

    next.run(req).await
}
