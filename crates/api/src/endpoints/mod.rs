//! API endpoints.

mod comments;
mod reactions;
mod saved;
mod subjects;

use axum::Router;
use tribune_common::pagination::DEFAULT_PAGE_SIZE;

use crate::middleware::AppState;

/// Create the API router.
///
/// Every route lives under a `{kind}` segment naming the subject family
/// (`threads`, `articles`, `podcasts`, `polls`).
pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/{kind}",
        subjects::router()
            .merge(reactions::router())
            .merge(comments::router())
            .merge(saved::router()),
    )
}

pub(crate) const fn default_page() -> u64 {
    1
}

pub(crate) const fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}
