//! API integration tests.
//!
//! These tests drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;
use tribune_api::{middleware::AppState, router as api_router};
use tribune_common::{AuthClaims, TokenVerifier};
use tribune_core::{BookmarkService, CommentService, ReactionService, SubjectService};
use tribune_db::{
    entities::subject,
    repositories::{
        CommentLikeRepository, CommentRepository, ReactionRepository, SavedItemRepository,
        SequenceAllocator, SubjectRepository,
    },
    test_utils::MemorySequenceAllocator,
};

const TEST_SECRET: &str = "test-secret";

/// Create test app state over the given mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let subject_repo = SubjectRepository::new(Arc::clone(&db));
    let allocator: Arc<dyn SequenceAllocator> = Arc::new(MemorySequenceAllocator::new());

    AppState {
        subject_service: SubjectService::new(subject_repo.clone(), Arc::clone(&allocator)),
        reaction_service: ReactionService::new(
            ReactionRepository::new(Arc::clone(&db)),
            subject_repo.clone(),
            Arc::clone(&allocator),
        ),
        comment_service: CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            CommentLikeRepository::new(Arc::clone(&db)),
            subject_repo.clone(),
            allocator,
        ),
        bookmark_service: BookmarkService::new(
            SavedItemRepository::new(Arc::clone(&db)),
            subject_repo,
        ),
        token_verifier: TokenVerifier::new(TEST_SECRET),
    }
}

/// Create the test router with the auth middleware layered, as in the binary.
fn create_test_router(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tribune_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

/// Mint a bearer token for the given user.
fn bearer(user_id: i64) -> String {
    let claims = AuthClaims {
        user_id,
        role_id: 1,
        membership_id: None,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_unknown_kind_segment_is_rejected() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/gadgets/like?externalRef=x")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_without_token_is_unauthorized() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/threads/save")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"externalRef":"thread-1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_with_garbage_token_is_unauthorized() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/threads/save")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer not-a-token")
                .body(Body::from(r#"{"externalRef":"thread-1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reaction_status_unknown_subject_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<subject::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/articles/like?externalRef=missing")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_savers_listing_requires_ownership() {
    let subject = subject::Model {
        kind: tribune_db::entities::SubjectKind::Podcast,
        subject_id: 1,
        external_ref: Some("pod-1".to_string()),
        title: Some("A podcast".to_string()),
        body: None,
        owner_user_id: Some(7),
        category_id: None,
        like_count: 0,
        dislike_count: 0,
        comment_count: 0,
        created_at: chrono::Utc::now().into(),
        updated_at: chrono::Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[subject]])
        .into_connection();
    let app = create_test_router(db);

    // User 42 is not the owner (7)
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/podcasts/saved/users?externalRef=pod-1")
                .method("GET")
                .header("Authorization", bearer(42))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .method("PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_body_is_validated() {
    let app = create_test_router(empty_db());

    // Empty body fails validation before any database work
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/threads/comments")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", bearer(42))
                .body(Body::from(r#"{"externalRef":"thread-1","body":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
