//! Tribune server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tribune_api::{middleware::AppState, router as api_router};
use tribune_common::{Config, TokenVerifier};
use tribune_core::{BookmarkService, CommentService, ReactionService, SubjectService};
use tribune_db::repositories::{
    CommentLikeRepository, CommentRepository, ReactionRepository, SavedItemRepository,
    SequenceAllocator, SequenceRepository, SubjectRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tribune=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting tribune server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = tribune_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    tribune_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let subject_repo = SubjectRepository::new(Arc::clone(&db));
    let reaction_repo = ReactionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let comment_like_repo = CommentLikeRepository::new(Arc::clone(&db));
    let saved_repo = SavedItemRepository::new(Arc::clone(&db));
    let allocator: Arc<dyn SequenceAllocator> =
        Arc::new(SequenceRepository::new(Arc::clone(&db)));

    // Initialize services
    let subject_service = SubjectService::new(subject_repo.clone(), Arc::clone(&allocator));
    let reaction_service = ReactionService::new(
        reaction_repo,
        subject_repo.clone(),
        Arc::clone(&allocator),
    );
    let comment_service = CommentService::new(
        comment_repo,
        comment_like_repo,
        subject_repo.clone(),
        Arc::clone(&allocator),
    );
    let bookmark_service = BookmarkService::new(saved_repo, subject_repo);

    let token_verifier = TokenVerifier::new(&config.auth.token_secret);

    // Create app state
    let state = AppState {
        subject_service,
        reaction_service,
        comment_service,
        bookmark_service,
        token_verifier,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tribune_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
