//! HTTP API layer for tribune.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: per-kind subject, reaction, comment and bookmark routes
//! - **Extractors**: authentication, kind path parsing
//! - **Middleware**: bearer-token verification
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
