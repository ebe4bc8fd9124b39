//! Common utilities and shared types for tribune.
//!
//! This crate provides foundational components used across all tribune crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Authentication**: Bearer-token verification via [`TokenVerifier`]
//! - **Pagination**: Paged query envelopes via [`Page`]

pub mod auth;
pub mod config;
pub mod error;
pub mod pagination;

pub use auth::{AuthClaims, TokenVerifier};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use pagination::{Page, total_pages};
