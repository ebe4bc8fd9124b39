//! Core business logic for tribune.

pub mod services;

pub use services::*;
