//! Request extractors.

use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use tribune_common::AuthClaims;
use tribune_db::entities::SubjectKind;

/// Authenticated caller extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are set in request extensions by the auth middleware
        parts
            .extensions
            .get::<AuthClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Optional authenticated caller extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthClaims>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthClaims>().cloned()))
    }
}

/// Subject kind taken from the `{kind}` path segment.
///
/// Rejects unknown segments before any handler logic runs.
#[derive(Debug, Clone, Copy)]
pub struct KindPath(pub SubjectKind);

impl<S> FromRequestParts<S> for KindPath
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Missing kind path segment"))?;

        SubjectKind::from_str(&segment)
            .map(KindPath)
            .map_err(|()| (StatusCode::BAD_REQUEST, "Unknown subject kind"))
    }
}

/// Parse a kind segment inside handlers that take further path params.
pub fn parse_kind(segment: &str) -> Result<SubjectKind, tribune_common::AppError> {
    SubjectKind::from_str(segment)
        .map_err(|()| tribune_common::AppError::Validation(format!("Unknown subject kind: {segment}")))
}
