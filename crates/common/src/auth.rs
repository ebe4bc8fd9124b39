//! Bearer-token verification.
//!
//! Tribune does not issue credentials itself; tokens come from an external
//! identity service and share an HS256 secret with it. This module only
//! verifies tokens and extracts the caller's identity.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaims {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The user's role ID.
    pub role_id: i64,
    /// The user's membership ID, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<i64>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Verifies bearer tokens against the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier from the shared HS256 secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> AppResult<AuthClaims> {
        jsonwebtoken::decode::<AuthClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(secret: &str, claims: &AuthClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(user_id: i64) -> AuthClaims {
        AuthClaims {
            user_id,
            role_id: 1,
            membership_id: None,
            exp: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn test_verify_valid_token() {
        let verifier = TokenVerifier::new("secret");
        let token = sign("secret", &claims(42));

        let verified = verifier.verify(&token).unwrap();
        assert_eq!(verified.user_id, 42);
        assert_eq!(verified.role_id, 1);
        assert!(verified.membership_id.is_none());
    }

    #[test]
    fn test_verify_wrong_secret() {
        let verifier = TokenVerifier::new("secret");
        let token = sign("other-secret", &claims(42));

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_verify_expired_token() {
        let verifier = TokenVerifier::new("secret");
        let mut expired = claims(42);
        expired.exp = chrono::Utc::now().timestamp() - 3600;
        let token = sign("secret", &expired);

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_verify_garbage_token() {
        let verifier = TokenVerifier::new("secret");
        assert!(matches!(
            verifier.verify("not-a-token"),
            Err(AppError::Unauthorized)
        ));
    }
}
