//! HS256 access token authentication.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tubely_models::UserId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Issuer stamped into and required on every access token.
pub const TOKEN_ISSUER: &str = "tubely-access";

/// Decoded access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,
    /// User ID
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
pub struct JwtVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

impl JwtVerifier {
    /// Create a verifier. An empty secret is refused.
    pub fn new(secret: &str) -> ApiResult<Self> {
        if secret.is_empty() {
            return Err(ApiError::internal("JWT secret is not configured"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a token for `user_id` valid for `ttl`.
    pub fn issue(&self, user_id: &UserId, ttl: Duration) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> ApiResult<UserId> {
        let data = decode::<AccessClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {}", e)))?;

        UserId::parse(&data.claims.sub)
            .map_err(|_| ApiError::unauthorized("Token subject is not a user ID"))
    }
}

/// Pull the bearer token out of the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or_else(|| ApiError::unauthorized("Malformed Authorization header"))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ApiError::unauthorized("Expected a Bearer token"));
    }

    Ok(token.trim())
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = state.jwt.verify(token)?;

        debug!(user_id = %user_id, "Authenticated request");
        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn verifier() -> JwtVerifier {
        JwtVerifier::new("test-secret").unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let jwt = verifier();
        let user = UserId(Uuid::new_v4());
        let token = jwt.issue(&user, Duration::from_secs(3600)).unwrap();
        assert_eq!(jwt.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user = UserId(Uuid::new_v4());
        let token = verifier().issue(&user, Duration::from_secs(3600)).unwrap();

        let other = JwtVerifier::new("another-secret").unwrap();
        assert!(matches!(other.verify(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = verifier();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &jwt.encoding).unwrap();
        assert!(matches!(jwt.verify(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let jwt = verifier();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &claims, &jwt.encoding).unwrap();
        assert!(jwt.verify(&token).is_err());
    }

    #[test]
    fn test_empty_secret_refused() {
        assert!(JwtVerifier::new("").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(bearer_token(&headers).unwrap(), "xyz");
    }
}
