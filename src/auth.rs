//! Request authentication extractors.
//!
//! Two surfaces, two schemes:
//!
//! - End-user endpoints take `Authorization: Bearer <JWT>` (HS256, subject
//!   is the user id, issuer fixed, expiry honoured) via [`CurrentUser`].
//! - Internal service-to-service endpoints take a shared static key in
//!   `X-API-Key` or `Authorization: ApiKey <k>` via [`InternalAuth`].
//!   A missing key is 401, a wrong key is 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Fixed JWT issuer for user tokens.
pub const JWT_ISSUER: &str = "stagepass";

/// Claims carried by a user bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Always [`JWT_ISSUER`].
    pub iss: String,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
}

/// Gives extractors access to the JWT secret held by the app state.
pub trait JwtSecretProvider {
    /// HS256 signing secret.
    fn jwt_secret(&self) -> &str;
}

/// Gives extractors access to the shared internal API key.
pub trait InternalKeyProvider {
    /// Shared service-to-service key.
    fn internal_api_key(&self) -> &str;
}

/// Authenticated end user, extracted from the bearer token.
///
/// Use as a handler parameter to require authentication; the request is
/// rejected with 401 before the handler body runs otherwise.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// The authenticated user id (token subject).
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: JwtSecretProvider + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = validate_token(&token, state.jwt_secret())?;
        Ok(Self { user_id })
    }
}

/// Proof that the request carried the correct internal API key.
#[derive(Debug, Clone, Copy)]
pub struct InternalAuth;

impl<S> FromRequestParts<S> for InternalAuth
where
    S: InternalKeyProvider + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let presented = api_key(parts)?;
        if presented != state.internal_api_key() {
            return Err(ApiError::Forbidden("invalid API key".to_string()));
        }
        Ok(Self)
    }
}

/// Extracts the `Bearer` token from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<String, ApiError> {
    let header = parts
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated("missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthenticated("expected a bearer token".to_string()))?;

    if token.is_empty() {
        return Err(ApiError::Unauthenticated("empty bearer token".to_string()));
    }
    Ok(token.to_string())
}

/// Extracts the internal key from `X-API-Key` or `Authorization: ApiKey`.
fn api_key(parts: &Parts) -> Result<String, ApiError> {
    if let Some(key) = parts.headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        return Ok(key.to_string());
    }

    parts
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("ApiKey "))
        .map(str::to_string)
        .ok_or_else(|| ApiError::Unauthenticated("missing API key".to_string()))
}

/// Validates an HS256 user token and returns its subject.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] for bad signatures, a wrong
/// issuer, expired tokens, or a non-UUID subject.
pub fn validate_token(token: &str, secret: &str) -> Result<Uuid, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[JWT_ISSUER]);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthenticated("invalid token".to_string()))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| ApiError::Unauthenticated("invalid token subject".to_string()))
}

/// Issues an HS256 user token. Token issuance belongs to the (out of scope)
/// user service; this exists for tests and local tooling.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if signing fails.
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    ttl: std::time::Duration,
) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iss: JWT_ISSUER.to_string(),
        exp: now + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        iat: now,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_validates() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET, Duration::from_secs(60))
            .expect("token should be issued");
        let subject = validate_token(&token, SECRET).expect("token should validate");
        assert_eq!(subject, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::from_secs(60))
            .expect("token should be issued");
        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iss: JWT_ISSUER.to_string(),
            exp: now - 120,
            iat: now - 240,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode");
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iss: "someone-else".to_string(),
            exp: now + 300,
            iat: now,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode");
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iss: JWT_ISSUER.to_string(),
            exp: now + 300,
            iat: now,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode");
        assert!(validate_token(&token, SECRET).is_err());
    }
}
