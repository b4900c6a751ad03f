//! Authentication module: password hashing, session tokens and the
//! extractors that gate handlers.
//!
//! A session is an HS256 JWT kept in the `inventory_session` cookie or sent
//! as an `Authorization: Bearer` token. The cookie is HttpOnly and scoped to
//! `/`; dropping it is all logout takes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use inventory_core::UserId;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "inventory_session";

/// Longest session lifetime a token is issued for (one year).
pub const MAX_SESSION_HOURS: u64 = 24 * 365;

/// JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject).
    pub sub: i64,
    /// Expiration time (unix timestamp).
    pub exp: usize,
    /// Issued at (unix timestamp).
    pub iat: usize,
}

/// Create a session token for a user.
pub fn create_token(user_id: UserId, secret: &str, expiry_hours: u64) -> Result<String, ApiError> {
    let now = chrono::Utc::now();
    let exp = now + chrono::Duration::hours(expiry_hours.min(MAX_SESSION_HOURS) as i64);

    let claims = Claims {
        sub: user_id.get(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to create token: {}", e)))
}

/// Validate a session token and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ApiError::Unauthorized(format!("Invalid session: {}", e)))?;

    Ok(token_data.claims)
}

/// Hash a password using Argon2 with a random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(password_hash.to_string())
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie that, once removed from a jar, expires the session on the client.
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

// ============================================================================
// Extractors
// ============================================================================

/// A request carrying a valid session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
}

impl SessionUser {
    /// Read the session from request headers.
    ///
    /// The session cookie wins over an `Authorization: Bearer` header.
    /// Neither yields `Ok(None)`; a token that fails validation is an error.
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Result<Option<Self>, ApiError> {
        let jar = CookieJar::from_headers(headers);
        let token = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => match bearer_token(headers)? {
                Some(token) => token.to_string(),
                None => return Ok(None),
            },
        };
        let claims = validate_token(&token, secret)?;
        Ok(Some(Self {
            user_id: UserId(claims.sub),
        }))
    }
}

/// Token from an `Authorization` header, if one is present.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;
    value.strip_prefix("Bearer ").map(Some).ok_or_else(|| {
        ApiError::Unauthorized("Authorization header must be Bearer <token>".to_string())
    })
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, &state.config().jwt_secret)?
            .ok_or_else(|| ApiError::Unauthorized("Not logged in".to_string()))
    }
}

/// Access to the item and dashboard endpoints.
///
/// Requires a session when `auth_required` is configured; otherwise lets
/// anonymous requests through and carries the session if there is a valid one.
#[derive(Debug, Clone, Copy)]
pub struct ItemAccess(pub Option<SessionUser>);

impl FromRequestParts<AppState> for ItemAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config().auth_required {
            return SessionUser::from_request_parts(parts, state)
                .await
                .map(|user| Self(Some(user)));
        }
        let user = SessionUser::from_headers(&parts.headers, &state.config().jwt_secret)
            .ok()
            .flatten();
        Ok(Self(user))
    }
}
