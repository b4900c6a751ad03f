//! Authentication routes: register, login, logout, me.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use inventory_core::{Credentials, Registration, User};
use serde::{Deserialize, Serialize};

use crate::auth::{self, SessionUser};
use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(alias = "username", alias = "email")]
    pub identifier: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/register
async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(request) = body?;
    let registration = Registration::new(
        request.username.as_deref(),
        request.email.as_deref(),
        request.password.as_deref(),
    )?;

    state.gate().register(registration).await?;

    Ok((
        StatusCode::CREATED,
        MessageResponse::new("Registration successful"),
    ))
}

/// POST /api/login - sets the session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    let Json(request) = body?;
    let credentials =
        Credentials::new(request.identifier.as_deref(), request.password.as_deref())?;

    let session = state.gate().login(&credentials).await?;
    let cookie = auth::session_cookie(session.token, state.config().cookie_secure);

    Ok((jar.add(cookie), MessageResponse::new("Login successful")))
}

/// POST /api/logout - clears the session cookie. Succeeds without a session.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let session = SessionUser::from_headers(&headers, &state.config().jwt_secret)
        .ok()
        .flatten();
    state.gate().logout(session);

    (
        jar.remove(auth::cleared_session_cookie()),
        MessageResponse::new("Logged out"),
    )
}

/// GET /api/me - current user info.
async fn me(State(state): State<AppState>, session: SessionUser) -> ApiResult<Json<User>> {
    Ok(Json(state.gate().current_user(session).await?))
}

/// Build auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_identifier_aliases() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"identifier": "anna", "password": "pw"}"#).unwrap();
        assert_eq!(request.identifier.as_deref(), Some("anna"));

        let request: LoginRequest =
            serde_json::from_str(r#"{"email": "a@example.org", "password": "pw"}"#).unwrap();
        assert_eq!(request.identifier.as_deref(), Some("a@example.org"));
    }

    #[test]
    fn test_register_request_fields_are_optional() {
        let request: RegisterRequest = serde_json::from_str(r#"{"username": "anna"}"#).unwrap();
        assert_eq!(request.username.as_deref(), Some("anna"));
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn test_message_response_serialize() {
        let json = serde_json::to_string(&MessageResponse::new("Logged out").0).unwrap();
        assert_eq!(json, r#"{"message":"Logged out"}"#);
    }
}
