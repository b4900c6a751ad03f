//! HTML pages served from the configured static directory.
//!
//! Login and register bounce signed-in users to the dashboard; the
//! dashboard bounces everyone else to the login page.

use std::io::ErrorKind;

use axum::{
    Router,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use crate::auth::SessionUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

async fn read_page(state: &AppState, file: &str) -> ApiResult<Response> {
    let path = state.config().static_dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Ok(Html(body).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ApiError::NotFound(format!("page {}", file)))
        }
        Err(e) => Err(ApiError::Internal(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// An invalid or expired cookie counts as signed out here.
fn signed_in(state: &AppState, headers: &HeaderMap) -> bool {
    matches!(
        SessionUser::from_headers(headers, &state.config().jwt_secret),
        Ok(Some(_))
    )
}

/// GET /
async fn index(State(state): State<AppState>) -> ApiResult<Response> {
    read_page(&state, "index.html").await
}

/// GET /login
async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if signed_in(&state, &headers) {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    read_page(&state, "login.html").await
}

/// GET /register
async fn register_page(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if signed_in(&state, &headers) {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    read_page(&state, "register.html").await
}

/// GET /dashboard
async fn dashboard_page(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if !signed_in(&state, &headers) {
        return Ok(Redirect::to("/login").into_response());
    }
    read_page(&state, "dashboard.html").await
}

/// GET /lager - stock overview page.
async fn stock_page(State(state): State<AppState>) -> ApiResult<Response> {
    read_page(&state, "lager.html").await
}

/// Build page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/dashboard", get(dashboard_page))
        .route("/lager", get(stock_page))
}
