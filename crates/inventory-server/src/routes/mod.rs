//! Route definitions for the HTTP API.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod items;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(items::routes())
        .merge(dashboard::routes())
        .merge(auth::routes())
        .merge(pages::routes())
        .with_state(state)
}
