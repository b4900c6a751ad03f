//! inventory-server: HTTP API server for the inventory tracker
//!
//! This crate provides:
//! - JSON endpoints for items and dashboard counters
//! - Registration, login and cookie sessions
//! - The HTML pages of the web front end
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request ID generation and propagation
//! - Request tracing and logging
//! - CORS handling
//! - JSON error responses
//!
//! # Usage
//!
//! ```rust,ignore
//! use inventory_server::{AppState, ServerConfig, build_app};
//! use inventory_store::{Store, StoreConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let store = Store::connect(StoreConfig::from_env()?).await?;
//! let app = build_app(AppState::new(store, config))?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower::ServiceBuilder;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use gate::AuthGate;
pub use state::AppState;

// Re-export dependent crates
pub use inventory_core;
pub use inventory_store;

/// Build the router with the full middleware stack.
pub fn build_app(state: AppState) -> Result<Router, ConfigError> {
    let cors = middleware::cors::build_cors_layer(&state.config().cors_allowed_origins)?;

    Ok(routes::build_router(state).layer(
        ServiceBuilder::new()
            .layer(middleware::request_id::request_id_layer())
            .layer(middleware::request_id::propagate_request_id_layer())
            .layer(middleware::trace::trace_layer())
            .layer(cors),
    ))
}
