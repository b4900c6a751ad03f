//! Application state shared across handlers.

use std::sync::Arc;

use inventory_store::Store;

use crate::config::ServerConfig;
use crate::gate::AuthGate;

/// Application state shared across all handlers.
///
/// Built once at startup from an explicit store handle. Cloneable and
/// extracted in handlers with `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Database store (the item store).
    store: Arc<Store>,
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Registration, login and session lookup.
    gate: Arc<AuthGate>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, config: ServerConfig) -> Self {
        let gate = AuthGate::new(
            store.clone(),
            config.jwt_secret.clone(),
            config.session_expiry_hours,
        );
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            gate: Arc::new(gate),
        }
    }

    /// Get a reference to the database store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a reference to the auth gate.
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
