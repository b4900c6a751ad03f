//! The auth gate: registration, login and session lookup on top of the store.

use inventory_core::{Credentials, Registration, User, UserId};
use inventory_store::{NewUser, Store, StoreError};

use crate::auth::{self, SessionUser};
use crate::error::{ApiError, ApiResult};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    /// Signed token to hand to the client.
    pub token: String,
}

/// Validates credentials and issues session tokens.
#[derive(Clone)]
pub struct AuthGate {
    store: Store,
    secret: String,
    expiry_hours: u64,
}

impl AuthGate {
    pub fn new(store: Store, secret: String, expiry_hours: u64) -> Self {
        Self {
            store,
            secret,
            expiry_hours,
        }
    }

    /// Create an account. Taken usernames or emails are rejected.
    pub async fn register(&self, registration: Registration) -> ApiResult<User> {
        let password_hash = auth::hash_password(&registration.password)?;
        let row = self
            .store
            .insert_user(&NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = row.id, "User registered");
        Ok(row.into())
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown identifiers and wrong passwords get the same answer.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        let row = self
            .store
            .find_user_by_identifier(&credentials.identifier)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !auth::verify_password(&credentials.password, &row.password_hash)? {
            tracing::info!(user_id = row.id, "Login rejected: wrong password");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user: User = row.into();
        let token = auth::create_token(user.id, &self.secret, self.expiry_hours)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session { user, token })
    }

    /// Resolve a session to its user. A session whose user is gone counts
    /// as unauthenticated.
    pub async fn current_user(&self, session: SessionUser) -> ApiResult<User> {
        match self.store.get_user_by_id(session.user_id.get()).await {
            Ok(row) => Ok(row.into()),
            Err(StoreError::UserNotFound(_)) => {
                Err(ApiError::Unauthorized("Not logged in".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record the end of a session. The caller drops the cookie.
    pub fn logout(&self, session: Option<SessionUser>) {
        match session.map(|s| s.user_id) {
            Some(UserId(id)) => tracing::info!(user_id = id, "User logged out"),
            None => tracing::debug!("Logout without an active session"),
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}
