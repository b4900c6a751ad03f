//! Validation errors raised while normalizing user input.

use thiserror::Error;

/// Result type alias for domain validation.
pub type CoreResult<T> = Result<T, CoreError>;

/// Input that cannot be turned into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Item name is empty after trimming.
    #[error("item name must not be empty")]
    EmptyName,

    /// Adding the requested quantity would overflow the stored counter.
    #[error("quantity overflow: {current} + {added} exceeds the maximum")]
    QuantityOverflow { current: i64, added: i64 },

    /// Registration carried neither a username nor an email.
    #[error("a username or an email is required")]
    MissingIdentifier,

    /// Password is missing or empty.
    #[error("password is required")]
    MissingPassword,
}
