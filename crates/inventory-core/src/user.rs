//! Registration and login input.

use crate::error::{CoreError, CoreResult};

/// Validated registration input. The password is still in clear text; the
/// server hashes it before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

impl Registration {
    /// Blank identifiers count as absent. At least one identifier and a
    /// non-empty password are required.
    pub fn new(
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> CoreResult<Self> {
        let username = non_blank(username);
        let email = non_blank(email);
        if username.is_none() && email.is_none() {
            return Err(CoreError::MissingIdentifier);
        }
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(CoreError::MissingPassword)?
            .to_string();
        Ok(Self {
            username,
            email,
            password,
        })
    }
}

/// Login input: an identifier that may be a username or an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: Option<&str>, password: Option<&str>) -> CoreResult<Self> {
        let identifier = non_blank(identifier).ok_or(CoreError::MissingIdentifier)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(CoreError::MissingPassword)?
            .to_string();
        Ok(Self {
            identifier,
            password,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
