//! Records returned by the item store and the auth gate.
//!
//! Ids are database generated integers. They are wrapped so an item id can't
//! be handed to a user lookup by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of a stored item.
///
/// Monotonically increasing and never reused, so ordering by id is the same
/// as ordering by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Returns the raw integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identifier of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Returns the raw integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A stock item.
///
/// At most one item exists per case-insensitive name. After creation only
/// `quantity` and `description` change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Name as first entered (trimmed, original casing).
    pub name: String,
    /// Empty when no description was ever supplied.
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// A registered user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_parse() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId(42));
        assert!("abc".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_item_serializes_flat_fields() {
        let item = Item {
            id: ItemId(7),
            name: "Screws".to_string(),
            description: String::new(),
            quantity: 3,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Screws");
        assert_eq!(json["description"], "");
        assert_eq!(json["quantity"], 3);
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn test_user_serializes_missing_email_as_null() {
        let user = User {
            id: UserId(1),
            username: Some("anna".to_string()),
            email: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "anna");
        assert!(json["email"].is_null());
    }
}
