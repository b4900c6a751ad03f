//! Item upsert input and list filters.
//!
//! Request bodies come from browser forms as often as from scripts, so the
//! coercion here is lenient: numbers are accepted where strings are expected
//! and quantities fall back to [`DEFAULT_QUANTITY`] instead of failing.

use serde_json::{Number, Value};

use crate::error::{CoreError, CoreResult};
use crate::types::ItemId;

/// Quantity used when the request carries no positive integer.
pub const DEFAULT_QUANTITY: i64 = 1;

// ============================================================================
// Names
// ============================================================================

/// A trimmed, non-empty item name together with its lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName {
    display: String,
    key: String,
}

impl ItemName {
    /// Trim `raw` and reject it if nothing is left.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    /// Build a name from a JSON value. Numbers are stringified, whole floats
    /// without their fraction (`1.0` is `"1"`); anything else that is not a
    /// string counts as empty.
    pub fn from_json(value: Option<&Value>) -> CoreResult<Self> {
        match value {
            Some(Value::String(s)) => Self::parse(s),
            Some(Value::Number(n)) => Self::parse(&number_text(n)),
            _ => Err(CoreError::EmptyName),
        }
    }

    /// The name as it will be stored.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Case-folded form used for uniqueness and lookups.
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

// ============================================================================
// Quantities
// ============================================================================

/// Turn a request quantity into a positive count.
///
/// Integers are taken as is, floats are truncated and strings contribute
/// their leading integer (`"12 boxes"` is 12). Whatever doesn't yield a
/// value of at least 1 becomes [`DEFAULT_QUANTITY`].
pub fn coerce_quantity(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 1.0)
                .map(|f| f.trunc() as i64)
        }),
        Some(Value::String(s)) => leading_integer(s),
        _ => None,
    };

    match parsed {
        Some(q) if q > 0 => q,
        _ => DEFAULT_QUANTITY,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

// ============================================================================
// Upsert input
// ============================================================================

/// Normalized input for a single upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: ItemName,
    /// Always positive.
    pub quantity: i64,
    /// `None` leaves an existing description untouched.
    pub description: Option<String>,
}

impl ItemDraft {
    /// Build a draft from already typed values.
    ///
    /// Non-positive quantities are replaced by [`DEFAULT_QUANTITY`]; blank
    /// descriptions are dropped.
    pub fn new(name: &str, quantity: Option<i64>, description: Option<&str>) -> CoreResult<Self> {
        Ok(Self {
            name: ItemName::parse(name)?,
            quantity: quantity.filter(|q| *q > 0).unwrap_or(DEFAULT_QUANTITY),
            description: normalize_description(description),
        })
    }

    /// Build a draft from the loosely typed fields of a request body.
    pub fn from_json(
        name: Option<&Value>,
        quantity: Option<&Value>,
        description: Option<&Value>,
    ) -> CoreResult<Self> {
        Ok(Self {
            name: ItemName::from_json(name)?,
            quantity: coerce_quantity(quantity),
            description: normalize_description(description.and_then(Value::as_str)),
        })
    }
}

fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

// ============================================================================
// List filters
// ============================================================================

/// Name filter for listing items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    /// Lower-cased substring to look for in item names.
    pub needle: String,
    /// Set when the query is purely numeric; the item with this id matches too.
    pub id: Option<ItemId>,
}

impl NameQuery {
    /// Parse a raw query. Blank input yields no filter.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let id = if raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse().ok().map(ItemId)
        } else {
            None
        };
        Some(Self {
            needle: raw.to_lowercase(),
            id,
        })
    }
}

/// Filters for listing items. All present filters must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub query: Option<NameQuery>,
    /// Inclusive lower bound on quantity.
    pub min: Option<i64>,
    /// Inclusive upper bound on quantity.
    pub max: Option<i64>,
}

impl ItemFilter {
    /// Build a filter from raw query-string values. Bounds that are not valid
    /// integers are ignored.
    pub fn from_params(query: Option<&str>, min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            query: query.and_then(NameQuery::parse),
            min: min.and_then(parse_bound),
            max: max.and_then(parse_bound),
        }
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = NameQuery::parse(query);
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.min.is_none() && self.max.is_none()
    }
}

fn parse_bound(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
