//! Sorting types for list endpoints.
//!
//! Sort keys are closed enums so that a client-supplied field name can never
//! reach an `ORDER BY` clause unchecked.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::validation(format!(
                "Invalid sort order '{s}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// A whitelisted sortable field.
pub trait SortKey: Copy + FromStr<Err = AppError> {
    /// The SQL column expression for this key.
    fn column(&self) -> &'static str;
}

/// A validated sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K> {
    /// Field to sort by.
    pub key: K,
    /// Sort direction.
    pub direction: SortDirection,
}

impl<K: SortKey> Sort<K> {
    /// Create a new sort specification.
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parse a field name and direction taken from query parameters.
    pub fn parse(key: &str, direction: &str) -> Result<Self, AppError> {
        Ok(Self {
            key: key.parse()?,
            direction: direction.parse()?,
        })
    }

    /// Render the `ORDER BY` body, e.g. `name DESC`.
    pub fn order_by_sql(&self) -> String {
        format!("{} {}", self.key.column(), self.direction.as_sql())
    }
}
