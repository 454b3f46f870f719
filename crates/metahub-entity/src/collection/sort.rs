//! Sortable collection fields.

use std::cmp::Ordering;
use std::str::FromStr;

use metahub_core::AppError;
use metahub_core::types::SortKey;

use super::model::Collection;

/// Collection fields a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSortKey {
    /// Collection name.
    Name,
    /// Owner.
    Owner,
    /// Creation time.
    CreatedTime,
    /// Last update time.
    LastUpdatedTime,
}

impl CollectionSortKey {
    /// Ascending comparison of two collections on this key.
    pub fn compare(&self, a: &Collection, b: &Collection) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Owner => a.owner.cmp(&b.owner),
            Self::CreatedTime => a.created_time.cmp(&b.created_time),
            Self::LastUpdatedTime => a.last_updated_time.cmp(&b.last_updated_time),
        }
    }
}

impl FromStr for CollectionSortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "owner" => Ok(Self::Owner),
            "created_time" => Ok(Self::CreatedTime),
            "last_updated_time" => Ok(Self::LastUpdatedTime),
            _ => Err(AppError::validation(format!(
                "Cannot sort collections by '{s}'. Expected one of: name, owner, created_time, \
                 last_updated_time"
            ))),
        }
    }
}

impl SortKey for CollectionSortKey {
    fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Owner => "owner",
            Self::CreatedTime => "created_time",
            Self::LastUpdatedTime => "last_updated_time",
        }
    }
}
