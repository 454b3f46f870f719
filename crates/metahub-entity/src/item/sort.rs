//! Sortable item fields.

use std::cmp::Ordering;
use std::str::FromStr;

use metahub_core::AppError;
use metahub_core::types::SortKey;

use super::model::Item;

/// Item fields a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSortKey {
    /// Encoded name.
    Name,
    /// Size in bytes.
    Size,
    /// Item type.
    Type,
    /// Owner.
    Owner,
    /// Creation time.
    CreatedTime,
    /// Last update time.
    LastUpdatedTime,
}

impl ItemSortKey {
    /// Ascending comparison of two items on this key.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Size => a.size.cmp(&b.size),
            Self::Type => a.item_type.cmp(&b.item_type),
            Self::Owner => a.owner.cmp(&b.owner),
            Self::CreatedTime => a.created_time.cmp(&b.created_time),
            Self::LastUpdatedTime => a.last_updated_time.cmp(&b.last_updated_time),
        }
    }
}

impl FromStr for ItemSortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "type" => Ok(Self::Type),
            "owner" => Ok(Self::Owner),
            "created_time" => Ok(Self::CreatedTime),
            "last_updated_time" => Ok(Self::LastUpdatedTime),
            _ => Err(AppError::validation(format!(
                "Cannot sort items by '{s}'. Expected one of: name, size, type, owner, \
                 created_time, last_updated_time"
            ))),
        }
    }
}

impl SortKey for ItemSortKey {
    fn column(&self) -> &'static str {
        match self {
            Self::Name => "i.name",
            Self::Size => "i.size",
            Self::Type => "i.type",
            Self::Owner => "i.owner",
            Self::CreatedTime => "i.created_time",
            Self::LastUpdatedTime => "i.last_updated_time",
        }
    }
}
