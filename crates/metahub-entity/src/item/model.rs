//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use metahub_core::ltree::{Label, LabelPath};

use super::extended::ItemExtended;
use super::kind::{ContainerType, ItemType};
use super::storage::ItemStorage;

/// A file, folder or name folder in a container's tree.
///
/// `name`, `parent_path` and `restore_path` hold encoded labels. An active
/// item carries `parent_path` (absent only for roots), an archived one
/// carries `restore_path` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: Uuid,
    /// Parent item, absent for roots and archived subtree roots.
    pub parent: Option<Uuid>,
    /// Encoded path of the ancestors while active.
    pub parent_path: Option<LabelPath>,
    /// Encoded path the item was archived from.
    pub restore_path: Option<LabelPath>,
    /// Whether the item is in the trash.
    pub archived: bool,
    /// Item type.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Storage zone.
    pub zone: i32,
    /// Encoded display name.
    pub name: Label,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Owning user name.
    pub owner: Option<String>,
    /// Project or dataset code.
    pub container_code: String,
    /// Kind of container.
    pub container_type: ContainerType,
    /// When the item was created.
    pub created_time: DateTime<Utc>,
    /// When the item was last updated.
    pub last_updated_time: DateTime<Utc>,
}

impl Item {
    /// The path this item currently hangs under: `parent_path` while
    /// active, `restore_path` while archived.
    pub fn location(&self) -> Option<&LabelPath> {
        if self.archived {
            self.restore_path.as_ref()
        } else {
            self.parent_path.as_ref()
        }
    }

    /// The full path of this item, i.e. the `parent_path` its children carry.
    pub fn own_path(&self) -> LabelPath {
        match self.location() {
            Some(path) => path.child(&self.name),
            None => LabelPath::single(self.name.clone()),
        }
    }

    /// Check if this is a root item (no parent path).
    pub fn is_root(&self) -> bool {
        self.location().is_none()
    }

    /// Update the modification timestamp.
    pub fn touch(&mut self) {
        self.last_updated_time = Utc::now();
    }
}

/// An item joined with its storage and extended rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// The item row.
    pub item: Item,
    /// Storage location.
    pub storage: ItemStorage,
    /// Tags and attributes.
    pub extended: ItemExtended,
}
