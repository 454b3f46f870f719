//! Item and container type enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use metahub_core::AppError;

/// What an item is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "type_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A leaf carrying storage.
    File,
    /// An interior node.
    Folder,
    /// The per-owner root of a container's tree.
    NameFolder,
}

impl ItemType {
    /// Return the type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
            Self::NameFolder => "name_folder",
        }
    }

    /// Whether items of this type may hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Folder | Self::NameFolder)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            "name_folder" => Ok(Self::NameFolder),
            _ => Err(AppError::validation(format!(
                "Invalid item type: '{s}'. Expected one of: file, folder, name_folder"
            ))),
        }
    }
}

/// The kind of container an item belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "container_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    /// A project.
    Project,
    /// A dataset.
    Dataset,
}

impl ContainerType {
    /// Return the container type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Dataset => "dataset",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContainerType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "dataset" => Ok(Self::Dataset),
            _ => Err(AppError::validation(format!(
                "Invalid container type: '{s}'. Expected one of: project, dataset"
            ))),
        }
    }
}
