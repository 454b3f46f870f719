//! Catalog limits.

use serde::{Deserialize, Serialize};

/// Limits enforced by the item, collection and hierarchy services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Maximum number of user tags on an item.
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    /// Maximum number of system tags on an item.
    #[serde(default = "default_max_tags")]
    pub max_system_tags: usize,
    /// Maximum number of collections per owner and container.
    #[serde(default = "default_max_collections")]
    pub max_collections: usize,
    /// How many `_N` suffixes to try before giving up on a free name.
    #[serde(default = "default_max_name_attempts")]
    pub max_name_attempts: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_tags: default_max_tags(),
            max_system_tags: default_max_tags(),
            max_collections: default_max_collections(),
            max_name_attempts: default_max_name_attempts(),
        }
    }
}

fn default_max_tags() -> usize {
    10
}

fn default_max_collections() -> usize {
    10
}

fn default_max_name_attempts() -> u32 {
    1000
}
