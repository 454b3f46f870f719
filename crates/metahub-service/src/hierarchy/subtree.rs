//! Subtree enumeration.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};
use uuid::Uuid;

use metahub_core::ltree::LabelPath;
use metahub_core::result::AppResult;
use metahub_database::{CatalogTransaction, ItemRepository};
use metahub_entity::item::Item;

use super::HierarchyEngine;

/// A descendant together with its depth below the subtree root.
#[derive(Debug, Clone, PartialEq)]
pub struct Descendant {
    /// Depth relative to the root; direct children are at depth 1.
    pub depth: usize,
    /// The descendant row.
    pub item: Item,
}

/// Every reachable descendant of a root item, in breadth-first order.
#[derive(Debug, Clone, Default)]
pub struct Subtree {
    descendants: Vec<Descendant>,
}

impl Subtree {
    /// Descendants, shallowest first.
    pub fn descendants(&self) -> &[Descendant] {
        &self.descendants
    }

    /// Number of descendants.
    pub fn len(&self) -> usize {
        self.descendants.len()
    }

    /// Whether the root has no descendants.
    pub fn is_empty(&self) -> bool {
        self.descendants.is_empty()
    }

    /// Descendants grouped by relative depth. `layers()[0]` holds the
    /// direct children.
    pub fn layers(&self) -> Vec<Vec<&Item>> {
        let mut layers: Vec<Vec<&Item>> = Vec::new();
        for descendant in &self.descendants {
            if layers.len() < descendant.depth {
                layers.resize_with(descendant.depth, Vec::new);
            }
            layers[descendant.depth - 1].push(&descendant.item);
        }
        layers
    }

    /// Consume the subtree, yielding items shallowest first.
    pub fn into_items(self) -> impl DoubleEndedIterator<Item = Item> {
        self.descendants.into_iter().map(|d| d.item)
    }
}

impl HierarchyEngine {
    /// Load the descendants of `root`.
    ///
    /// Candidates are every row whose location lies under the root's own
    /// path, matched on `restore_path` when the root is archived. They are
    /// walked from the root through `parent` links; a candidate is kept only
    /// when its location equals its parent's own path. Anything else under
    /// the prefix is left out.
    ///
    /// The candidate rows stay locked until the transaction ends.
    pub async fn subtree(
        &self,
        tx: &mut dyn CatalogTransaction,
        root: &Item,
    ) -> AppResult<Subtree> {
        let prefix = root.own_path();
        let candidates = tx
            .lock_subtree(&root.container_code, root.zone, &prefix, root.archived)
            .await?;
        Ok(build_subtree(root, candidates))
    }

    /// [`subtree`](Self::subtree) without row locks, for reads.
    pub async fn read_subtree(
        &self,
        tx: &mut dyn CatalogTransaction,
        root: &Item,
    ) -> AppResult<Subtree> {
        let prefix = root.own_path();
        let candidates = tx
            .find_subtree(&root.container_code, root.zone, &prefix, root.archived)
            .await?;
        Ok(build_subtree(root, candidates))
    }
}

/// Walk the candidate arena breadth-first from `root`.
fn build_subtree(root: &Item, candidates: Vec<Item>) -> Subtree {
    let mut children: HashMap<Uuid, Vec<usize>> = HashMap::new();
    for (idx, item) in candidates.iter().enumerate() {
        if item.id == root.id {
            continue;
        }
        if let Some(parent) = item.parent {
            children.entry(parent).or_default().push(idx);
        }
    }

    let mut reached = vec![false; candidates.len()];
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(candidates.len());
    let mut queue: VecDeque<(Uuid, LabelPath, usize)> = VecDeque::new();
    queue.push_back((root.id, root.own_path(), 0));

    while let Some((parent_id, parent_path, depth)) = queue.pop_front() {
        let Some(kids) = children.get(&parent_id) else {
            continue;
        };
        for &idx in kids {
            let child = &candidates[idx];
            if child.location() != Some(&parent_path) {
                warn!(
                    item_id = %child.id,
                    parent_id = %parent_id,
                    "Descendant path disagrees with its parent, skipping"
                );
                continue;
            }
            reached[idx] = true;
            order.push((idx, depth + 1));
            queue.push_back((child.id, child.own_path(), depth + 1));
        }
    }

    for (idx, item) in candidates.iter().enumerate() {
        if reached[idx] || item.id == root.id {
            continue;
        }
        if item.parent.is_none() {
            // A separately archived subtree root that was archived from here.
            debug!(item_id = %item.id, root_id = %root.id, "Skipping detached item under subtree prefix");
        } else {
            warn!(item_id = %item.id, root_id = %root.id, "Orphaned item under subtree prefix");
        }
    }

    let mut slots: Vec<Option<Item>> = candidates.into_iter().map(Some).collect();
    let descendants = order
        .into_iter()
        .filter_map(|(idx, depth)| slots[idx].take().map(|item| Descendant { depth, item }))
        .collect();
    Subtree { descendants }
}
