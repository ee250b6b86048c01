//! Document model: placed component instances and the in-memory page store.
//!
//! This module defines the core data types that describe what is on a page
//! (`ComponentInstance`), a sparse-update type for incremental edits
//! (`PartialComponentInstance`), and the runtime store that owns all live
//! instances (`PageDoc`).
//!
//! The flat instance map is the single source of truth. Parent/child
//! structure, sibling ordering, and ancestor checks are all derived views
//! recomputed from it on demand, so no separately-mutated tree index can
//! drift out of sync with the list.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::DefinitionId;

/// Unique identifier for a component instance.
pub type InstanceId = Uuid;

/// Unique identifier for a page.
pub type PageId = Uuid;

/// A placed component instance as stored in the document and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// Unique identifier, stable across the editing session.
    pub id: InstanceId,
    /// The page this instance belongs to.
    pub page_id: PageId,
    /// Weak reference to the catalog definition; resolved by lookup.
    pub definition_id: DefinitionId,
    /// Containing instance, or `None` for a page root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<InstanceId>,
    /// Position among siblings sharing the same parent; ascending render
    /// order, ties broken by `id`.
    pub order_index: i32,
    /// Property overrides layered on top of the definition's defaults.
    pub props: serde_json::Value,
    /// Monotonically increasing edit counter used for conflict detection.
    pub version: i32,
}

/// Sparse update for a component instance. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialComponentInstance {
    /// New parent, if being updated. `Some(None)` re-roots the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<InstanceId>>,
    /// New sibling position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    /// Props keys to merge or remove (null values delete keys).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
    /// New version counter, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

/// Error raised by structural tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The referenced instance does not exist in the page.
    #[error("unknown instance: {0}")]
    UnknownInstance(InstanceId),
    /// The requested re-parent would make an instance its own ancestor.
    #[error("moving {id} under {new_parent} would create a cycle")]
    WouldCycle {
        /// The instance being moved.
        id: InstanceId,
        /// The rejected destination parent.
        new_parent: InstanceId,
    },
}

/// In-memory store of the component instances for one page.
pub struct PageDoc {
    page_id: PageId,
    instances: HashMap<InstanceId, ComponentInstance>,
}

impl PageDoc {
    /// Create an empty store for `page_id`.
    #[must_use]
    pub fn new(page_id: PageId) -> Self {
        Self { page_id, instances: HashMap::new() }
    }

    /// The page this store belongs to.
    #[must_use]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Insert or replace an instance. If an instance with the same `id`
    /// already exists it is overwritten.
    pub fn insert(&mut self, instance: ComponentInstance) {
        self.instances.insert(instance.id, instance);
    }

    /// Remove an instance by id, returning it if it was present. Children
    /// are left in place; use [`PageDoc::remove_subtree`] for cascades.
    pub fn remove(&mut self, id: &InstanceId) -> Option<ComponentInstance> {
        self.instances.remove(id)
    }

    /// Return a reference to an instance by id.
    #[must_use]
    pub fn get(&self, id: &InstanceId) -> Option<&ComponentInstance> {
        self.instances.get(id)
    }

    /// Whether an instance with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    /// Apply a partial update to an existing instance. Returns false if the
    /// instance doesn't exist or the props patch is not a JSON object.
    pub fn apply_partial(&mut self, id: &InstanceId, partial: &PartialComponentInstance) -> bool {
        let Some(instance) = self.instances.get_mut(id) else {
            return false;
        };
        if let Some(parent_id) = partial.parent_id {
            instance.parent_id = parent_id;
        }
        if let Some(order_index) = partial.order_index {
            instance.order_index = order_index;
        }
        if let Some(version) = partial.version {
            instance.version = version;
        }
        if let Some(ref props) = partial.props {
            let Some(incoming) = props.as_object() else {
                return false;
            };

            if !instance.props.is_object() {
                instance.props = serde_json::json!({});
            }

            if let Some(existing) = instance.props.as_object_mut() {
                for (k, v) in incoming {
                    if v.is_null() {
                        existing.remove(k);
                    } else {
                        existing.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        true
    }

    /// Replace all instances with a full server snapshot.
    pub fn load_snapshot(&mut self, instances: Vec<ComponentInstance>) {
        self.instances.clear();
        for instance in instances {
            self.instances.insert(instance.id, instance);
        }
    }

    /// Direct children of `parent`, sorted by `(order_index, id)`.
    ///
    /// For `parent = None` the result also includes instances whose
    /// `parent_id` does not resolve to a live instance: a dangling parent
    /// reference demotes the node to a root instead of dropping it.
    #[must_use]
    pub fn children_of(&self, parent: Option<InstanceId>) -> Vec<&ComponentInstance> {
        let mut children: Vec<&ComponentInstance> = self
            .instances
            .values()
            .filter(|instance| match parent {
                Some(parent_id) => instance.parent_id == Some(parent_id),
                None => match instance.parent_id {
                    None => true,
                    Some(parent_id) => !self.instances.contains_key(&parent_id),
                },
            })
            .collect();
        children.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        children
    }

    /// Instances whose `parent_id` points at a missing instance. These render
    /// as roots; the persistence layer flags them as data-integrity warnings.
    #[must_use]
    pub fn dangling_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self
            .instances
            .values()
            .filter(|instance| {
                instance
                    .parent_id
                    .is_some_and(|parent_id| !self.instances.contains_key(&parent_id))
            })
            .map(|instance| instance.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether `candidate` is `node` itself or one of its descendants.
    ///
    /// Walks the ancestor chain of `candidate` towards a root. Fails closed:
    /// if the chain revisits an id before reaching a root (a corrupted,
    /// cyclic tree), the candidate is reported as a descendant so the caller
    /// rejects the move rather than risking an undetected cycle. A dangling
    /// parent reference terminates the walk like a root.
    #[must_use]
    pub fn is_descendant(&self, candidate: InstanceId, node: InstanceId) -> bool {
        let mut visited = HashSet::new();
        let mut current = candidate;
        loop {
            if current == node {
                return true;
            }
            if !visited.insert(current) {
                // Corrupted chain; reject rather than trust it.
                return true;
            }
            match self.instances.get(&current).and_then(|i| i.parent_id) {
                Some(parent_id) => current = parent_id,
                None => return false,
            }
        }
    }

    /// One past the highest `order_index` among `parent`'s children, or 0
    /// for an empty container.
    #[must_use]
    pub fn next_order_index(&self, parent: Option<InstanceId>) -> i32 {
        self.children_of(parent)
            .last()
            .map_or(0, |last| last.order_index.saturating_add(1))
    }

    /// `id` plus all transitive children, parents before children.
    /// Cycle-guarded: each instance appears at most once. Empty if `id`
    /// does not exist.
    #[must_use]
    pub fn subtree_ids(&self, id: InstanceId) -> Vec<InstanceId> {
        if !self.instances.contains_key(&id) {
            return Vec::new();
        }
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            out.push(current);
            for child in self.children_of(Some(current)).iter().rev() {
                stack.push(child.id);
            }
        }
        out
    }

    /// Remove `id` and its entire subtree, returning the removed instances
    /// (parents before children). Empty if `id` does not exist.
    pub fn remove_subtree(&mut self, id: InstanceId) -> Vec<ComponentInstance> {
        self.subtree_ids(id)
            .into_iter()
            .filter_map(|subtree_id| self.instances.remove(&subtree_id))
            .collect()
    }

    /// Re-parent and reorder an instance.
    ///
    /// Validates the cycle check, detaches `id` from its old sibling list,
    /// inserts it at `index` (clamped to the end) among `new_parent`'s
    /// children, and renumbers both affected sibling lists `0..n`. Returns
    /// every `(id, order_index)` pair that changed; the moved instance is
    /// always included so callers persist its parent change even when its
    /// order happens to be unchanged.
    ///
    /// # Errors
    ///
    /// `UnknownInstance` if `id` or `new_parent` is missing; `WouldCycle` if
    /// `new_parent` is `id` or one of its descendants.
    pub fn move_instance(
        &mut self,
        id: InstanceId,
        new_parent: Option<InstanceId>,
        index: usize,
    ) -> Result<Vec<(InstanceId, i32)>, TreeError> {
        if !self.instances.contains_key(&id) {
            return Err(TreeError::UnknownInstance(id));
        }
        if let Some(parent_id) = new_parent {
            if !self.instances.contains_key(&parent_id) {
                return Err(TreeError::UnknownInstance(parent_id));
            }
            if self.is_descendant(parent_id, id) {
                return Err(TreeError::WouldCycle { id, new_parent: parent_id });
            }
        }

        let old_parent = self.instances[&id].parent_id;

        let mut new_siblings: Vec<InstanceId> = self
            .children_of(new_parent)
            .iter()
            .map(|instance| instance.id)
            .filter(|sibling_id| *sibling_id != id)
            .collect();
        let index = index.min(new_siblings.len());
        new_siblings.insert(index, id);

        let mut changed = Vec::new();

        if let Some(instance) = self.instances.get_mut(&id) {
            instance.parent_id = new_parent;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        for (position, sibling_id) in new_siblings.iter().enumerate() {
            let order = position as i32;
            let Some(sibling) = self.instances.get_mut(sibling_id) else {
                continue;
            };
            if sibling.order_index != order || *sibling_id == id {
                sibling.order_index = order;
                changed.push((*sibling_id, order));
            }
        }

        // Close the gap left behind in the old sibling list.
        if old_parent != new_parent {
            let old_siblings: Vec<InstanceId> = self
                .children_of(old_parent)
                .iter()
                .map(|instance| instance.id)
                .collect();
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            for (position, sibling_id) in old_siblings.iter().enumerate() {
                let order = position as i32;
                let Some(sibling) = self.instances.get_mut(sibling_id) else {
                    continue;
                };
                if sibling.order_index != order {
                    sibling.order_index = order;
                    changed.push((*sibling_id, order));
                }
            }
        }

        Ok(changed)
    }

    /// All instances sorted by `(order_index, id)` for stable listings.
    #[must_use]
    pub fn sorted_instances(&self) -> Vec<&ComponentInstance> {
        let mut instances: Vec<&ComponentInstance> = self.instances.values().collect();
        instances.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        instances
    }

    /// Number of instances currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if the store contains no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
