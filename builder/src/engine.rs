//! Top-level builder engine: gesture handling, selection, and mutations.
//!
//! `EngineCore` wires the catalog, the instance store, selection state, and
//! the drag state machine together. All mutations happen synchronously on
//! the host's UI thread in response to discrete gesture events; each
//! committed mutation is applied to the local store immediately, recorded in
//! the sync ledger, and returned to the host as an [`Action`] to persist.
//! Exactly one action is emitted per committed gesture.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde_json::Map;
use uuid::Uuid;

use crate::catalog::{Catalog, ComponentDefinition, DefinitionId};
use crate::consts::DRAG_THRESHOLD_PX;
use crate::doc::{ComponentInstance, InstanceId, PageDoc, PageId, PartialComponentInstance, TreeError};
use crate::input::{DragPayload, DragState, DropTarget, HoverFeedback, Point, UiState};
use crate::render::{UiNode, render_page};
use crate::sync::{MutationKind, SyncTracker};

/// Actions returned from engine calls for the host to persist. Each action
/// maps to a single backend call.
#[derive(Debug, Clone)]
pub enum Action {
    /// A new instance was created from a catalog drop.
    InstanceCreated(ComponentInstance),
    /// An instance's fields were patched.
    InstanceUpdated {
        id: InstanceId,
        fields: PartialComponentInstance,
    },
    /// One drag commit changed these placements; persisted as one batch.
    InstancesMoved { updates: Vec<MovedInstance> },
    /// An instance and its subtree were deleted.
    InstancesDeleted { ids: Vec<InstanceId> },
}

/// One placement change inside an [`Action::InstancesMoved`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedInstance {
    pub id: InstanceId,
    pub parent_id: Option<InstanceId>,
    pub order_index: i32,
}

/// Error raised by explicit engine operations (property edits, deletes).
///
/// Drag commits never surface these: an invalid drop cancels the gesture
/// and leaves the tree unchanged (the visual snap-back), because a bad drop
/// is a user action, not a programming error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The referenced instance does not exist; indicates stale caller state.
    #[error("unknown instance: {0}")]
    UnknownInstance(InstanceId),
    /// The referenced catalog definition does not exist.
    #[error("missing definition: {0}")]
    MissingDefinition(DefinitionId),
    /// A re-parent was rejected by the cycle check.
    #[error("invalid move: {id} cannot be placed under {new_parent}")]
    InvalidMove {
        id: InstanceId,
        new_parent: InstanceId,
    },
}

impl From<TreeError> for EngineError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::UnknownInstance(id) => Self::UnknownInstance(id),
            TreeError::WouldCycle { id, new_parent } => Self::InvalidMove { id, new_parent },
        }
    }
}

/// Core engine state for one page-editing session.
pub struct EngineCore {
    pub catalog: Catalog,
    pub doc: PageDoc,
    pub ui: UiState,
    pub drag: DragState,
    pub sync: SyncTracker,
}

impl EngineCore {
    /// Create an engine for editing `page_id` with an empty catalog.
    #[must_use]
    pub fn new(page_id: PageId) -> Self {
        Self {
            catalog: Catalog::new(),
            doc: PageDoc::new(page_id),
            ui: UiState::default(),
            drag: DragState::Idle,
            sync: SyncTracker::new(),
        }
    }

    // --- Data inputs ---

    /// Replace the cached catalog with a fetched definition list.
    pub fn load_catalog(&mut self, definitions: Vec<ComponentDefinition>) {
        self.catalog.load(definitions);
    }

    /// Hydrate the page from a server snapshot. Clears a selection that no
    /// longer resolves.
    pub fn load_snapshot(&mut self, instances: Vec<ComponentInstance>) {
        self.doc.load_snapshot(instances);
        if let Some(selected) = self.ui.selected_id {
            if !self.doc.contains(&selected) {
                self.ui.selected_id = None;
            }
        }
    }

    /// Replace local state with a re-fetched server snapshot after a failed
    /// persistence call. Cancels any in-flight gesture and clears the
    /// pending-mutation ledger.
    pub fn reconcile(&mut self, instances: Vec<ComponentInstance>) {
        self.drag = DragState::Idle;
        self.load_snapshot(instances);
        self.sync.clear();
    }

    /// Apply a server-acknowledged create.
    pub fn apply_create(&mut self, instance: ComponentInstance) {
        self.doc.insert(instance);
    }

    /// Apply a server-acknowledged update.
    pub fn apply_update(&mut self, id: &InstanceId, fields: &PartialComponentInstance) {
        self.doc.apply_partial(id, fields);
    }

    /// Apply a server-acknowledged delete. Clears the selection if it
    /// pointed at the deleted instance.
    pub fn apply_delete(&mut self, id: &InstanceId) {
        self.doc.remove(id);
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
        }
    }

    // --- Selection ---

    /// Select the clicked node. Clicking always selects exactly the clicked
    /// instance, never an ancestor; a stale id clears the selection.
    pub fn on_node_clicked(&mut self, id: InstanceId) {
        self.ui.selected_id = if self.doc.contains(&id) { Some(id) } else { None };
    }

    /// Empty-canvas click: clear the selection.
    pub fn on_canvas_clicked(&mut self) {
        self.ui.selected_id = None;
    }

    /// The currently selected instance, if any.
    #[must_use]
    pub fn selection(&self) -> Option<InstanceId> {
        self.ui.selected_id
    }

    // --- Drag gesture (capability interface for the pointer backend) ---

    /// Pointer-down on a draggable source. Ignored while a gesture is
    /// already active; only one drag is tracked at a time.
    pub fn on_drag_pointer_down(&mut self, payload: DragPayload, at: Point) {
        if matches!(self.drag, DragState::Idle) {
            self.drag = DragState::Pending { payload, origin: at };
        }
    }

    /// Pointer movement during a gesture. Promotes a pending press to a
    /// drag once it travels past the threshold, and reports hover feedback
    /// for the target currently under the pointer.
    pub fn on_drag_pointer_move(&mut self, at: Point, over: Option<&DropTarget>) -> Option<HoverFeedback> {
        match self.drag {
            DragState::Idle => None,
            DragState::Pending { payload, origin } => {
                if origin.distance_to(at) <= DRAG_THRESHOLD_PX {
                    return None;
                }
                self.drag = DragState::Dragging { payload, last: at };
                self.hover_feedback(payload, over)
            }
            DragState::Dragging { payload, .. } => {
                self.drag = DragState::Dragging { payload, last: at };
                self.hover_feedback(payload, over)
            }
        }
    }

    /// Pointer-up. Commits the drag if it is over an accepting target,
    /// otherwise cancels with the tree unchanged. A press that never
    /// crossed the drag threshold resolves as a click (no actions).
    pub fn on_drop(&mut self, over: Option<&DropTarget>) -> Vec<Action> {
        let state = std::mem::replace(&mut self.drag, DragState::Idle);
        let DragState::Dragging { payload, .. } = state else {
            return Vec::new();
        };
        let Some(target) = over else {
            return Vec::new();
        };
        if !target.accepts(payload) {
            return Vec::new();
        }

        match payload {
            DragPayload::CatalogDefinition(definition_id) => self.commit_create(definition_id, target),
            DragPayload::Instance(id) => self.commit_move(id, target),
        }
    }

    /// Explicit cancel (e.g. escape). The tree is left unchanged.
    pub fn on_drag_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    fn hover_feedback(&self, payload: DragPayload, over: Option<&DropTarget>) -> Option<HoverFeedback> {
        over.map(|target| {
            if target.accepts(payload) {
                HoverFeedback::CanAccept
            } else {
                HoverFeedback::CannotAccept
            }
        })
    }

    fn commit_create(&mut self, definition_id: DefinitionId, target: &DropTarget) -> Vec<Action> {
        // A bad drop is a user gesture, not a caller bug: cancel silently.
        match self.add_instance(definition_id, target.parent_id) {
            Ok((_, action)) => vec![action],
            Err(_) => Vec::new(),
        }
    }

    /// Place a new instance of a catalog definition under `parent` (or at
    /// the page root), appended after the current last sibling with all
    /// defaults applying. This is the non-gesture insertion path (e.g.
    /// activating a catalog entry from the keyboard).
    ///
    /// # Errors
    ///
    /// `MissingDefinition` if the definition isn't in the catalog;
    /// `UnknownInstance` if `parent` doesn't resolve.
    pub fn add_instance(
        &mut self,
        definition_id: DefinitionId,
        parent: Option<InstanceId>,
    ) -> Result<(ComponentInstance, Action), EngineError> {
        if self.catalog.get(&definition_id).is_none() {
            return Err(EngineError::MissingDefinition(definition_id));
        }
        if let Some(parent_id) = parent {
            if !self.doc.contains(&parent_id) {
                return Err(EngineError::UnknownInstance(parent_id));
            }
        }

        let instance = ComponentInstance {
            id: Uuid::new_v4(),
            page_id: self.doc.page_id(),
            definition_id,
            parent_id: parent,
            order_index: self.doc.next_order_index(parent),
            props: serde_json::json!({}),
            version: 1,
        };
        let created = instance.clone();
        self.doc.insert(instance);
        self.sync.record(MutationKind::Create(created.id));
        Ok((created.clone(), Action::InstanceCreated(created)))
    }

    fn commit_move(&mut self, id: InstanceId, target: &DropTarget) -> Vec<Action> {
        // Append after the target's current last sibling.
        let index = self.doc.children_of(target.parent_id).len();
        let Ok(changed) = self.doc.move_instance(id, target.parent_id, index) else {
            // Cycle or stale reference: snap back, tree unchanged.
            return Vec::new();
        };

        let updates: Vec<MovedInstance> = changed
            .iter()
            .filter_map(|(changed_id, order_index)| {
                self.doc.get(changed_id).map(|instance| MovedInstance {
                    id: *changed_id,
                    parent_id: instance.parent_id,
                    order_index: *order_index,
                })
            })
            .collect();
        self.sync
            .record(MutationKind::Move(updates.iter().map(|u| u.id).collect()));
        vec![Action::InstancesMoved { updates }]
    }

    // --- Property panel ---

    /// Shallow-merge `patch` into one instance's property overrides.
    /// Null values delete keys. Bumps the instance's version counter.
    /// Returns the updated instance and the single persistence action for
    /// the edit.
    ///
    /// # Errors
    ///
    /// `UnknownInstance` if `id` does not resolve; a property edit against
    /// a missing instance indicates stale caller state, not a user action.
    pub fn update_instance_props(
        &mut self,
        id: InstanceId,
        patch: Map<String, serde_json::Value>,
    ) -> Result<(ComponentInstance, Action), EngineError> {
        let next_version = self
            .doc
            .get(&id)
            .ok_or(EngineError::UnknownInstance(id))?
            .version
            .saturating_add(1);

        let fields = PartialComponentInstance {
            props: Some(serde_json::Value::Object(patch)),
            version: Some(next_version),
            ..Default::default()
        };
        self.doc.apply_partial(&id, &fields);
        self.sync.record(MutationKind::Update(id));

        let updated = self
            .doc
            .get(&id)
            .cloned()
            .ok_or(EngineError::UnknownInstance(id))?;
        let action = Action::InstanceUpdated { id, fields };
        Ok((updated, action))
    }

    // --- Deletion ---

    /// Delete an instance and its entire subtree (cascade policy: a
    /// container takes its children with it). Clears the selection if it
    /// pointed into the removed subtree.
    ///
    /// # Errors
    ///
    /// `UnknownInstance` if `id` does not resolve.
    pub fn delete_instance(&mut self, id: InstanceId) -> Result<Action, EngineError> {
        if !self.doc.contains(&id) {
            return Err(EngineError::UnknownInstance(id));
        }
        let removed = self.doc.remove_subtree(id);
        let ids: Vec<InstanceId> = removed.iter().map(|instance| instance.id).collect();
        if let Some(selected) = self.ui.selected_id {
            if ids.contains(&selected) {
                self.ui.selected_id = None;
            }
        }
        self.sync.record(MutationKind::Delete(ids.clone()));
        Ok(Action::InstancesDeleted { ids })
    }

    // --- Render ---

    /// Render the current page state into the abstract UI-node tree.
    #[must_use]
    pub fn render(&self) -> Vec<UiNode> {
        render_page(&self.catalog, &self.doc, &self.ui)
    }

    // --- Queries ---

    /// Look up an instance by id.
    #[must_use]
    pub fn instance(&self, id: &InstanceId) -> Option<&ComponentInstance> {
        self.doc.get(id)
    }

    /// Ids rendered as roots whose stored parent no longer resolves.
    #[must_use]
    pub fn dangling_ids(&self) -> Vec<InstanceId> {
        self.doc.dangling_ids()
    }
}
