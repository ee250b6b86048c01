//! Input model: drag payloads, drop targets, and the gesture state machine.
//!
//! This module defines the types consumed by the engine's drag controller.
//! `DragPayload` identifies what is being dragged (a catalog entry or an
//! existing instance) and `DropTarget` is what a droppable container
//! advertises. `DragState` is the active gesture tracked between
//! pointer-down and drop, carrying the context needed to commit or cancel
//! on release. The engine exposes the four gesture hooks
//! (`on_drag_pointer_down`, `on_drag_pointer_move`, `on_drop`,
//! `on_drag_cancel`) so any pointer backend — DOM events, a platform drag
//! API, or a test harness — can drive the same tree-mutation logic.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::catalog::DefinitionId;
use crate::doc::InstanceId;

/// A 2D point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Wire-level payload kind tags carried by a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadKind {
    /// A catalog entry; dropping it creates a new instance.
    CatalogDefinition,
    /// An existing instance; dropping it re-parents/reorders it.
    Instance,
}

impl PayloadKind {
    /// The wire string for this kind (`"catalog-definition"` or
    /// `"instance"`), as matched against a target's accept list.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CatalogDefinition => "catalog-definition",
            Self::Instance => "instance",
        }
    }
}

/// What is being dragged: `{kind, refId}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "refId", rename_all = "kebab-case")]
pub enum DragPayload {
    /// A catalog definition being dragged from the catalog panel.
    CatalogDefinition(DefinitionId),
    /// An existing instance being dragged on the canvas.
    Instance(InstanceId),
}

impl DragPayload {
    /// The payload's kind tag.
    #[must_use]
    pub fn kind(self) -> PayloadKind {
        match self {
            Self::CatalogDefinition(_) => PayloadKind::CatalogDefinition,
            Self::Instance(_) => PayloadKind::Instance,
        }
    }
}

/// What a droppable container advertises: `{acceptKinds, parentId}`.
///
/// `parent_id = None` is the canvas root. A target accepts a payload only
/// if the payload's kind string is in `accept_kinds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    /// Payload kind strings this target accepts.
    pub accept_kinds: Vec<String>,
    /// Container instance to drop into, or `None` for the page root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<InstanceId>,
}

impl DropTarget {
    /// A root-canvas target accepting both payload kinds.
    #[must_use]
    pub fn canvas_root() -> Self {
        Self {
            accept_kinds: vec![
                PayloadKind::CatalogDefinition.as_str().to_owned(),
                PayloadKind::Instance.as_str().to_owned(),
            ],
            parent_id: None,
        }
    }

    /// A container target accepting both payload kinds.
    #[must_use]
    pub fn container(parent_id: InstanceId) -> Self {
        Self {
            accept_kinds: vec![
                PayloadKind::CatalogDefinition.as_str().to_owned(),
                PayloadKind::Instance.as_str().to_owned(),
            ],
            parent_id: Some(parent_id),
        }
    }

    /// Whether this target accepts `payload`'s kind.
    #[must_use]
    pub fn accepts(&self, payload: DragPayload) -> bool {
        self.accept_kinds
            .iter()
            .any(|kind| kind == payload.kind().as_str())
    }
}

/// Hover feedback for the target currently under the pointer. Hosts render
/// both states so a rejecting target is visibly different from no target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverFeedback {
    /// The target accepts the current payload; highlight it.
    CanAccept,
    /// The target rejects the current payload; show the rejection state.
    CannotAccept,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// The id of the currently selected instance, if any.
    pub selected_id: Option<InstanceId>,
}

/// Internal state for the drag gesture state machine.
///
/// Only one gesture is tracked at a time; a pointer-down while not `Idle`
/// is ignored until the active gesture resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// Pointer is down on a draggable source but has not moved past the
    /// drag threshold; releasing here is a click, not a drop.
    Pending {
        /// What would be dragged if the threshold is crossed.
        payload: DragPayload,
        /// Screen position of the initiating pointer-down.
        origin: Point,
    },
    /// An active drag; the payload follows the pointer.
    Dragging {
        /// What is being dragged.
        payload: DragPayload,
        /// Screen position of the most recent pointer event.
        last: Point,
    },
}

impl Default for DragState {
    fn default() -> Self {
        Self::Idle
    }
}
