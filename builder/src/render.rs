//! Rendering: builds the abstract UI-node tree for the canvas.
//!
//! This module receives read-only views of the catalog, the instance store,
//! and the selection state, and produces a [`UiNode`] tree — it does not
//! mutate any application state. The host UI layer draws the tree with its
//! own widgets; clicking a node selects exactly that node's instance (hosts
//! stop click propagation so a nested selection never also selects the
//! ancestor container).
//!
//! Degraded modes are explicit nodes rather than hidden failures: an
//! unresolvable definition renders a [`UiNodeKind::Missing`] placeholder, a
//! childless container renders a [`UiNodeKind::DropZone`] affordance, and a
//! corrupted cyclic tree is truncated with [`UiNodeKind::Truncated`] instead
//! of recursing forever.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ComponentType, DefinitionId};
use crate::doc::{ComponentInstance, InstanceId, PageDoc};
use crate::input::UiState;
use crate::props::{
    ButtonVariant, ControlSize, FlexDirection, FontSize, InputType, Props, TextAlign, effective_props,
};

/// One node of the rendered page tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    /// The instance this node renders. `None` for synthetic affordance
    /// nodes (drop zones) that do not correspond to a placed instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<InstanceId>,
    /// Whether this node is the current selection.
    pub selected: bool,
    /// Kind-specific presentation data.
    pub kind: UiNodeKind,
    /// Rendered children, already in sibling order.
    pub children: Vec<UiNode>,
}

/// Kind-specific presentation for a rendered node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiNodeKind {
    /// Static text block.
    Text {
        content: String,
        align: TextAlign,
        color: String,
        size: FontSize,
    },
    /// Clickable button.
    Button {
        label: String,
        variant: ButtonVariant,
        size: ControlSize,
    },
    /// Image; `src` falls back to a placeholder when unconfigured.
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<String>,
    },
    /// Container; children render inside it.
    Layout {
        direction: FlexDirection,
        padding: String,
        background: String,
    },
    /// Form input field.
    Field {
        label: String,
        placeholder: String,
        input_type: InputType,
        required: bool,
    },
    /// Navigation bar with link labels.
    Navigation { items: Vec<String> },
    /// Generic fallback for custom or unrecognized component kinds.
    Custom { name: String, type_name: String },
    /// The instance references a definition the catalog no longer has.
    Missing { definition_id: DefinitionId },
    /// Affordance rendered inside an empty container so it stays a visible
    /// drop target instead of collapsing to blank space.
    DropZone { parent_id: InstanceId },
    /// Recursion guard: this instance was already rendered in this pass.
    Truncated,
}

/// Render the full page: root instances in order, recursively.
#[must_use]
pub fn render_page(catalog: &Catalog, doc: &PageDoc, ui: &UiState) -> Vec<UiNode> {
    let mut visited = HashSet::new();
    doc.children_of(None)
        .into_iter()
        .map(|instance| render_instance(catalog, doc, instance, ui, &mut visited))
        .collect()
}

/// Render one instance and, for containers, its subtree.
///
/// Never panics: missing definitions and repeated ids degrade to explicit
/// placeholder nodes.
#[must_use]
pub fn render_instance(
    catalog: &Catalog,
    doc: &PageDoc,
    instance: &ComponentInstance,
    ui: &UiState,
    visited: &mut HashSet<InstanceId>,
) -> UiNode {
    let selected = ui.selected_id == Some(instance.id);

    if !visited.insert(instance.id) {
        return UiNode {
            instance_id: Some(instance.id),
            selected,
            kind: UiNodeKind::Truncated,
            children: Vec::new(),
        };
    }

    let Some(definition) = catalog.get(&instance.definition_id) else {
        return UiNode {
            instance_id: Some(instance.id),
            selected,
            kind: UiNodeKind::Missing { definition_id: instance.definition_id },
            children: Vec::new(),
        };
    };

    let merged = effective_props(&definition.default_props, &instance.props);
    let props = Props::new(&merged);

    let (kind, children) = match definition.component_type {
        ComponentType::Text => (
            UiNodeKind::Text {
                content: props.content().to_owned(),
                align: props.alignment(),
                color: props.color().to_owned(),
                size: props.font_size(),
            },
            Vec::new(),
        ),
        ComponentType::Button => (
            UiNodeKind::Button {
                label: props.text().to_owned(),
                variant: props.variant(),
                size: props.control_size(),
            },
            Vec::new(),
        ),
        ComponentType::Image => (
            UiNodeKind::Image {
                src: props.src().to_owned(),
                alt: props.alt().to_owned(),
                width: props.width().map(str::to_owned),
                height: props.height().map(str::to_owned),
            },
            Vec::new(),
        ),
        ComponentType::Layout => {
            let rendered: Vec<UiNode> = doc
                .children_of(Some(instance.id))
                .into_iter()
                .map(|child| render_instance(catalog, doc, child, ui, visited))
                .collect();
            let children = if rendered.is_empty() {
                vec![UiNode {
                    instance_id: None,
                    selected: false,
                    kind: UiNodeKind::DropZone { parent_id: instance.id },
                    children: Vec::new(),
                }]
            } else {
                rendered
            };
            (
                UiNodeKind::Layout {
                    direction: props.flex_direction(),
                    padding: props.padding().to_owned(),
                    background: props.background_color().to_owned(),
                },
                children,
            )
        }
        ComponentType::Form => (
            UiNodeKind::Field {
                label: props.label().to_owned(),
                placeholder: props.placeholder().to_owned(),
                input_type: props.input_type(),
                required: props.required(),
            },
            Vec::new(),
        ),
        ComponentType::Navigation => (UiNodeKind::Navigation { items: props.items() }, Vec::new()),
        ComponentType::Custom => (
            UiNodeKind::Custom {
                name: definition.name.clone(),
                type_name: "custom".to_owned(),
            },
            Vec::new(),
        ),
    };

    UiNode { instance_id: Some(instance.id), selected, kind, children }
}
