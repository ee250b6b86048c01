//! Component catalog: the read-only registry of reusable definitions.
//!
//! Definitions describe what can be placed on a page (kind, default
//! properties, editor schema) and are fetched once per session from the
//! server. The builder never mutates them; instances reference a definition
//! by id and resolve it through [`Catalog::get`] at render time.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a component definition.
pub type DefinitionId = Uuid;

/// The kind of component a definition describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// Static text block.
    Text,
    /// Clickable button.
    Button,
    /// Image with source and alt text.
    Image,
    /// Container that nests child instances.
    Layout,
    /// Form input field.
    Form,
    /// Navigation bar with link items.
    Navigation,
    /// User-defined component with an open-ended property bag.
    Custom,
}

impl ComponentType {
    /// The lowercase tag used on the wire and in storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Button => "button",
            Self::Image => "image",
            Self::Layout => "layout",
            Self::Form => "form",
            Self::Navigation => "navigation",
            Self::Custom => "custom",
        }
    }

    /// Parse a lowercase tag. Returns `None` for unknown tags so callers
    /// can decide how to degrade (e.g. fall back to [`ComponentType::Custom`]).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "button" => Some(Self::Button),
            "image" => Some(Self::Image),
            "layout" => Some(Self::Layout),
            "form" => Some(Self::Form),
            "navigation" => Some(Self::Navigation),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// A catalog entry as stored on the server and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDefinition {
    /// Unique identifier for this definition.
    pub id: DefinitionId,
    /// Display name shown in the catalog panel.
    pub name: String,
    /// Component kind; drives renderer dispatch.
    pub component_type: ComponentType,
    /// Catalog grouping key (e.g. `"basic"`, `"layout"`, `"form"`).
    pub category: String,
    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property defaults applied beneath every instance's overrides.
    pub default_props: serde_json::Value,
    /// Property-editor schema (titles, enums, required keys).
    pub prop_schema: serde_json::Value,
    /// Owning project for project-scoped definitions. `None` for global ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    /// Whether the definition is available to all projects.
    pub is_global: bool,
    /// Whether the definition is visible in the catalog panel.
    pub is_published: bool,
}

/// Server-side list filter: `{project_id?, is_global?}`.
///
/// Both fields are conjunctive; an unset field matches everything.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DefinitionFilter {
    /// Keep only definitions owned by this project (plus none-owned globals
    /// when combined with `is_global`).
    pub project_id: Option<Uuid>,
    /// Keep only definitions with this `is_global` flag.
    pub is_global: Option<bool>,
}

impl DefinitionFilter {
    /// Whether `def` passes this filter.
    #[must_use]
    pub fn matches(&self, def: &ComponentDefinition) -> bool {
        if let Some(project_id) = self.project_id {
            if def.project_id != Some(project_id) {
                return false;
            }
        }
        if let Some(is_global) = self.is_global {
            if def.is_global != is_global {
                return false;
            }
        }
        true
    }
}

/// In-memory definition registry, cached once per editing session.
pub struct Catalog {
    definitions: HashMap<DefinitionId, ComponentDefinition>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self { definitions: HashMap::new() }
    }

    /// Replace all definitions with a fetched list.
    pub fn load(&mut self, definitions: Vec<ComponentDefinition>) {
        self.definitions.clear();
        for def in definitions {
            self.definitions.insert(def.id, def);
        }
    }

    /// Insert or replace a single definition.
    pub fn insert(&mut self, def: ComponentDefinition) {
        self.definitions.insert(def.id, def);
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: &DefinitionId) -> Option<&ComponentDefinition> {
        self.definitions.get(id)
    }

    /// All definitions sorted by `(category, name, id)` for stable display.
    #[must_use]
    pub fn definitions(&self) -> Vec<&ComponentDefinition> {
        let mut defs: Vec<&ComponentDefinition> = self.definitions.values().collect();
        defs.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        defs
    }

    /// Definitions passing `filter`, sorted as [`Catalog::definitions`].
    #[must_use]
    pub fn filtered(&self, filter: &DefinitionFilter) -> Vec<&ComponentDefinition> {
        self.definitions()
            .into_iter()
            .filter(|def| filter.matches(def))
            .collect()
    }

    /// Pure derived view: definitions grouped by category, recomputed per
    /// call. Entries within a category are sorted by `(name, id)`.
    #[must_use]
    pub fn by_category(&self) -> BTreeMap<String, Vec<&ComponentDefinition>> {
        let mut groups: BTreeMap<String, Vec<&ComponentDefinition>> = BTreeMap::new();
        for def in self.definitions.values() {
            groups.entry(def.category.clone()).or_default().push(def);
        }
        for defs in groups.values_mut() {
            defs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        }
        groups
    }

    /// Number of definitions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the catalog holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
