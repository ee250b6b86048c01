use serde_json::json;
use uuid::Uuid;

use super::*;

fn uid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn make_def(name: &str, component_type: ComponentType, category: &str) -> ComponentDefinition {
    ComponentDefinition {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        component_type,
        category: category.to_owned(),
        description: None,
        default_props: json!({}),
        prop_schema: json!({}),
        project_id: None,
        is_global: true,
        is_published: true,
    }
}

// =============================================================
// ComponentType serde
// =============================================================

#[test]
fn component_type_serde_all_variants() {
    let cases = [
        (ComponentType::Text, "\"text\""),
        (ComponentType::Button, "\"button\""),
        (ComponentType::Image, "\"image\""),
        (ComponentType::Layout, "\"layout\""),
        (ComponentType::Form, "\"form\""),
        (ComponentType::Navigation, "\"navigation\""),
        (ComponentType::Custom, "\"custom\""),
    ];
    for (component_type, expected) in cases {
        assert_eq!(serde_json::to_string(&component_type).unwrap(), expected);
        let back: ComponentType = serde_json::from_str(expected).unwrap();
        assert_eq!(back, component_type);
    }
}

#[test]
fn component_type_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<ComponentType>("\"carousel\"").is_err());
}

#[test]
fn component_type_as_str_parse_roundtrip() {
    for component_type in [
        ComponentType::Text,
        ComponentType::Button,
        ComponentType::Image,
        ComponentType::Layout,
        ComponentType::Form,
        ComponentType::Navigation,
        ComponentType::Custom,
    ] {
        assert_eq!(ComponentType::parse(component_type.as_str()), Some(component_type));
    }
}

#[test]
fn component_type_parse_unknown_is_none() {
    assert_eq!(ComponentType::parse("carousel"), None);
    assert_eq!(ComponentType::parse("Text"), None);
}

// =============================================================
// ComponentDefinition serde
// =============================================================

#[test]
fn definition_serde_roundtrip() {
    let def = ComponentDefinition {
        id: uid(1),
        name: "Text Block".to_owned(),
        component_type: ComponentType::Text,
        category: "basic".to_owned(),
        description: Some("A simple text block".to_owned()),
        default_props: json!({"content": "Enter your text here", "fontSize": "md"}),
        prop_schema: json!({"properties": {"content": {"type": "string"}}}),
        project_id: Some(uid(2)),
        is_global: false,
        is_published: true,
    };
    let serialized = serde_json::to_string(&def).unwrap();
    let back: ComponentDefinition = serde_json::from_str(&serialized).unwrap();
    assert_eq!(back.id, def.id);
    assert_eq!(back.name, def.name);
    assert_eq!(back.component_type, def.component_type);
    assert_eq!(back.category, def.category);
    assert_eq!(back.description, def.description);
    assert_eq!(back.default_props, def.default_props);
    assert_eq!(back.prop_schema, def.prop_schema);
    assert_eq!(back.project_id, def.project_id);
    assert_eq!(back.is_global, def.is_global);
    assert_eq!(back.is_published, def.is_published);
}

#[test]
fn definition_serde_skips_absent_optionals() {
    let def = make_def("Button", ComponentType::Button, "basic");
    let serialized = serde_json::to_string(&def).unwrap();
    assert!(!serialized.contains("\"description\""));
    assert!(!serialized.contains("\"project_id\""));
}

#[test]
fn definition_kind_serializes_lowercase() {
    let def = make_def("Nav", ComponentType::Navigation, "layout");
    let serialized = serde_json::to_string(&def).unwrap();
    assert!(serialized.contains("\"navigation\""));
    assert!(!serialized.contains("\"Navigation\""));
}

// =============================================================
// DefinitionFilter
// =============================================================

#[test]
fn filter_default_matches_everything() {
    let filter = DefinitionFilter::default();
    assert!(filter.matches(&make_def("A", ComponentType::Text, "basic")));
}

#[test]
fn filter_by_project_id() {
    let project = uid(10);
    let filter = DefinitionFilter { project_id: Some(project), is_global: None };

    let mut scoped = make_def("Scoped", ComponentType::Text, "basic");
    scoped.project_id = Some(project);
    scoped.is_global = false;
    assert!(filter.matches(&scoped));

    let global = make_def("Global", ComponentType::Text, "basic");
    assert!(!filter.matches(&global));
}

#[test]
fn filter_by_is_global() {
    let filter = DefinitionFilter { project_id: None, is_global: Some(true) };
    assert!(filter.matches(&make_def("Global", ComponentType::Text, "basic")));

    let mut scoped = make_def("Scoped", ComponentType::Text, "basic");
    scoped.is_global = false;
    assert!(!filter.matches(&scoped));
}

#[test]
fn filter_fields_are_conjunctive() {
    let project = uid(10);
    let filter = DefinitionFilter { project_id: Some(project), is_global: Some(false) };

    let mut both = make_def("Both", ComponentType::Text, "basic");
    both.project_id = Some(project);
    both.is_global = false;
    assert!(filter.matches(&both));

    let mut wrong_flag = make_def("WrongFlag", ComponentType::Text, "basic");
    wrong_flag.project_id = Some(project);
    wrong_flag.is_global = true;
    assert!(!filter.matches(&wrong_flag));
}

// =============================================================
// Catalog
// =============================================================

#[test]
fn catalog_new_is_empty() {
    let catalog = Catalog::new();
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
}

#[test]
fn catalog_load_replaces_existing() {
    let mut catalog = Catalog::new();
    let old = make_def("Old", ComponentType::Text, "basic");
    let old_id = old.id;
    catalog.insert(old);

    let new = make_def("New", ComponentType::Button, "basic");
    let new_id = new.id;
    catalog.load(vec![new]);

    assert_eq!(catalog.len(), 1);
    assert!(catalog.get(&old_id).is_none());
    assert!(catalog.get(&new_id).is_some());
}

#[test]
fn catalog_insert_overwrites_same_id() {
    let mut catalog = Catalog::new();
    let id = uid(1);
    let mut def = make_def("First", ComponentType::Text, "basic");
    def.id = id;
    catalog.insert(def);
    let mut replacement = make_def("Second", ComponentType::Text, "basic");
    replacement.id = id;
    catalog.insert(replacement);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(&id).unwrap().name, "Second");
}

#[test]
fn catalog_definitions_sorted_by_category_then_name() {
    let mut catalog = Catalog::new();
    catalog.insert(make_def("Zeta", ComponentType::Text, "basic"));
    catalog.insert(make_def("Alpha", ComponentType::Text, "basic"));
    catalog.insert(make_def("Container", ComponentType::Layout, "layout"));
    catalog.insert(make_def("Input", ComponentType::Form, "form"));

    let names: Vec<&str> = catalog.definitions().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta", "Input", "Container"]);
}

#[test]
fn catalog_filtered_applies_filter() {
    let mut catalog = Catalog::new();
    let project = uid(10);
    let mut scoped = make_def("Scoped", ComponentType::Text, "basic");
    scoped.project_id = Some(project);
    scoped.is_global = false;
    catalog.insert(scoped);
    catalog.insert(make_def("Global", ComponentType::Text, "basic"));

    let filter = DefinitionFilter { project_id: Some(project), is_global: None };
    let filtered = catalog.filtered(&filter);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Scoped");
}

#[test]
fn catalog_by_category_groups_and_sorts() {
    let mut catalog = Catalog::new();
    catalog.insert(make_def("Zeta", ComponentType::Text, "basic"));
    catalog.insert(make_def("Alpha", ComponentType::Button, "basic"));
    catalog.insert(make_def("Container", ComponentType::Layout, "layout"));

    let groups = catalog.by_category();
    assert_eq!(groups.len(), 2);
    let basic: Vec<&str> = groups["basic"].iter().map(|d| d.name.as_str()).collect();
    assert_eq!(basic, vec!["Alpha", "Zeta"]);
    assert_eq!(groups["layout"].len(), 1);
}

#[test]
fn catalog_by_category_recomputes_after_load() {
    let mut catalog = Catalog::new();
    catalog.insert(make_def("A", ComponentType::Text, "basic"));
    assert_eq!(catalog.by_category().len(), 1);

    catalog.load(vec![
        make_def("B", ComponentType::Text, "media"),
        make_def("C", ComponentType::Text, "form"),
    ]);
    let groups = catalog.by_category();
    assert!(!groups.contains_key("basic"));
    assert!(groups.contains_key("media"));
    assert!(groups.contains_key("form"));
}
