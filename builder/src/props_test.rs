use serde_json::json;

use super::*;

// =============================================================
// effective_props merge
// =============================================================

#[test]
fn merge_override_wins_key_by_key() {
    let defaults = json!({"content": "default", "color": "#000000"});
    let overrides = json!({"content": "custom"});
    let merged = effective_props(&defaults, &overrides);
    assert_eq!(merged["content"], "custom");
    assert_eq!(merged["color"], "#000000");
}

#[test]
fn merge_keys_only_in_overrides_are_kept() {
    let defaults = json!({"content": "default"});
    let overrides = json!({"alignment": "center"});
    let merged = effective_props(&defaults, &overrides);
    assert_eq!(merged["content"], "default");
    assert_eq!(merged["alignment"], "center");
}

#[test]
fn merge_is_idempotent() {
    let defaults = json!({"content": "default", "fontSize": "md"});
    let overrides = json!({"content": "custom", "color": "#fff"});
    let once = effective_props(&defaults, &overrides);
    let twice = effective_props(&once, &overrides);
    assert_eq!(once, twice);
}

#[test]
fn merge_empty_overrides_yields_defaults() {
    let defaults = json!({"content": "default"});
    let merged = effective_props(&defaults, &json!({}));
    assert_eq!(merged, defaults);
}

#[test]
fn merge_non_object_defaults_treated_as_empty() {
    let merged = effective_props(&json!(null), &json!({"content": "x"}));
    assert_eq!(merged, json!({"content": "x"}));
}

#[test]
fn merge_non_object_overrides_treated_as_empty() {
    let defaults = json!({"content": "default"});
    let merged = effective_props(&defaults, &json!(7));
    assert_eq!(merged, defaults);
}

#[test]
fn merge_null_override_replaces_default_value() {
    // An explicit null override wins like any other override value.
    let defaults = json!({"color": "#000000"});
    let merged = effective_props(&defaults, &json!({"color": null}));
    assert!(merged["color"].is_null());
}

// =============================================================
// Keyword enums
// =============================================================

#[test]
fn enums_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&TextAlign::Center).unwrap(), "\"center\"");
    assert_eq!(serde_json::to_string(&FontSize::Xl).unwrap(), "\"xl\"");
    assert_eq!(serde_json::to_string(&ButtonVariant::Outline).unwrap(), "\"outline\"");
    assert_eq!(serde_json::to_string(&ControlSize::Lg).unwrap(), "\"lg\"");
    assert_eq!(serde_json::to_string(&InputType::Password).unwrap(), "\"password\"");
    assert_eq!(serde_json::to_string(&FlexDirection::Row).unwrap(), "\"row\"");
}

#[test]
fn enum_defaults() {
    assert_eq!(TextAlign::default(), TextAlign::Left);
    assert_eq!(FontSize::default(), FontSize::Md);
    assert_eq!(ButtonVariant::default(), ButtonVariant::Primary);
    assert_eq!(ControlSize::default(), ControlSize::Md);
    assert_eq!(InputType::default(), InputType::Text);
    assert_eq!(FlexDirection::default(), FlexDirection::Column);
}

// =============================================================
// Props: text accessors
// =============================================================

#[test]
fn props_text_defaults_on_empty_object() {
    let value = json!({});
    let p = Props::new(&value);
    assert_eq!(p.content(), "");
    assert_eq!(p.alignment(), TextAlign::Left);
    assert_eq!(p.color(), "#000000");
    assert_eq!(p.font_size(), FontSize::Md);
}

#[test]
fn props_text_reads_all_values() {
    let value = json!({
        "content": "Hello",
        "alignment": "right",
        "color": "#AABBCC",
        "fontSize": "xl"
    });
    let p = Props::new(&value);
    assert_eq!(p.content(), "Hello");
    assert_eq!(p.alignment(), TextAlign::Right);
    assert_eq!(p.color(), "#AABBCC");
    assert_eq!(p.font_size(), FontSize::Xl);
}

#[test]
fn props_unrecognized_keywords_fall_back_to_defaults() {
    let value = json!({"alignment": "justify", "fontSize": "huge", "variant": "ghost"});
    let p = Props::new(&value);
    assert_eq!(p.alignment(), TextAlign::Left);
    assert_eq!(p.font_size(), FontSize::Md);
    assert_eq!(p.variant(), ButtonVariant::Primary);
}

#[test]
fn props_wrong_type_uses_default() {
    let value = json!({"content": 42, "color": false, "required": "yes"});
    let p = Props::new(&value);
    assert_eq!(p.content(), "");
    assert_eq!(p.color(), "#000000");
    assert!(!p.required());
}

// =============================================================
// Props: button accessors
// =============================================================

#[test]
fn props_button_reads_values() {
    let value = json!({"text": "Submit", "variant": "secondary", "size": "lg"});
    let p = Props::new(&value);
    assert_eq!(p.text(), "Submit");
    assert_eq!(p.variant(), ButtonVariant::Secondary);
    assert_eq!(p.control_size(), ControlSize::Lg);
}

// =============================================================
// Props: image accessors
// =============================================================

#[test]
fn props_image_src_placeholder_when_absent() {
    let value = json!({});
    let p = Props::new(&value);
    assert_eq!(p.src(), crate::consts::PLACEHOLDER_IMAGE_SRC);
}

#[test]
fn props_image_src_placeholder_when_empty() {
    let value = json!({"src": ""});
    let p = Props::new(&value);
    assert_eq!(p.src(), crate::consts::PLACEHOLDER_IMAGE_SRC);
}

#[test]
fn props_image_reads_values() {
    let value = json!({"src": "https://example.com/a.png", "alt": "A", "width": "300px", "height": "200px"});
    let p = Props::new(&value);
    assert_eq!(p.src(), "https://example.com/a.png");
    assert_eq!(p.alt(), "A");
    assert_eq!(p.width(), Some("300px"));
    assert_eq!(p.height(), Some("200px"));
}

#[test]
fn props_image_dimensions_absent_are_none() {
    let value = json!({});
    let p = Props::new(&value);
    assert_eq!(p.width(), None);
    assert_eq!(p.height(), None);
}

// =============================================================
// Props: layout accessors
// =============================================================

#[test]
fn props_layout_defaults() {
    let value = json!({});
    let p = Props::new(&value);
    assert_eq!(p.padding(), "16px");
    assert_eq!(p.background_color(), "transparent");
    assert_eq!(p.flex_direction(), FlexDirection::Column);
}

#[test]
fn props_layout_reads_values() {
    let value = json!({"padding": "8px", "backgroundColor": "#f0f0f0", "flexDirection": "row"});
    let p = Props::new(&value);
    assert_eq!(p.padding(), "8px");
    assert_eq!(p.background_color(), "#f0f0f0");
    assert_eq!(p.flex_direction(), FlexDirection::Row);
}

// =============================================================
// Props: form accessors
// =============================================================

#[test]
fn props_field_defaults() {
    let value = json!({});
    let p = Props::new(&value);
    assert_eq!(p.label(), "");
    assert_eq!(p.placeholder(), "");
    assert_eq!(p.input_type(), InputType::Text);
    assert!(!p.required());
}

#[test]
fn props_field_reads_values() {
    let value = json!({"label": "Email", "placeholder": "you@example.com", "type": "email", "required": true});
    let p = Props::new(&value);
    assert_eq!(p.label(), "Email");
    assert_eq!(p.placeholder(), "you@example.com");
    assert_eq!(p.input_type(), InputType::Email);
    assert!(p.required());
}

// =============================================================
// Props: navigation accessors
// =============================================================

#[test]
fn props_items_reads_string_array() {
    let value = json!({"items": ["Home", "About", "Contact"]});
    let p = Props::new(&value);
    assert_eq!(p.items(), vec!["Home", "About", "Contact"]);
}

#[test]
fn props_items_skips_non_strings() {
    let value = json!({"items": ["Home", 42, null, "About"]});
    let p = Props::new(&value);
    assert_eq!(p.items(), vec!["Home", "About"]);
}

#[test]
fn props_items_absent_is_empty() {
    let value = json!({});
    let p = Props::new(&value);
    assert!(p.items().is_empty());
}
