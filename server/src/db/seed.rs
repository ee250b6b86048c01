//! Default catalog seeding.
//!
//! On a fresh database the catalog panel would be empty, so startup inserts
//! a small set of published global definitions when no global definition
//! exists yet. Rerunning is a no-op.

use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use builder::catalog::ComponentType;

struct SeedDefinition {
    name: &'static str,
    component_type: ComponentType,
    category: &'static str,
    description: &'static str,
    prop_schema: serde_json::Value,
    default_props: serde_json::Value,
}

fn default_definitions() -> Vec<SeedDefinition> {
    vec![
        SeedDefinition {
            name: "Text Block",
            component_type: ComponentType::Text,
            category: "basic",
            description: "A simple text block with customizable content",
            prop_schema: json!({
                "properties": {
                    "content": {"type": "string", "title": "Content"},
                    "fontSize": {"type": "string", "title": "Font Size", "enum": ["sm", "md", "lg", "xl"]},
                    "color": {"type": "string", "title": "Text Color"},
                    "alignment": {"type": "string", "title": "Alignment", "enum": ["left", "center", "right"]}
                },
                "required": ["content"]
            }),
            default_props: json!({
                "content": "Enter your text here",
                "fontSize": "md",
                "color": "#000000",
                "alignment": "left"
            }),
        },
        SeedDefinition {
            name: "Button",
            component_type: ComponentType::Button,
            category: "basic",
            description: "Customizable button component",
            prop_schema: json!({
                "properties": {
                    "text": {"type": "string", "title": "Button Text"},
                    "variant": {"type": "string", "title": "Variant", "enum": ["primary", "secondary", "outline"]},
                    "size": {"type": "string", "title": "Size", "enum": ["sm", "md", "lg"]}
                },
                "required": ["text"]
            }),
            default_props: json!({
                "text": "Click me",
                "variant": "primary",
                "size": "md"
            }),
        },
        SeedDefinition {
            name: "Image",
            component_type: ComponentType::Image,
            category: "media",
            description: "Image component with customizable source and alt text",
            prop_schema: json!({
                "properties": {
                    "src": {"type": "string", "title": "Image URL"},
                    "alt": {"type": "string", "title": "Alt Text"},
                    "width": {"type": "string", "title": "Width"},
                    "height": {"type": "string", "title": "Height"}
                },
                "required": ["src", "alt"]
            }),
            default_props: json!({
                "src": "https://via.placeholder.com/300x200",
                "alt": "Placeholder image",
                "width": "300px",
                "height": "200px"
            }),
        },
        SeedDefinition {
            name: "Container",
            component_type: ComponentType::Layout,
            category: "layout",
            description: "Container for grouping other components",
            prop_schema: json!({
                "properties": {
                    "padding": {"type": "string", "title": "Padding"},
                    "backgroundColor": {"type": "string", "title": "Background Color"},
                    "flexDirection": {"type": "string", "title": "Flex Direction", "enum": ["row", "column"]}
                }
            }),
            default_props: json!({
                "padding": "16px",
                "backgroundColor": "transparent",
                "flexDirection": "column"
            }),
        },
        SeedDefinition {
            name: "Form Input",
            component_type: ComponentType::Form,
            category: "form",
            description: "Input field for forms",
            prop_schema: json!({
                "properties": {
                    "label": {"type": "string", "title": "Label"},
                    "placeholder": {"type": "string", "title": "Placeholder"},
                    "type": {"type": "string", "title": "Input Type", "enum": ["text", "email", "password", "number"]},
                    "required": {"type": "boolean", "title": "Required"}
                },
                "required": ["label"]
            }),
            default_props: json!({
                "label": "Input Label",
                "placeholder": "Enter value...",
                "type": "text",
                "required": false
            }),
        },
    ]
}

/// Insert the default global definitions if no global definition exists.
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn seed_definitions_if_empty(pool: &PgPool) -> Result<(), sqlx::Error> {
    let global_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM component_definitions WHERE is_global")
            .fetch_one(pool)
            .await?;
    if global_count > 0 {
        return Ok(());
    }

    let definitions = default_definitions();
    let count = definitions.len();
    for def in definitions {
        sqlx::query(
            "INSERT INTO component_definitions
                 (name, component_type, category, description, default_props, prop_schema, is_global, is_published)
             VALUES ($1, $2, $3, $4, $5, $6, TRUE, TRUE)",
        )
        .bind(def.name)
        .bind(def.component_type.as_str())
        .bind(def.category)
        .bind(def.description)
        .bind(&def.default_props)
        .bind(&def.prop_schema)
        .execute(pool)
        .await?;
    }

    info!(count, "seeded default global component definitions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_set_covers_expected_kinds() {
        let defs = default_definitions();
        assert_eq!(defs.len(), 5);
        let kinds: Vec<ComponentType> = defs.iter().map(|d| d.component_type).collect();
        assert!(kinds.contains(&ComponentType::Text));
        assert!(kinds.contains(&ComponentType::Button));
        assert!(kinds.contains(&ComponentType::Image));
        assert!(kinds.contains(&ComponentType::Layout));
        assert!(kinds.contains(&ComponentType::Form));
    }

    #[test]
    fn seed_defaults_satisfy_their_schemas() {
        for def in default_definitions() {
            let required = def.prop_schema.get("required").and_then(|r| r.as_array());
            let Some(required) = required else {
                continue;
            };
            for key in required.iter().filter_map(|k| k.as_str()) {
                assert!(
                    def.default_props.get(key).is_some(),
                    "{} is missing required default `{key}`",
                    def.name
                );
            }
        }
    }
}
