//! Property merging and typed access to the open-ended `props` JSON bag.
//!
//! An instance's effective properties are its definition's `default_props`
//! shallow-merged with the instance's own overrides: the override wins
//! key-by-key, and unspecified keys fall back to the defaults. `Props`
//! wraps the merged value for typed, fallback-safe reads; the keyword enums
//! give each component kind a validated property shape instead of raw
//! strings flowing into the renderer.

#[cfg(test)]
#[path = "props_test.rs"]
mod props_test;

use serde::{Deserialize, Serialize};

use crate::consts::PLACEHOLDER_IMAGE_SRC;

/// Shallow-merge `overrides` on top of `defaults`.
///
/// Non-object inputs are treated as empty maps. The merge is idempotent:
/// merging the result with the same overrides again yields the same value.
#[must_use]
pub fn effective_props(defaults: &serde_json::Value, overrides: &serde_json::Value) -> serde_json::Value {
    let mut merged = defaults
        .as_object()
        .cloned()
        .unwrap_or_else(serde_json::Map::new);
    if let Some(incoming) = overrides.as_object() {
        for (k, v) in incoming {
            merged.insert(k.clone(), v.clone());
        }
    }
    serde_json::Value::Object(merged)
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Named font size step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl FontSize {
    fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "sm" => Some(Self::Sm),
            "md" => Some(Self::Md),
            "lg" => Some(Self::Lg),
            "xl" => Some(Self::Xl),
            _ => None,
        }
    }
}

/// Button presentation variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

impl ButtonVariant {
    fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "outline" => Some(Self::Outline),
            _ => None,
        }
    }
}

/// Control size for buttons and form fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl ControlSize {
    fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "sm" => Some(Self::Sm),
            "md" => Some(Self::Md),
            "lg" => Some(Self::Lg),
            _ => None,
        }
    }
}

/// HTML-style input type for form fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Email,
    Password,
    Number,
}

impl InputType {
    fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            "number" => Some(Self::Number),
            _ => None,
        }
    }
}

/// Main-axis direction for layout containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

impl FlexDirection {
    fn from_keyword(value: &str) -> Option<Self> {
        match value {
            "row" => Some(Self::Row),
            "column" => Some(Self::Column),
            _ => None,
        }
    }
}

/// Typed access to common props fields from a merged props JSON value.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    /// Wrap a reference to a merged props JSON value for typed access.
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Text body. Empty string when absent.
    #[must_use]
    pub fn content(&self) -> &str {
        self.str_field("content").unwrap_or("")
    }

    /// Text alignment. Defaults to [`TextAlign::Left`] on absent or
    /// unrecognized values.
    #[must_use]
    pub fn alignment(&self) -> TextAlign {
        self.str_field("alignment")
            .and_then(TextAlign::from_keyword)
            .unwrap_or_default()
    }

    /// Text color as a CSS color string. Defaults to `"#000000"`.
    #[must_use]
    pub fn color(&self) -> &str {
        self.str_field("color").unwrap_or("#000000")
    }

    /// Named font size. Defaults to [`FontSize::Md`].
    #[must_use]
    pub fn font_size(&self) -> FontSize {
        self.str_field("fontSize")
            .and_then(FontSize::from_keyword)
            .unwrap_or_default()
    }

    /// Button label. Empty string when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.str_field("text").unwrap_or("")
    }

    /// Button variant. Defaults to [`ButtonVariant::Primary`].
    #[must_use]
    pub fn variant(&self) -> ButtonVariant {
        self.str_field("variant")
            .and_then(ButtonVariant::from_keyword)
            .unwrap_or_default()
    }

    /// Control size. Defaults to [`ControlSize::Md`].
    #[must_use]
    pub fn control_size(&self) -> ControlSize {
        self.str_field("size")
            .and_then(ControlSize::from_keyword)
            .unwrap_or_default()
    }

    /// Image source URL. Falls back to the placeholder image when unset or
    /// empty so an unconfigured image never renders blank.
    #[must_use]
    pub fn src(&self) -> &str {
        match self.str_field("src") {
            Some(src) if !src.is_empty() => src,
            _ => PLACEHOLDER_IMAGE_SRC,
        }
    }

    /// Image alt text. Empty string when absent.
    #[must_use]
    pub fn alt(&self) -> &str {
        self.str_field("alt").unwrap_or("")
    }

    /// CSS width (e.g. `"300px"`), if configured.
    #[must_use]
    pub fn width(&self) -> Option<&str> {
        self.str_field("width")
    }

    /// CSS height (e.g. `"200px"`), if configured.
    #[must_use]
    pub fn height(&self) -> Option<&str> {
        self.str_field("height")
    }

    /// Container padding as a CSS length. Defaults to `"16px"`.
    #[must_use]
    pub fn padding(&self) -> &str {
        self.str_field("padding").unwrap_or("16px")
    }

    /// Container background color. Defaults to `"transparent"`.
    #[must_use]
    pub fn background_color(&self) -> &str {
        self.str_field("backgroundColor").unwrap_or("transparent")
    }

    /// Container main-axis direction. Defaults to [`FlexDirection::Column`].
    #[must_use]
    pub fn flex_direction(&self) -> FlexDirection {
        self.str_field("flexDirection")
            .and_then(FlexDirection::from_keyword)
            .unwrap_or_default()
    }

    /// Form field label. Empty string when absent.
    #[must_use]
    pub fn label(&self) -> &str {
        self.str_field("label").unwrap_or("")
    }

    /// Form field placeholder. Empty string when absent.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.str_field("placeholder").unwrap_or("")
    }

    /// Form field input type. Defaults to [`InputType::Text`].
    #[must_use]
    pub fn input_type(&self) -> InputType {
        self.str_field("type")
            .and_then(InputType::from_keyword)
            .unwrap_or_default()
    }

    /// Whether the form field is required. Defaults to false.
    #[must_use]
    pub fn required(&self) -> bool {
        self.value
            .get("required")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    /// Navigation link labels from the `items` array. Non-string entries
    /// are skipped.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        self.value
            .get("items")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }
}
