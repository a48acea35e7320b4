//! Hover candidate heuristic configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Which visible elements get hover-probed.
///
/// An element qualifies when any rule matches: tag, ARIA role, computed
/// cursor, popup-related attributes, or one of the explicit `criteria`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    #[serde(default = "default_cursors")]
    pub cursors: Vec<String>,

    /// Treat `aria-haspopup`, `aria-expanded`, `aria-describedby` and `title`
    /// as hover affordances.
    #[serde(default = "default_true", alias = "popupAttributes")]
    pub popup_attributes: bool,

    #[serde(default = "default_min_size", alias = "minWidth")]
    pub min_width: f64,

    #[serde(default = "default_min_size", alias = "minHeight")]
    pub min_height: f64,

    #[serde(default)]
    pub criteria: Vec<HoverCriterion>,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tags: default_tags(),
            roles: default_roles(),
            cursors: default_cursors(),
            popup_attributes: true,
            min_width: default_min_size(),
            min_height: default_min_size(),
            criteria: Vec::new(),
        }
    }
}

/// Explicit match rule. Every field that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverCriterion {
    /// Tag name, compared case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// One of the classes in the `class` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Exact `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Substring of the element text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl HoverCriterion {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.class.is_none() && self.id.is_none() && self.text.is_none()
    }
}

fn default_tags() -> Vec<String> {
    ["a", "button", "li", "summary", "details", "menu", "nav", "label"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_roles() -> Vec<String> {
    [
        "menuitem", "menu", "menubar", "button", "tab", "link", "navigation", "tooltip",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_cursors() -> Vec<String> {
    ["pointer", "help", "zoom-in", "grab", "move"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_min_size() -> f64 {
    11.0
}
