//! Element handles and DOM descriptions reported by drivers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, backend-specific reference to a live element.
///
/// Only meaningful to the driver that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element as reported by [`PageDriver::enumerate`](crate::PageDriver::enumerate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomElement {
    pub handle: ElementHandle,
    /// Parent element; `None` for the document element.
    pub parent: Option<ElementHandle>,
    /// Tag name (lowercase).
    pub tag: String,
    /// Attributes in source order.
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    /// Direct text of the element (inputs: placeholder/value, images: alt/title).
    #[serde(default)]
    pub text: String,
    /// Computed `cursor` style.
    #[serde(default)]
    pub cursor: Option<String>,
}

impl DomElement {
    pub fn new(handle: ElementHandle, parent: Option<ElementHandle>, tag: impl Into<String>) -> Self {
        Self {
            handle,
            parent,
            tag: tag.into().to_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            cursor: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// First value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}
