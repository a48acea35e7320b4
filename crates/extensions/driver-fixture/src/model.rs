//! Serializable page model.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use glimpse_protocols::{DomElement, ElementGeometry, ElementHandle, Viewport};

use crate::error::FixtureError;

/// A recorded page: elements in document order plus scripted hover behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    #[serde(default)]
    pub viewport: Viewport,
    pub elements: Vec<FixtureElement>,
    #[serde(default)]
    pub hover_effects: Vec<HoverEffect>,
    /// Time each `enumerate` call takes.
    #[serde(default)]
    pub enumerate_delay_ms: u64,
    /// Time each geometry read takes, per element.
    #[serde(default)]
    pub geometry_delay_ms: u64,
}

impl PageModel {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn enumerate_delay_ms(mut self, ms: u64) -> Self {
        self.enumerate_delay_ms = ms;
        self
    }

    pub fn geometry_delay_ms(mut self, ms: u64) -> Self {
        self.geometry_delay_ms = ms;
        self
    }

    pub fn element(mut self, element: FixtureElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn hover_effect(mut self, effect: HoverEffect) -> Self {
        self.hover_effects.push(effect);
        self
    }

    /// Parse and check a JSON model.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let model: PageModel = serde_json::from_str(json)?;
        model.check()?;
        Ok(model)
    }

    /// Read, parse and check a JSON model file.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Verify ids are unique, parents precede children and hover effects
    /// point at known elements.
    pub fn check(&self) -> Result<(), FixtureError> {
        let mut seen = HashSet::new();
        for element in &self.elements {
            Self::check_element(element, &mut seen)?;
        }

        for effect in &self.hover_effects {
            if !seen.contains(&effect.trigger) {
                return Err(FixtureError::Invalid(format!(
                    "hover effect trigger {} is not a page element",
                    effect.trigger
                )));
            }
            for inserted in &effect.insert {
                Self::check_element(inserted, &mut seen)?;
            }
        }

        for effect in &self.hover_effects {
            if let Some(o) = effect.reveal.iter().find(|o| !seen.contains(&o.id)) {
                return Err(FixtureError::Invalid(format!(
                    "hover effect on {} reveals unknown element {}",
                    effect.trigger, o.id
                )));
            }
        }

        Ok(())
    }

    fn check_element(element: &FixtureElement, seen: &mut HashSet<u64>) -> Result<(), FixtureError> {
        if let Some(parent) = element.parent {
            if !seen.contains(&parent) {
                return Err(FixtureError::Invalid(format!(
                    "element {} appears before its parent {}",
                    element.id, parent
                )));
            }
        }
        if !seen.insert(element.id) {
            return Err(FixtureError::Invalid(format!("duplicate element id {}", element.id)));
        }
        Ok(())
    }
}

/// One element of the page model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureElement {
    pub id: u64,
    #[serde(default)]
    pub parent: Option<u64>,
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub cursor: Option<String>,
    pub geometry: ElementGeometry,
    /// Enumerated but detached by the time geometry is read.
    #[serde(default)]
    pub detached: bool,
    /// Geometry reads fail with a script error.
    #[serde(default)]
    pub broken: bool,
}

impl FixtureElement {
    pub fn new(id: u64, parent: Option<u64>, tag: &str, geometry: ElementGeometry) -> Self {
        Self {
            id,
            parent,
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            text: String::new(),
            cursor: None,
            geometry,
            detached: false,
            broken: false,
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn cursor(mut self, cursor: &str) -> Self {
        self.cursor = Some(cursor.to_string());
        self
    }

    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    pub(crate) fn to_dom_element(&self) -> DomElement {
        let mut element = DomElement::new(
            ElementHandle::new(self.id),
            self.parent.map(ElementHandle::new),
            self.tag.as_str(),
        )
        .with_text(self.text.as_str());
        for (name, value) in &self.attributes {
            element = element.with_attribute(name.as_str(), value.as_str());
        }
        if let Some(cursor) = &self.cursor {
            element = element.with_cursor(cursor.as_str());
        }
        element
    }
}

/// Geometry that replaces an element's base geometry while an effect is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryOverride {
    pub id: u64,
    pub geometry: ElementGeometry,
}

/// What hovering one element does to the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverEffect {
    pub trigger: u64,
    /// Existing elements whose geometry changes.
    #[serde(default)]
    pub reveal: Vec<GeometryOverride>,
    /// Elements that only exist while the effect is active.
    #[serde(default)]
    pub insert: Vec<FixtureElement>,
    /// Time after the hover before the changes show up.
    #[serde(default)]
    pub reveal_after_ms: u64,
    /// Time the hover call itself takes.
    #[serde(default)]
    pub hover_delay_ms: u64,
    /// The hover call fails.
    #[serde(default)]
    pub fail: bool,
    /// Moving the pointer away does not undo the effect.
    #[serde(default)]
    pub sticky: bool,
}

impl HoverEffect {
    pub fn new(trigger: u64) -> Self {
        Self {
            trigger,
            reveal: Vec::new(),
            insert: Vec::new(),
            reveal_after_ms: 0,
            hover_delay_ms: 0,
            fail: false,
            sticky: false,
        }
    }

    pub fn reveal(mut self, id: u64, geometry: ElementGeometry) -> Self {
        self.reveal.push(GeometryOverride { id, geometry });
        self
    }

    pub fn insert(mut self, element: FixtureElement) -> Self {
        self.insert.push(element);
        self
    }

    pub fn reveal_after_ms(mut self, ms: u64) -> Self {
        self.reveal_after_ms = ms;
        self
    }

    pub fn hover_delay_ms(mut self, ms: u64) -> Self {
        self.hover_delay_ms = ms;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}
