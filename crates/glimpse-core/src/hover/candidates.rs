//! Hover candidate selection.

use serde::Serialize;

use glimpse_config::{HoverConfig, HoverCriterion};
use glimpse_protocols::{DomElement, ElementHandle};

use crate::dom::{normalize_whitespace, StableElementId};
use crate::sampler::Sample;
use crate::visibility::Classification;

/// Attributes that usually mean hovering shows something.
const POPUP_ATTRIBUTES: &[&str] = &[
    "aria-haspopup",
    "aria-expanded",
    "aria-describedby",
    "title",
    "onmouseover",
    "onmouseenter",
];

/// Why an element was picked for probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateReason {
    Criterion,
    Tag,
    Role,
    Cursor,
    PopupAttribute,
}

/// An element to hover.
#[derive(Debug, Clone)]
pub struct HoverCandidate {
    pub handle: ElementHandle,
    pub id: StableElementId,
    pub tag: String,
    pub reason: CandidateReason,
}

/// Selected candidates and how many matches the cap cut off.
#[derive(Debug, Default)]
pub struct CandidateSelection {
    pub candidates: Vec<HoverCandidate>,
    pub over_limit: usize,
}

/// Picks base-visible elements likely to reveal content on hover.
pub struct CandidateSelector<'a> {
    config: &'a HoverConfig,
    limit: usize,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(config: &'a HoverConfig, limit: usize) -> Self {
        Self { config, limit }
    }

    /// Candidates in document order, at most `limit` of them.
    pub fn select(&self, sample: &Sample, classification: &Classification) -> CandidateSelection {
        let mut selection = CandidateSelection::default();
        if !self.config.enabled {
            return selection;
        }

        for pos in 0..sample.index.len() {
            if !classification.is_visible(pos) {
                continue;
            }
            let Some(geometry) = sample.geometry(pos) else {
                continue;
            };
            let b = &geometry.bounding_box;
            if b.width < self.config.min_width || b.height < self.config.min_height {
                continue;
            }

            let element = sample.index.element(pos);
            let Some(reason) = self.matches(element) else {
                continue;
            };

            if selection.candidates.len() >= self.limit {
                selection.over_limit += 1;
                continue;
            }
            selection.candidates.push(HoverCandidate {
                handle: element.handle,
                id: sample.index.id(pos).clone(),
                tag: element.tag.clone(),
                reason,
            });
        }

        selection
    }

    /// The first rule that picks this element, if any.
    pub fn matches(&self, element: &DomElement) -> Option<CandidateReason> {
        if self
            .config
            .criteria
            .iter()
            .any(|c| !c.is_empty() && criterion_matches(c, element))
        {
            return Some(CandidateReason::Criterion);
        }

        if self
            .config
            .tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&element.tag))
        {
            return Some(CandidateReason::Tag);
        }

        if let Some(role) = element.attribute("role") {
            let hit = role
                .split_whitespace()
                .any(|r| self.config.roles.iter().any(|c| c.eq_ignore_ascii_case(r)));
            if hit {
                return Some(CandidateReason::Role);
            }
        }

        if let Some(cursor) = element.cursor.as_deref() {
            if self
                .config
                .cursors
                .iter()
                .any(|c| c.eq_ignore_ascii_case(cursor.trim()))
            {
                return Some(CandidateReason::Cursor);
            }
        }

        if self.config.popup_attributes && has_popup_attribute(element) {
            return Some(CandidateReason::PopupAttribute);
        }

        None
    }
}

fn has_popup_attribute(element: &DomElement) -> bool {
    POPUP_ATTRIBUTES.iter().any(|name| match element.attribute(name) {
        Some(value) => !(*name == "aria-haspopup" && value.eq_ignore_ascii_case("false")),
        None => false,
    })
}

/// Every field set on the criterion must match.
fn criterion_matches(criterion: &HoverCriterion, element: &DomElement) -> bool {
    if let Some(tag) = &criterion.tag {
        if !tag.eq_ignore_ascii_case(&element.tag) {
            return false;
        }
    }
    if let Some(class) = &criterion.class {
        let has_class = element
            .attribute("class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class));
        if !has_class {
            return false;
        }
    }
    if let Some(id) = &criterion.id {
        if element.attribute("id") != Some(id.as_str()) {
            return false;
        }
    }
    if let Some(text) = &criterion.text {
        let has_text = normalize_whitespace(&element.text).is_some_and(|t| t.contains(text.as_str()));
        if !has_text {
            return false;
        }
    }
    true
}
