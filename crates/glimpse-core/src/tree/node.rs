//! Output tree node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::StableElementId;

/// How a node came to be in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilitySource {
    /// Visible without interaction.
    Base,
    /// Visible only while its trigger is hovered.
    HoverRevealed,
}

/// One element in the snapshot tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub id: StableElementId,
    pub tag: String,
    /// Allow-listed attributes, sorted by name.
    pub attributes: BTreeMap<String, String>,
    pub text_content: Option<String>,
    pub children: Vec<ElementNode>,
    pub visibility_source: VisibilitySource,
    /// Hover trigger that revealed this node.
    pub revealed_by: Option<StableElementId>,
    /// Position among element siblings in the document it was read from.
    pub sibling_position: usize,
}

impl ElementNode {
    pub fn new(id: StableElementId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text_content: None,
            children: Vec::new(),
            visibility_source: VisibilitySource::Base,
            revealed_by: None,
            sibling_position: 0,
        }
    }

    /// This node and all descendants, parents before children.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes in this subtree.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn find(&self, id: &StableElementId) -> Option<&ElementNode> {
        self.iter().find(|n| &n.id == id)
    }

    pub fn is_hover_revealed(&self) -> bool {
        self.visibility_source == VisibilitySource::HoverRevealed
    }

    /// Mark this subtree as revealed by `trigger`.
    pub fn mark_revealed(&mut self, trigger: &StableElementId) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.visibility_source = VisibilitySource::HoverRevealed;
            node.revealed_by = Some(trigger.clone());
            stack.extend(node.children.iter_mut());
        }
    }
}

/// Pre-order iterator over an [`ElementNode`] subtree.
pub struct PreOrder<'a> {
    stack: Vec<&'a ElementNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
