//! Tree construction from a classified sample.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use glimpse_config::SnapshotConfig;

use crate::dom::{normalize_whitespace, DomIndex, StableElementId};

use super::node::ElementNode;

/// Builds the minimal tree holding a set of elements and their ancestors.
///
/// Construction is iterative so document depth is not bounded by the stack.
/// Wrapper elements with a single child are kept as they are.
pub struct TreeBuilder<'a> {
    config: &'a SnapshotConfig,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a SnapshotConfig) -> Self {
        Self { config }
    }

    /// Tree of every `visible` element plus its ancestors, rooted at the
    /// document element. The root is always present. `None` for an empty
    /// document.
    pub fn build(&self, index: &DomIndex, visible: &[bool]) -> Option<ElementNode> {
        let root = index.root()?;
        let mut keep = self.keep_set(index, visible);
        keep[root] = true;

        self.assemble(index, &keep)
            .into_iter()
            .find(|(pos, _)| *pos == root)
            .map(|(_, node)| node)
    }

    /// Maximal subtrees of `revealed` elements (plus ancestors) whose roots
    /// are not in `known`, in document order.
    ///
    /// `known` must be closed under ancestors, as the ids of a built tree are.
    pub fn build_revealed(
        &self,
        index: &DomIndex,
        revealed: &[bool],
        known: &HashSet<StableElementId>,
    ) -> Vec<ElementNode> {
        let mut emit = self.keep_set(index, revealed);
        for (pos, e) in emit.iter_mut().enumerate() {
            if *e && known.contains(index.id(pos)) {
                *e = false;
            }
        }
        self.assemble(index, &emit)
            .into_iter()
            .map(|(_, node)| node)
            .collect()
    }

    /// Output node for one element, without children.
    pub fn make_node(&self, index: &DomIndex, pos: usize) -> ElementNode {
        let element = index.element(pos);
        let mut node = ElementNode::new(index.id(pos).clone(), element.tag.as_str());
        node.attributes = self.filter_attributes(&element.attributes);
        node.text_content = normalize_whitespace(&element.text);
        node.sibling_position = index.sibling_position(pos);
        node
    }

    fn filter_attributes(&self, attributes: &[(String, String)]) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (name, value) in attributes {
            if self.config.allows_attribute(name) {
                out.entry(name.to_ascii_lowercase())
                    .or_insert_with(|| normalize_whitespace(value).unwrap_or_default());
            }
        }
        out
    }

    fn is_empty_leaf(&self, index: &DomIndex, pos: usize) -> bool {
        let element = index.element(pos);
        normalize_whitespace(&element.text).is_none()
            && !element
                .attributes
                .iter()
                .any(|(name, _)| self.config.allows_attribute(name))
    }

    /// Selected elements plus all their ancestors.
    fn keep_set(&self, index: &DomIndex, selected: &[bool]) -> Vec<bool> {
        let n = index.len();
        let mut keep = vec![false; n];
        let mut pruned = 0;

        // Children come after parents, so walking backwards settles every
        // child before its parent is looked at.
        for pos in (0..n).rev() {
            if !keep[pos] && selected[pos] {
                if self.config.prune_empty_leaves && self.is_empty_leaf(index, pos) {
                    pruned += 1;
                } else {
                    keep[pos] = true;
                }
            }
            if keep[pos] {
                if let Some(parent) = index.parent(pos) {
                    keep[parent] = true;
                }
            }
        }

        if pruned > 0 {
            debug!("Pruned {} empty leaves", pruned);
        }
        keep
    }

    /// Build every emitted element and return the subtree roots in document order.
    fn assemble(&self, index: &DomIndex, emit: &[bool]) -> Vec<(usize, ElementNode)> {
        let n = index.len();
        let mut built: Vec<Option<ElementNode>> = (0..n).map(|_| None).collect();

        for pos in (0..n).rev() {
            if !emit[pos] {
                continue;
            }
            let mut node = self.make_node(index, pos);
            node.children = index
                .children(pos)
                .iter()
                .filter_map(|child| built[*child].take())
                .collect();
            built[pos] = Some(node);
        }

        let mut roots = Vec::new();
        for pos in 0..n {
            let is_root = index.parent(pos).is_none_or(|p| !emit[p]);
            if emit[pos] && is_root {
                if let Some(node) = built[pos].take() {
                    roots.push((pos, node));
                }
            }
        }
        roots
    }
}
