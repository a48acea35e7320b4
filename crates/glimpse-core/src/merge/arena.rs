//! Index-based merge tree.

use std::collections::HashMap;
use std::mem;

use crate::dom::StableElementId;
use crate::hover::HoverDelta;
use crate::tree::{ElementNode, VisibilitySource};

#[derive(Debug)]
pub(super) struct Slot {
    /// The node without its children.
    pub node: ElementNode,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// False once the subtree rooted here was dropped.
    pub live: bool,
    /// Serialized size of the subtree.
    pub size: usize,
}

/// Top of a subtree added by one delta.
#[derive(Debug, Clone, Copy)]
pub(super) struct HoverRoot {
    pub delta: usize,
    pub slot: usize,
}

/// Snapshot tree flattened into slots for merging and truncation.
///
/// Slot 0 is the root. A slot is always created after its parent, so
/// children have higher indices than their parents.
#[derive(Debug)]
pub struct MergeTree {
    pub(super) slots: Vec<Slot>,
    pub(super) by_id: HashMap<StableElementId, usize>,
    pub(super) hover_roots: Vec<HoverRoot>,
}

impl MergeTree {
    pub fn from_tree(root: ElementNode) -> Self {
        let mut tree = MergeTree {
            slots: Vec::new(),
            by_id: HashMap::new(),
            hover_roots: Vec::new(),
        };

        let mut stack = vec![(root, None)];
        while let Some((mut node, parent)) = stack.pop() {
            let children = mem::take(&mut node.children);
            let slot = tree.push(node, parent);
            stack.extend(children.into_iter().rev().map(|c| (c, Some(slot))));
        }
        tree
    }

    /// Live node count.
    pub fn len(&self) -> usize {
        self.live_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &StableElementId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Subtrees added by deltas, including ones dropped since.
    pub fn hover_subtree_count(&self) -> usize {
        self.hover_roots.len()
    }

    /// Attach the nodes of delta number `k`, returning how many were new.
    ///
    /// Nodes are visited parents first. A node whose id is already in the
    /// tree is left as it is and its children are attached under it. A new
    /// node goes under its parent after the siblings that precede it in the
    /// document, with missing ancestors created from the id path.
    pub fn insert_delta(&mut self, k: usize, delta: HoverDelta) -> usize {
        let trigger = delta.trigger;
        let mut added = 0;

        for top in delta.nodes {
            // (node, parent slot, parent was added by this delta)
            let mut stack: Vec<(ElementNode, Option<usize>, bool)> = vec![(top, None, false)];
            while let Some((mut node, parent, parent_new)) = stack.pop() {
                let children = mem::take(&mut node.children);

                let (slot, is_new) = match self.by_id.get(&node.id) {
                    Some(&existing) => (existing, false),
                    None => {
                        let (parent, synthesized) = match parent {
                            Some(p) => (p, false),
                            None => self.attach_point(&node.id, k, &trigger),
                        };
                        node.visibility_source = VisibilitySource::HoverRevealed;
                        node.revealed_by = Some(trigger.clone());
                        let slot = self.insert_child(parent, node);
                        if !parent_new && !synthesized {
                            self.hover_roots.push(HoverRoot { delta: k, slot });
                        }
                        added += 1;
                        (slot, true)
                    }
                };

                stack.extend(children.into_iter().rev().map(|c| (c, Some(slot), is_new)));
            }
        }

        added
    }

    /// Rebuild the owned tree from live slots.
    pub fn into_tree(self) -> ElementNode {
        let mut slots = self.slots;
        let mut built: Vec<Option<ElementNode>> = (0..slots.len()).map(|_| None).collect();

        for (i, slot) in slots.drain(1..).enumerate().rev() {
            if !slot.live {
                continue;
            }
            let mut node = slot.node;
            node.children = slot
                .children
                .iter()
                .filter_map(|c| built[*c].take())
                .collect();
            built[i + 1] = Some(node);
        }

        let root = slots.swap_remove(0);
        let mut node = root.node;
        node.children = root
            .children
            .iter()
            .filter_map(|c| built[*c].take())
            .collect();
        node
    }

    /// Slots reachable from the root, in document order.
    pub(super) fn live_slots(&self) -> Vec<usize> {
        let mut out = Vec::new();
        if self.slots.is_empty() {
            return out;
        }
        let mut stack = vec![0];
        while let Some(slot) = stack.pop() {
            out.push(slot);
            stack.extend(self.slots[slot].children.iter().rev());
        }
        out
    }

    pub(super) fn is_attached(&self, mut slot: usize) -> bool {
        loop {
            if !self.slots[slot].live {
                return false;
            }
            match self.slots[slot].parent {
                Some(p) => slot = p,
                None => return true,
            }
        }
    }

    fn push(&mut self, node: ElementNode, parent: Option<usize>) -> usize {
        let slot = self.slots.len();
        self.by_id.insert(node.id.clone(), slot);
        self.slots.push(Slot {
            node,
            parent,
            children: Vec::new(),
            live: true,
            size: 0,
        });
        if let Some(p) = parent {
            self.slots[p].children.push(slot);
        }
        slot
    }

    fn insert_child(&mut self, parent: usize, node: ElementNode) -> usize {
        let position = node.sibling_position;
        let slot = self.slots.len();
        self.by_id.insert(node.id.clone(), slot);
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
            live: true,
            size: 0,
        });

        let slots = &self.slots;
        let at = slots[parent]
            .children
            .partition_point(|&c| slots[c].node.sibling_position <= position);
        self.slots[parent].children.insert(at, slot);
        slot
    }

    /// Parent slot for a new node whose parent is not known yet, creating
    /// missing ancestors from the id path. Returns whether any were created.
    fn attach_point(&mut self, id: &StableElementId, k: usize, trigger: &StableElementId) -> (usize, bool) {
        let mut missing = Vec::new();
        let mut cursor = id.parent();
        let anchor = loop {
            match cursor {
                Some(pid) => match self.by_id.get(&pid) {
                    Some(&slot) => break slot,
                    None => {
                        cursor = pid.parent();
                        missing.push(pid);
                    }
                },
                None => break 0,
            }
        };

        if missing.is_empty() {
            return (anchor, false);
        }

        let mut parent = anchor;
        for (i, pid) in missing.into_iter().rev().enumerate() {
            let (tag, nth) = pid
                .segment()
                .map(|(tag, nth)| (tag.to_string(), nth))
                .unwrap_or_else(|| ("div".to_string(), 0));
            let mut node = ElementNode::new(pid, tag);
            node.sibling_position = nth;
            node.visibility_source = VisibilitySource::HoverRevealed;
            node.revealed_by = Some(trigger.clone());
            let slot = self.insert_child(parent, node);
            if i == 0 {
                self.hover_roots.push(HoverRoot { delta: k, slot });
            }
            parent = slot;
        }
        (parent, true)
    }
}
