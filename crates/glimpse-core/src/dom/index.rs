//! Indexed view of one document enumeration.

use std::collections::HashMap;

use tracing::debug;

use glimpse_protocols::{DomElement, ElementHandle};

use super::stable_id::StableElementId;

/// Elements of one enumeration with parent/child links and stable ids.
///
/// Positions are indices into the enumeration, which is in document order,
/// so a parent always has a lower position than its children.
#[derive(Debug, Default)]
pub struct DomIndex {
    elements: Vec<DomElement>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    ids: Vec<StableElementId>,
    sibling_positions: Vec<usize>,
    roots: Vec<usize>,
    by_handle: HashMap<ElementHandle, usize>,
    by_id: HashMap<StableElementId, usize>,
}

impl DomIndex {
    /// Index an enumeration.
    ///
    /// Elements whose parent was not enumerated before them become top-level.
    /// Repeated handles are dropped.
    pub fn build(elements: Vec<DomElement>) -> Self {
        let mut index = DomIndex::default();
        let mut tag_counts: HashMap<(Option<usize>, String), usize> = HashMap::new();

        for element in elements {
            if index.by_handle.contains_key(&element.handle) {
                debug!("Dropping repeated handle {}", element.handle);
                continue;
            }

            let parent = match element.parent {
                Some(handle) => {
                    let found = index.by_handle.get(&handle).copied();
                    if found.is_none() {
                        debug!("Parent {} of {} not enumerated, treating as top-level", handle, element.handle);
                    }
                    found
                }
                None => None,
            };

            let counter = tag_counts.entry((parent, element.tag.clone())).or_insert(0);
            let nth = *counter;
            *counter += 1;

            let position = index.elements.len();
            let (id, sibling_position) = match parent {
                Some(p) => {
                    let id = index.ids[p].child(&element.tag, nth);
                    let sibling = index.children[p].len();
                    index.children[p].push(position);
                    (id, sibling)
                }
                None => {
                    let id = StableElementId::root(&element.tag, nth);
                    let sibling = index.roots.len();
                    index.roots.push(position);
                    (id, sibling)
                }
            };

            index.by_handle.insert(element.handle, position);
            index.by_id.insert(id.clone(), position);
            index.elements.push(element);
            index.parents.push(parent);
            index.children.push(Vec::new());
            index.ids.push(id);
            index.sibling_positions.push(sibling_position);
        }

        index
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, pos: usize) -> &DomElement {
        &self.elements[pos]
    }

    pub fn parent(&self, pos: usize) -> Option<usize> {
        self.parents[pos]
    }

    pub fn children(&self, pos: usize) -> &[usize] {
        &self.children[pos]
    }

    pub fn id(&self, pos: usize) -> &StableElementId {
        &self.ids[pos]
    }

    /// Position among all element siblings.
    pub fn sibling_position(&self, pos: usize) -> usize {
        self.sibling_positions[pos]
    }

    /// Top-level elements in document order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// The document element.
    pub fn root(&self) -> Option<usize> {
        self.roots.first().copied()
    }

    pub fn handle(&self, pos: usize) -> ElementHandle {
        self.elements[pos].handle
    }

    /// All handles in document order.
    pub fn handles(&self) -> Vec<ElementHandle> {
        self.elements.iter().map(|e| e.handle).collect()
    }

    pub fn position_of(&self, handle: &ElementHandle) -> Option<usize> {
        self.by_handle.get(handle).copied()
    }

    pub fn find(&self, id: &StableElementId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Whether `ancestor` lies on the parent chain of `pos`.
    pub fn is_ancestor(&self, ancestor: usize, pos: usize) -> bool {
        let mut current = self.parents[pos];
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            if p < ancestor {
                return false;
            }
            current = self.parents[p];
        }
        false
    }
}
