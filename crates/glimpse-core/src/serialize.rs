//! Wire serialization.
//!
//! Output is compact JSON with a fixed key order:
//!
//! ```json
//! {"viewport":{"x":0,"y":0,"width":1280,"height":720},"truncated":false,
//!  "root":{"tag":"html","attributes":{},"text":null,"source":"base","revealedBy":null,"children":[]}}
//! ```
//!
//! Attribute maps are sorted by name, so the same snapshot always produces
//! the same bytes.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use glimpse_protocols::Viewport;

use crate::engine::Snapshot;
use crate::error::SnapshotError;
use crate::tree::ElementNode;

/// Length of the JSON `null` literal.
pub(crate) const NULL_LEN: usize = 4;

#[derive(Serialize)]
struct Envelope<'a, R: Serialize> {
    viewport: &'a Viewport,
    truncated: bool,
    root: R,
}

struct NodeView<'a> {
    node: &'a ElementNode,
    stable_ids: bool,
    /// Serialize with an empty `children` array.
    shell: bool,
}

struct ChildrenView<'a> {
    nodes: &'a [ElementNode],
    stable_ids: bool,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.stable_ids { 7 } else { 6 };
        let mut state = serializer.serialize_struct("ElementNode", fields)?;
        state.serialize_field("tag", &self.node.tag)?;
        state.serialize_field("attributes", &self.node.attributes)?;
        state.serialize_field("text", &self.node.text_content)?;
        state.serialize_field("source", &self.node.visibility_source)?;
        state.serialize_field("revealedBy", &self.node.revealed_by)?;
        if self.stable_ids {
            state.serialize_field("stableId", &self.node.id)?;
        }
        let children = ChildrenView {
            nodes: if self.shell { &[] } else { self.node.children.as_slice() },
            stable_ids: self.stable_ids,
        };
        state.serialize_field("children", &children)?;
        state.end()
    }
}

impl Serialize for ChildrenView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes.iter().map(|node| NodeView {
            node,
            stable_ids: self.stable_ids,
            shell: false,
        }))
    }
}

/// Produces the canonical JSON form of a snapshot and measures pieces of it.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSerializer {
    emit_stable_ids: bool,
}

impl SnapshotSerializer {
    pub fn new(emit_stable_ids: bool) -> Self {
        Self { emit_stable_ids }
    }

    pub fn to_json(&self, snapshot: &Snapshot) -> Result<String, SnapshotError> {
        let envelope = Envelope {
            viewport: &snapshot.viewport,
            truncated: snapshot.truncated,
            root: self.view(&snapshot.root, false),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// JSON of one subtree.
    pub fn node_to_json(&self, node: &ElementNode) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.view(node, false))?)
    }

    /// Bytes taken by a node with an empty `children` array.
    ///
    /// A subtree's size is its shell plus its children's sizes plus one
    /// comma between each pair of children.
    pub fn shell_len(&self, node: &ElementNode) -> Result<usize, SnapshotError> {
        Ok(serde_json::to_vec(&self.view(node, true))?.len())
    }

    /// Bytes taken by everything around the root node.
    pub fn envelope_len(&self, viewport: &Viewport, truncated: bool) -> Result<usize, SnapshotError> {
        let envelope = Envelope {
            viewport,
            truncated,
            root: (),
        };
        Ok(serde_json::to_vec(&envelope)?.len() - NULL_LEN)
    }

    /// Bytes taken by a `text` value.
    pub fn text_len(text: Option<&str>) -> Result<usize, SnapshotError> {
        match text {
            Some(t) => Ok(serde_json::to_vec(t)?.len()),
            None => Ok(NULL_LEN),
        }
    }

    fn view<'a>(&self, node: &'a ElementNode, shell: bool) -> NodeView<'a> {
        NodeView {
            node,
            stable_ids: self.emit_stable_ids,
            shell,
        }
    }
}

#[cfg(test)]
#[path = "serialize_tests.rs"]
mod tests;
