//! Structural element identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an element derived from its position in the document.
///
/// The id is the path of `tag[n]` segments from the document root, where `n`
/// counts preceding element siblings with the same tag:
///
/// ```text
/// /html[0]/body[0]/nav[0]/ul[0]/li[2]
/// ```
///
/// The same live element gets the same id across enumerations as long as its
/// ancestors and same-tag older siblings are unchanged. Every prefix of an id
/// is the id of an ancestor, so parents and their tags can be recovered
/// without the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableElementId(String);

impl StableElementId {
    /// Id of a top-level element.
    pub fn root(tag: &str, index: usize) -> Self {
        Self(format!("/{}[{}]", tag, index))
    }

    /// Id of a child of this element.
    pub fn child(&self, tag: &str, index: usize) -> Self {
        Self(format!("{}/{}[{}]", self.0, tag, index))
    }

    /// Parse an id, checking every segment.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix('/')?;
        if rest.split('/').all(|seg| parse_segment(seg).is_some()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the parent element, `None` for top-level elements.
    pub fn parent(&self) -> Option<Self> {
        match self.0.rfind('/') {
            Some(0) | None => None,
            Some(pos) => Some(Self(self.0[..pos].to_string())),
        }
    }

    /// Tag and same-tag sibling index of the last segment.
    pub fn segment(&self) -> Option<(&str, usize)> {
        let pos = self.0.rfind('/')?;
        parse_segment(&self.0[pos + 1..])
    }

    /// Tag of the element this id names.
    pub fn tag(&self) -> Option<&str> {
        self.segment().map(|(tag, _)| tag)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    /// Whether `other` lies strictly inside this element.
    pub fn is_ancestor_of(&self, other: &StableElementId) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }
}

fn parse_segment(seg: &str) -> Option<(&str, usize)> {
    let (tag, index) = seg.rsplit_once('[')?;
    let index = index.strip_suffix(']')?.parse().ok()?;
    if tag.is_empty() {
        return None;
    }
    Some((tag, index))
}

impl fmt::Display for StableElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
