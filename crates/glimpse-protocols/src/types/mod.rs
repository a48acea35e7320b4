//! Shared page types: viewport, geometry, element descriptions.

mod element;
mod geometry;

pub use element::{DomElement, ElementHandle};
pub use geometry::{BoundingBox, ElementGeometry, Viewport};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
