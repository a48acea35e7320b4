//! Geometry types: Viewport, BoundingBox, ElementGeometry.

use serde::{Deserialize, Serialize};

/// The visible rectangle of the page, in page-relative device pixels.
///
/// `x`/`y` are the scroll offsets of the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Viewport {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// The viewport as a bounding box.
    pub fn as_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.x as f64,
            y: self.y as f64,
            width: self.width.max(0) as f64,
            height: self.height.max(0) as f64,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1280,
            height: 720,
        }
    }
}

/// Axis-aligned box, in page-relative device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area, zero for degenerate or negative boxes.
    pub fn area(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Check if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping region, `None` unless it has non-zero area.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(BoundingBox::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Check if this box overlaps another with non-zero area.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.intersection(other).is_some()
    }
}

/// Rendered layout properties of one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementGeometry {
    pub bounding_box: BoundingBox,
    /// False for `display: none` and `visibility: hidden | collapse`.
    pub is_displayed: bool,
    /// Own computed opacity, 0.0 - 1.0.
    pub opacity: f64,
    /// The element clips its descendants (computed `overflow` is not `visible`).
    pub overflow_clipped: bool,
    /// Computed `z-index` when not `auto`.
    #[serde(default)]
    pub z_index_hint: Option<i32>,
}

impl ElementGeometry {
    /// A plainly displayed, opaque, non-clipping element.
    pub fn displayed(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            is_displayed: true,
            opacity: 1.0,
            overflow_clipped: false,
            z_index_hint: None,
        }
    }

    /// A `display: none` element (zero box).
    pub fn hidden() -> Self {
        Self {
            bounding_box: BoundingBox::default(),
            is_displayed: false,
            opacity: 1.0,
            overflow_clipped: false,
            z_index_hint: None,
        }
    }
}
