//! Visibility classification over a whole sample.

use std::collections::HashSet;

use glimpse_protocols::{BoundingBox, ElementGeometry, Viewport};

use crate::dom::StableElementId;
use crate::sampler::Sample;

use super::occlusion;

/// Region descendants are clipped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Clip {
    Unbounded,
    Region(BoundingBox),
    Empty,
}

impl Clip {
    fn narrow(self, by: &BoundingBox) -> Clip {
        match self {
            Clip::Unbounded => Clip::Region(*by),
            Clip::Region(r) => r.intersection(by).map_or(Clip::Empty, Clip::Region),
            Clip::Empty => Clip::Empty,
        }
    }

    fn apply(&self, b: &BoundingBox) -> Option<BoundingBox> {
        match self {
            Clip::Unbounded => Some(*b),
            Clip::Region(r) => r.intersection(b),
            Clip::Empty => None,
        }
    }
}

/// Visibility of a single element, ignoring ancestors.
pub fn is_visible(geometry: &ElementGeometry, viewport: &Viewport) -> bool {
    geometry.is_displayed
        && geometry.opacity > 0.0
        && geometry.bounding_box.intersects(&viewport.as_box())
}

/// Whether the element's overflow clips its descendants.
///
/// Overflow on the root element, or on `body` when the root's overflow is
/// `visible`, is applied to the viewport instead.
fn clips_descendants(sample: &Sample, pos: usize) -> bool {
    let Some(geometry) = sample.geometry(pos) else {
        return false;
    };
    if !geometry.overflow_clipped {
        return false;
    }
    match sample.index.parent(pos) {
        None => false,
        Some(root)
            if sample.index.parent(root).is_none()
                && sample.index.element(pos).tag == "body" =>
        {
            sample.geometry(root).is_some_and(|g| g.overflow_clipped)
        }
        Some(_) => true,
    }
}

/// Per-position outcome of classifying one sample.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub visible: Vec<bool>,
    /// Elements fully covered by a higher stacked opaque element.
    pub occluded: Vec<bool>,
    /// On-screen part of each visible element.
    pub(crate) screen_boxes: Vec<Option<BoundingBox>>,
}

impl Classification {
    pub fn is_visible(&self, pos: usize) -> bool {
        self.visible[pos]
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    pub fn occluded_count(&self) -> usize {
        self.occluded.iter().filter(|v| **v).count()
    }

    /// On-screen part of a visible element.
    pub fn screen_box(&self, pos: usize) -> Option<&BoundingBox> {
        self.screen_boxes[pos].as_ref()
    }

    /// Stable ids of every visible element.
    pub fn visible_ids(&self, sample: &Sample) -> HashSet<StableElementId> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(pos, _)| sample.index.id(pos).clone())
            .collect()
    }
}

/// Decides which sampled elements are visible in the viewport.
///
/// An element is visible when it is displayed, its opacity multiplied by
/// every ancestor's is above zero, and its box has non-zero overlap with both
/// the viewport and every clipping ancestor's box. Occlusion is detected for
/// all visible elements; only strict mode removes occluded ones.
#[derive(Debug, Clone, Default)]
pub struct VisibilityClassifier {
    strict_occlusion: bool,
}

impl VisibilityClassifier {
    pub fn new(strict_occlusion: bool) -> Self {
        Self { strict_occlusion }
    }

    pub fn classify(&self, sample: &Sample, viewport: &Viewport) -> Classification {
        let n = sample.index.len();
        let viewport_box = viewport.as_box();

        let mut opacity = vec![1.0_f64; n];
        let mut clip = vec![Clip::Unbounded; n];
        let mut visible = vec![false; n];
        let mut screen_boxes = vec![None; n];

        // Parents precede children, so one forward pass sees every ancestor first.
        for pos in 0..n {
            let (parent_opacity, parent_clip) = match sample.index.parent(pos) {
                Some(p) => (opacity[p], clip[p]),
                None => (1.0, Clip::Unbounded),
            };

            let Some(geometry) = sample.geometry(pos) else {
                opacity[pos] = parent_opacity;
                clip[pos] = parent_clip;
                continue;
            };

            opacity[pos] = parent_opacity * geometry.opacity.clamp(0.0, 1.0);
            clip[pos] = if clips_descendants(sample, pos) {
                parent_clip.narrow(&geometry.bounding_box)
            } else {
                parent_clip
            };

            if !geometry.is_displayed || opacity[pos] <= 0.0 {
                continue;
            }
            let on_screen = geometry
                .bounding_box
                .intersection(&viewport_box)
                .and_then(|b| parent_clip.apply(&b));
            if let Some(b) = on_screen {
                visible[pos] = true;
                screen_boxes[pos] = Some(b);
            }
        }

        let occluded = occlusion::detect(sample, &visible, &opacity, &screen_boxes);
        if self.strict_occlusion {
            for (v, o) in visible.iter_mut().zip(&occluded) {
                if *o {
                    *v = false;
                }
            }
        }

        Classification {
            visible,
            occluded,
            screen_boxes,
        }
    }
}
