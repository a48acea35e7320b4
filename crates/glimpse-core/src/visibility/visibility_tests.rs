use super::*;
use glimpse_protocols::{BoundingBox, DomElement, ElementGeometry, ElementHandle, Viewport};

use crate::dom::DomIndex;
use crate::sampler::Sample;
use crate::test_support::shown;

fn sample(tree: &[(u64, Option<u64>, &str)], geometry: Vec<Option<ElementGeometry>>) -> Sample {
    let elements = tree
        .iter()
        .map(|(h, p, tag)| DomElement::new(ElementHandle::new(*h), p.map(ElementHandle::new), *tag))
        .collect();
    Sample {
        index: DomIndex::build(elements),
        geometry,
        stale: 0,
        failed: 0,
        incomplete: false,
    }
}

fn vp() -> Viewport {
    Viewport::new(0, 0, 800, 600)
}

const CHAIN: &[(u64, Option<u64>, &str)] = &[(1, None, "html"), (2, Some(1), "body"), (3, Some(2), "div")];

#[test]
fn test_single_element_rule() {
    assert!(is_visible(&shown(10.0, 10.0, 5.0, 5.0), &vp()));
    assert!(!is_visible(&ElementGeometry::hidden(), &vp()));
    assert!(!is_visible(&shown(0.0, 700.0, 10.0, 10.0), &vp()));
    assert!(!is_visible(&shown(10.0, 10.0, 0.0, 5.0), &vp()));

    let mut faded = shown(10.0, 10.0, 5.0, 5.0);
    faded.opacity = 0.0;
    assert!(!is_visible(&faded, &vp()));
}

#[test]
fn test_partially_visible_counts() {
    let s = sample(CHAIN, vec![
        Some(shown(0.0, 0.0, 800.0, 2000.0)),
        Some(shown(0.0, 0.0, 800.0, 2000.0)),
        Some(shown(0.0, 590.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(c.is_visible(2));
    assert_eq!(c.screen_box(2), Some(&BoundingBox::new(0.0, 590.0, 100.0, 10.0)));
}

#[test]
fn test_below_viewport_excluded() {
    let s = sample(CHAIN, vec![
        Some(shown(0.0, 0.0, 800.0, 2000.0)),
        Some(shown(0.0, 0.0, 800.0, 2000.0)),
        Some(shown(0.0, 600.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(c.is_visible(1));
    assert!(!c.is_visible(2));
    assert_eq!(c.visible_count(), 2);
}

#[test]
fn test_scrolled_viewport() {
    let s = sample(CHAIN, vec![
        Some(shown(0.0, 0.0, 800.0, 2000.0)),
        Some(shown(0.0, 0.0, 800.0, 2000.0)),
        Some(shown(0.0, 50.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &Viewport::new(0, 1000, 800, 600));
    assert!(!c.is_visible(2));
}

#[test]
fn test_ancestor_opacity_multiplies() {
    let mut transparent = shown(0.0, 0.0, 800.0, 600.0);
    transparent.opacity = 0.0;
    let s = sample(CHAIN, vec![
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(transparent),
        Some(shown(10.0, 10.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(!c.is_visible(1));
    assert!(!c.is_visible(2));
}

#[test]
fn test_overflow_clip_hides_outside_content() {
    let mut clipper = shown(0.0, 0.0, 200.0, 100.0);
    clipper.overflow_clipped = true;
    let tree: &[(u64, Option<u64>, &str)] = &[
        (1, None, "html"),
        (2, Some(1), "div"),
        (3, Some(2), "p"),
        (4, Some(2), "p"),
    ];
    let s = sample(tree, vec![
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(clipper),
        Some(shown(0.0, 10.0, 100.0, 20.0)),
        Some(shown(0.0, 300.0, 100.0, 20.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(c.is_visible(2));
    assert!(!c.is_visible(3));
}

#[test]
fn test_nested_clips_intersect() {
    let mut outer = shown(0.0, 0.0, 200.0, 200.0);
    outer.overflow_clipped = true;
    let mut inner = shown(300.0, 0.0, 200.0, 200.0);
    inner.overflow_clipped = true;
    let tree: &[(u64, Option<u64>, &str)] = &[(1, None, "html"), (2, Some(1), "div"), (3, Some(2), "div"), (4, Some(3), "a")];
    let s = sample(tree, vec![
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(outer),
        Some(inner),
        Some(shown(300.0, 10.0, 50.0, 20.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(!c.is_visible(2));
    assert!(!c.is_visible(3));
}

fn clipping(x: f64, y: f64, w: f64, h: f64) -> ElementGeometry {
    let mut g = shown(x, y, w, h);
    g.overflow_clipped = true;
    g
}

#[test]
fn test_root_overflow_does_not_clip() {
    let s = sample(CHAIN, vec![
        Some(clipping(0.0, 0.0, 800.0, 600.0)),
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(shown(0.0, 1100.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &Viewport::new(0, 1000, 800, 600));
    assert!(c.is_visible(2));
}

#[test]
fn test_body_overflow_propagates_when_root_visible() {
    // body { height: 100%; overflow-x: hidden } scrolled past the first screen
    let s = sample(CHAIN, vec![
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(clipping(0.0, 0.0, 800.0, 600.0)),
        Some(shown(0.0, 1100.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &Viewport::new(0, 1000, 800, 600));
    assert!(c.is_visible(2));
}

#[test]
fn test_body_clips_when_root_takes_the_viewport() {
    let s = sample(CHAIN, vec![
        Some(clipping(0.0, 0.0, 800.0, 2000.0)),
        Some(clipping(0.0, 0.0, 800.0, 600.0)),
        Some(shown(0.0, 1100.0, 100.0, 50.0)),
    ]);
    let c = VisibilityClassifier::default().classify(&s, &Viewport::new(0, 1000, 800, 600));
    assert!(!c.is_visible(2));
}

#[test]
fn test_unsampled_element_not_visible() {
    let s = sample(CHAIN, vec![Some(shown(0.0, 0.0, 800.0, 600.0)), None, Some(shown(0.0, 0.0, 10.0, 10.0))]);
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(!c.is_visible(1));
    assert!(c.is_visible(2));
}

fn occlusion_sample() -> Sample {
    let mut modal = shown(0.0, 0.0, 800.0, 600.0);
    modal.z_index_hint = Some(100);
    let tree: &[(u64, Option<u64>, &str)] = &[
        (1, None, "html"),
        (2, Some(1), "body"),
        (3, Some(2), "p"),
        (4, Some(2), "div"),
        (5, Some(4), "button"),
    ];
    sample(tree, vec![
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(shown(0.0, 0.0, 800.0, 600.0)),
        Some(shown(10.0, 10.0, 100.0, 20.0)),
        Some(modal),
        Some(shown(300.0, 300.0, 80.0, 30.0)),
    ])
}

#[test]
fn test_occlusion_flagged_but_kept_by_default() {
    let s = occlusion_sample();
    let c = VisibilityClassifier::default().classify(&s, &vp());
    assert!(c.occluded[2]);
    assert!(c.is_visible(2));
    // Ancestors and descendants of the overlay are never occluded by it.
    assert!(!c.occluded[1]);
    assert!(!c.occluded[4]);
    assert_eq!(c.occluded_count(), 1);
}

#[test]
fn test_occlusion_strict_mode_excludes() {
    let s = occlusion_sample();
    let c = VisibilityClassifier::new(true).classify(&s, &vp());
    assert!(!c.is_visible(2));
    assert!(c.is_visible(3));
    assert!(c.is_visible(4));
}

#[test]
fn test_translucent_overlay_does_not_occlude() {
    let mut s = occlusion_sample();
    if let Some(g) = s.geometry[3].as_mut() {
        g.opacity = 0.5;
    }
    let c = VisibilityClassifier::new(true).classify(&s, &vp());
    assert!(c.is_visible(2));
    assert_eq!(c.occluded_count(), 0);
}

#[test]
fn test_visible_ids() {
    let s = occlusion_sample();
    let c = VisibilityClassifier::default().classify(&s, &vp());
    let ids = c.visible_ids(&s);
    assert_eq!(ids.len(), 5);
    assert!(ids.contains(s.index.id(4)));
}
