//! Stacking-based occlusion heuristic.

use glimpse_protocols::BoundingBox;

use crate::sampler::Sample;

/// Flag visible elements whose on-screen box lies entirely under another
/// element that is stacked higher, fully opaque, and neither an ancestor nor
/// a descendant.
///
/// Only elements with a positive explicit `z-index` can occlude. An element's
/// own stacking level is the nearest explicit `z-index` on itself or an
/// ancestor, `0` otherwise.
pub(super) fn detect(
    sample: &Sample,
    visible: &[bool],
    opacity: &[f64],
    screen_boxes: &[Option<BoundingBox>],
) -> Vec<bool> {
    let n = visible.len();
    let mut level = vec![0_i32; n];
    for pos in 0..n {
        let inherited = sample.index.parent(pos).map_or(0, |p| level[p]);
        level[pos] = sample
            .geometry(pos)
            .and_then(|g| g.z_index_hint)
            .unwrap_or(inherited);
    }

    let occluders: Vec<(usize, i32, BoundingBox)> = (0..n)
        .filter(|&pos| visible[pos] && opacity[pos] >= 1.0)
        .filter_map(|pos| {
            let z = sample.geometry(pos)?.z_index_hint.filter(|z| *z > 0)?;
            Some((pos, z, screen_boxes[pos]?))
        })
        .collect();

    let mut occluded = vec![false; n];
    if occluders.is_empty() {
        return occluded;
    }

    for pos in 0..n {
        let Some(target) = screen_boxes[pos].filter(|_| visible[pos]) else {
            continue;
        };
        occluded[pos] = occluders.iter().any(|&(o, z, cover)| {
            o != pos
                && z > level[pos]
                && cover.contains_box(&target)
                && !sample.index.is_ancestor(o, pos)
                && !sample.index.is_ancestor(pos, o)
        });
    }
    occluded
}
