/// Axis-aligned rectangle geometry.
///
/// Rectangles are (top-left x, top-left y, width, height) with
/// half-open interval semantics: touching edges do not overlap.

use super::entity::{CEIL_Y, GROUND_Y};

/// Do two axis-aligned rectangles intersect on both axes?
/// Pure and total; degenerate (zero-extent) rectangles overlap nothing.
#[inline]
pub fn overlaps(
    ax: f32, ay: f32, aw: f32, ah: f32,
    bx: f32, by: f32, bw: f32, bh: f32,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// The lethal footprint of a spike whose nominal box is `(x, w, h)`
/// with `x` the left edge in screen space.
///
/// The triangle is approximated by a box narrowed to 70% width and 80%
/// height, centered horizontally, anchored to whichever boundary the
/// current gravity direction makes "down": resting on the ground for
/// +1, hanging from the ceiling for -1.
pub fn spike_footprint(x: f32, w: f32, h: f32, gravity_dir: f32) -> (f32, f32, f32, f32) {
    let fw = w * 0.7;
    let fh = h * 0.8;
    let fx = x + (w - fw) / 2.0;
    let fy = if gravity_dir > 0.0 { GROUND_Y - fh } else { CEIL_Y };
    (fx, fy, fw, fh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_basic() {
        assert!(overlaps(0.0, 0.0, 10.0, 10.0, 5.0, 5.0, 10.0, 10.0));
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 20.0, 0.0, 10.0, 10.0));
        // One axis overlapping is not enough
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 5.0, 30.0, 10.0, 10.0));
    }

    #[test]
    fn overlap_edge_touch_is_miss() {
        // Half-open semantics: shared edge does not collide
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 10.0, 10.0));
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 0.0, 10.0, 10.0, 10.0));
    }

    #[test]
    fn overlap_symmetric() {
        let a = (3.0, 4.0, 8.0, 8.0);
        let b = (7.0, 9.0, 6.0, 2.0);
        assert_eq!(
            overlaps(a.0, a.1, a.2, a.3, b.0, b.1, b.2, b.3),
            overlaps(b.0, b.1, b.2, b.3, a.0, a.1, a.2, a.3),
        );
    }

    #[test]
    fn footprint_narrowing_ground() {
        let (fx, fy, fw, fh) = spike_footprint(100.0, 50.0, 60.0, 1.0);
        assert!((fw - 35.0).abs() < 1e-6);
        assert!((fh - 48.0).abs() < 1e-6);
        // Centered horizontally, resting on the ground
        assert!((fx - 107.5).abs() < 1e-6);
        assert!((fy + fh - GROUND_Y).abs() < 1e-6);
    }

    #[test]
    fn footprint_narrowing_ceiling() {
        let (_, fy, _, fh) = spike_footprint(100.0, 50.0, 60.0, -1.0);
        assert!((fy - CEIL_Y).abs() < 1e-6);
        assert!(fh > 0.0);
    }

    #[test]
    fn footprint_exact_span_hits_shifted_misses() {
        let (fx, fy, fw, fh) = spike_footprint(200.0, 50.0, 60.0, 1.0);
        // A box exactly spanning the footprint overlaps it
        assert!(overlaps(fx, fy, fw, fh, fx, fy, fw, fh));
        // Shifted fully outside by >= 1 unit on every axis: no overlap
        for (dx, dy) in [(fw + 1.0, 0.0), (-(fw + 1.0), 0.0), (0.0, fh + 1.0), (0.0, -(fh + 1.0))] {
            assert!(!overlaps(fx + dx, fy + dy, fw, fh, fx, fy, fw, fh));
        }
    }
}
