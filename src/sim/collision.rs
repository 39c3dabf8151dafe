//! Axis-aligned box collision
//!
//! Every interaction in the game reduces to these two tests. Edges are
//! inclusive: boxes that merely touch count as overlapping.

use glam::Vec2;

/// True if box A (`pos_a`, `size_a`) intersects box B, touching edges included
#[inline]
pub fn overlaps(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x + size_a.x >= pos_b.x
        && pos_a.x <= pos_b.x + size_b.x
        && pos_a.y + size_a.y >= pos_b.y
        && pos_a.y <= pos_b.y + size_b.y
}

/// Proximity check used for aggro.
///
/// Compares the horizontal centers and the bottom edges of the two boxes
/// against independent x/y thresholds; both axes must be in range.
#[inline]
pub fn within_range(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2, range: Vec2) -> bool {
    let dx = (pos_a.x + size_a.x / 2.0) - (pos_b.x + size_b.x / 2.0);
    let dy = (pos_a.y + size_a.y) - (pos_b.y + size_b.y);
    dx.abs() <= range.x && dy.abs() <= range.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit() -> Vec2 {
        Vec2::ONE
    }

    #[test]
    fn test_touching_edges_overlap() {
        assert!(overlaps(Vec2::ZERO, unit(), Vec2::new(1.0, 0.0), unit()));
        assert!(overlaps(Vec2::ZERO, unit(), Vec2::new(1.0, 1.0), unit()));
    }

    #[test]
    fn test_separated_boxes_miss() {
        assert!(!overlaps(Vec2::ZERO, unit(), Vec2::new(1.01, 0.0), unit()));
        assert!(!overlaps(Vec2::ZERO, unit(), Vec2::new(0.0, -1.5), unit()));
    }

    #[test]
    fn test_zero_size_is_point_containment() {
        let wall = Vec2::new(10.0, 10.0);
        assert!(overlaps(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ZERO, wall));
        assert!(!overlaps(Vec2::new(11.0, 5.0), Vec2::ZERO, Vec2::ZERO, wall));
    }

    #[test]
    fn test_within_range_uses_bottom_edge() {
        // Same bottom edge, very different heights: y delta is zero
        let a_pos = Vec2::new(0.0, 0.0);
        let a_size = Vec2::new(10.0, 400.0);
        let b_pos = Vec2::new(0.0, 390.0);
        let b_size = Vec2::new(10.0, 10.0);
        assert!(within_range(a_pos, a_size, b_pos, b_size, Vec2::splat(1.0)));
    }

    #[test]
    fn test_within_range_needs_both_axes() {
        let s = Vec2::splat(35.0);
        let range = Vec2::splat(350.0);
        assert!(within_range(Vec2::ZERO, s, Vec2::new(350.0, 350.0), s, range));
        assert!(!within_range(Vec2::ZERO, s, Vec2::new(351.0, 0.0), s, range));
        assert!(!within_range(Vec2::ZERO, s, Vec2::new(0.0, -351.0), s, range));
    }

    fn rect() -> impl Strategy<Value = (Vec2, Vec2)> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| (Vec2::new(x, y), Vec2::new(w, h)))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric((pa, sa) in rect(), (pb, sb) in rect()) {
            prop_assert_eq!(overlaps(pa, sa, pb, sb), overlaps(pb, sb, pa, sa));
        }

        #[test]
        fn prop_box_overlaps_itself((p, s) in rect()) {
            prop_assert!(overlaps(p, s, p, s));
        }
    }
}
