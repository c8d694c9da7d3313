//! Axis-aligned collision and near-miss tests
//!
//! Every hazard exposes a [`Rect`] in logical units. Bounds are usually
//! inset from the drawn sprite so grazing contacts feel fair.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in logical units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by the given insets on each side
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            w: self.w - left - right,
            h: self.h - top - bottom,
        }
    }
}

/// Strict overlap: boxes that only touch along an edge do not collide
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// A hazard has just slipped past behind the player.
///
/// True when the hazard's right edge is behind the player's left edge by at
/// most `threshold`, and the vertical spans overlap once the hazard is grown
/// by `threshold` above and below.
pub fn near_miss(player: &Rect, hazard: &Rect, threshold: f32) -> bool {
    let gap = player.x - hazard.right();
    if gap <= 0.0 || gap > threshold {
        return false;
    }
    hazard.y - threshold < player.bottom() && hazard.bottom() + threshold > player.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
        assert!(overlaps(&a, &Rect::new(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn test_near_miss_band() {
        let player = Rect::new(85.0, 285.0, 40.0, 60.0);
        // Right edge 5 behind the player, same height
        assert!(near_miss(&player, &Rect::new(20.0, 310.0, 60.0, 40.0), 15.0));
        // Too far behind
        assert!(!near_miss(&player, &Rect::new(0.0, 310.0, 60.0, 40.0), 15.0));
        // Still overlapping horizontally
        assert!(!near_miss(&player, &Rect::new(30.0, 310.0, 60.0, 40.0), 15.0));
        // Vertically far away
        assert!(!near_miss(&player, &Rect::new(20.0, 100.0, 60.0, 40.0), 15.0));
    }

    #[test]
    fn test_near_miss_vertical_tolerance() {
        // Player hopping 10 above a hazard still counts
        let player = Rect::new(85.0, 200.0, 40.0, 60.0);
        assert!(near_miss(&player, &Rect::new(20.0, 270.0, 60.0, 30.0), 15.0));
        assert!(!near_miss(&player, &Rect::new(20.0, 280.0, 60.0, 30.0), 15.0));
    }

    #[test]
    fn test_inset() {
        let r = Rect::new(80.0, 280.0, 50.0, 70.0).inset(5.0, 5.0, 5.0, 5.0);
        assert_eq!(r, Rect::new(85.0, 285.0, 40.0, 60.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 0.0f32..50.0, ah in 0.0f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 0.0f32..50.0, bh in 0.0f32..50.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_near_miss_never_while_overlapping(
            px in 0.0f32..200.0, hx in -100.0f32..300.0, hy in 200.0f32..350.0,
        ) {
            let player = Rect::new(px, 250.0, 40.0, 60.0);
            let hazard = Rect::new(hx, hy, 60.0, 30.0);
            if overlaps(&player, &hazard) {
                prop_assert!(!near_miss(&player, &hazard, 15.0));
            }
        }
    }
}
