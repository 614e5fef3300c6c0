//! Grid snapping for node placement.
//!
//! The grid moves with the canvas when it is panned, so snapping is done
//! relative to the accumulated pan offset.

use egui::{Pos2, Vec2};

/// Tolerance for treating a coordinate as already lying on a grid line.
const SNAP_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub spacing: f32,
    pub offset: Vec2,
}

impl Grid {
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Moves `pos` down and left onto the nearest grid intersection.
    pub fn snap(&self, pos: Pos2) -> Pos2 {
        Pos2::new(
            self.snap_axis(pos.x, self.offset.x),
            self.snap_axis(pos.y, self.offset.y),
        )
    }

    pub fn is_aligned(&self, pos: Pos2) -> bool {
        self.snap(pos) == pos
    }

    /// Per axis, the largest grid multiple not exceeding half of `size`
    /// (halves taken in whole units).
    pub fn centering_offset(&self, size: Vec2) -> Vec2 {
        let axis = |extent: f32| {
            let half = (extent / 2.0).floor();
            half - half.rem_euclid(self.spacing)
        };
        Vec2::new(axis(size.x), axis(size.y))
    }

    fn snap_axis(&self, value: f32, offset: f32) -> f32 {
        let cells = ((value - offset) / self.spacing + SNAP_EPSILON).floor();
        offset + cells * self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn snaps_down_to_grid_lines() {
        let grid = Grid::new(10.0);
        assert_eq!(grid.snap(Pos2::new(37.0, 12.5)), Pos2::new(30.0, 10.0));
        assert_eq!(grid.snap(Pos2::new(-3.0, 0.0)), Pos2::new(-10.0, 0.0));
    }

    #[test]
    fn snapping_follows_the_pan_offset() {
        let grid = Grid::new(10.0).with_offset(Vec2::new(4.0, -2.0));
        assert_eq!(grid.snap(Pos2::new(37.0, 12.5)), Pos2::new(34.0, 8.0));
    }

    #[test]
    fn centering_offset_matches_reference_node() {
        let grid = Grid::new(10.0);
        assert_eq!(
            grid.centering_offset(Vec2::new(200.0, 37.0)),
            Vec2::new(100.0, 10.0)
        );
    }

    #[test]
    fn near_grid_values_land_exactly_on_the_line() {
        let grid = Grid::new(10.0);
        assert_eq!(grid.snap(Pos2::new(9.9999, 19.99995)), Pos2::new(10.0, 20.0));
        assert!(!grid.is_aligned(Pos2::new(9.9999, 20.0)));
    }

    proptest! {
        #[test]
        fn snapping_is_idempotent(
            x in -5000i32..5000,
            y in -5000i32..5000,
            ox in -50i32..50,
            oy in -50i32..50,
        ) {
            let grid = Grid::new(10.0).with_offset(Vec2::new(ox as f32, oy as f32));
            let once = grid.snap(Pos2::new(x as f32, y as f32));
            prop_assert_eq!(grid.snap(once), once);
            prop_assert!(grid.is_aligned(once));
        }
    }
}
