//! Broad-phase grid: per-axis occupancy bitmasks over the world limits.

use crate::aabb::Aabb;
use crate::float::Float;
use crate::vec::Vec2;

/// Cells per axis. One bit per cell in a `u32` mask.
pub const GRID_SIZE: usize = 32;

/// Fixed 32x32 logical grid laid over the world limits.
///
/// Bodies are not stored in the grid; each body only records which columns
/// and rows its bounding box spans, so two bodies can be rejected with two
/// `&` operations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BroadPhaseGrid<F: Float> {
    limits: Aabb<F>,
    cell_size: Vec2<F>,
}

impl<F: Float> BroadPhaseGrid<F> {
    pub fn new(limits: Aabb<F>) -> Self {
        let size = limits.size();
        let cells = F::from_f32(GRID_SIZE as f32);
        BroadPhaseGrid {
            limits,
            cell_size: Vec2::new(size.x / cells, size.y / cells),
        }
    }

    pub fn limits(&self) -> &Aabb<F> {
        &self.limits
    }

    pub fn cell_size(&self) -> Vec2<F> {
        self.cell_size
    }

    /// Column and row masks for `aabb`.
    ///
    /// Invalid boxes, NaN-producing arithmetic, boxes entirely outside the
    /// limits and limits without positive extent give 0, which excludes the
    /// body from collision that step.
    pub fn bitmasks(&self, aabb: &Aabb<F>) -> (u32, u32) {
        if !aabb.is_valid() {
            return (0, 0);
        }
        let x = axis_mask(aabb.min.x, aabb.max.x, self.limits.min.x, self.cell_size.x);
        let y = axis_mask(aabb.min.y, aabb.max.y, self.limits.min.y, self.cell_size.y);
        if x == 0 || y == 0 {
            (0, 0)
        } else {
            (x, y)
        }
    }
}

fn axis_mask<F: Float>(min: F, max: F, origin: F, cell: F) -> u32 {
    if !(cell > F::zero() && cell.is_finite()) {
        return 0;
    }
    let first = ((min - origin) / cell).floor();
    let last = ((max - origin) / cell).floor();
    if first.is_nan() || last.is_nan() {
        return 0;
    }
    let top = (GRID_SIZE - 1) as f64;
    let (first, last) = (first.to_f64(), last.to_f64());
    if last < 0.0 || first > top {
        return 0;
    }
    let first = first.max(0.0) as u32;
    let last = last.min(top) as u32;
    // bits first..=last
    let width = last - first + 1;
    let span = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
    span << first
}

/// Both axis masks overlap.
pub fn masks_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    (a.0 & b.0) != 0 && (a.1 & b.1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> BroadPhaseGrid<f32> {
        BroadPhaseGrid::new(Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(32.0, 32.0)))
    }

    #[test]
    fn inside_body_sets_bits_on_both_axes() {
        let (x, y) = grid().bitmasks(&Aabb::new(Vec2::new(1.5, 4.2), Vec2::new(3.5, 4.8)));
        assert_eq!(x, 0b1110);
        assert_eq!(y, 1 << 4);
    }

    #[test]
    fn outside_body_has_empty_mask() {
        let g = grid();
        assert_eq!(g.bitmasks(&Aabb::new(Vec2::new(40.0, 1.0), Vec2::new(45.0, 2.0))), (0, 0));
        assert_eq!(g.bitmasks(&Aabb::new(Vec2::new(-9.0, -9.0), Vec2::new(-1.0, -1.0))), (0, 0));
        assert_eq!(g.bitmasks(&Aabb::invalid()), (0, 0));
    }

    #[test]
    fn straddling_body_is_clamped() {
        let (x, _) = grid().bitmasks(&Aabb::new(Vec2::new(-5.0, 1.0), Vec2::new(1.0, 2.0)));
        assert_eq!(x, 0b11);
        let (x, _) = grid().bitmasks(&Aabb::new(Vec2::new(-5.0, 1.0), Vec2::new(50.0, 2.0)));
        assert_eq!(x, u32::MAX);
    }

    #[test]
    fn degenerate_limits_give_empty_mask() {
        let flat = BroadPhaseGrid::new(Aabb::new(Vec2::new(0.0f32, 0.0), Vec2::new(0.0, 0.0)));
        assert_eq!(flat.bitmasks(&Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0))), (0, 0));
    }

    #[test]
    fn zero_width_limits_never_fill_a_mask() {
        let sliver = BroadPhaseGrid::new(Aabb::new(Vec2::new(0.0f64, -20.0), Vec2::new(0.0, 20.0)));
        let straddling = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        assert_eq!(sliver.bitmasks(&straddling), (0, 0));
    }

    #[test]
    fn overlap_requires_both_axes() {
        assert!(masks_overlap((0b110, 0b1), (0b100, 0b11)));
        assert!(!masks_overlap((0b110, 0b1), (0b100, 0b10)));
    }
}
