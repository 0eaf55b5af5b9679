//! Axis-aligned bounding boxes with an explicit valid/invalid state.

use crate::float::Float;
use crate::vec::{Vec, Vec2};

/// Axis-aligned bounding box.
///
/// A freshly created box is invalid: it contains nothing and intersects
/// nothing until the first point is added.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
    valid: bool,
}

impl<F: Float> Aabb<F> {
    /// Box spanning `min..=max`. Components are reordered if needed.
    pub fn new(min: Vec2<F>, max: Vec2<F>) -> Self {
        Aabb { min: min.min(max), max: min.max(max), valid: true }
    }

    /// An empty box.
    pub fn invalid() -> Self {
        Aabb { min: Vec2::zero(), max: Vec2::zero(), valid: false }
    }

    /// Smallest box containing every point. Invalid for an empty slice.
    pub fn from_points(points: &[Vec2<F>]) -> Self {
        let mut aabb = Self::invalid();
        for &p in points {
            aabb.expand_to_include(p);
        }
        aabb
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn clear(&mut self) {
        self.valid = false;
    }

    pub fn expand_to_include(&mut self, point: Vec2<F>) {
        if self.valid {
            self.min = self.min.min(point);
            self.max = self.max.max(point);
        } else {
            self.min = point;
            self.max = point;
            self.valid = true;
        }
    }

    pub fn contains(&self, point: Vec2<F>) -> bool {
        self.valid
            && point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Aabb<F>) -> bool {
        self.valid
            && other.valid
            && self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn size(&self) -> Vec2<F> {
        if self.valid { self.max - self.min } else { Vec2::zero() }
    }
}

impl<F: Float> Default for Aabb<F> {
    fn default() -> Self {
        Self::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_box_is_inert() {
        let empty = Aabb::<f32>::invalid();
        let unit = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(!empty.contains(Vec2::zero()));
        assert!(!empty.intersects(&unit));
        assert!(!unit.intersects(&empty));
    }

    #[test]
    fn first_point_validates() {
        let mut aabb = Aabb::<f32>::invalid();
        aabb.expand_to_include(Vec2::new(2.0, 3.0));
        assert!(aabb.is_valid());
        assert_eq!(aabb.min, aabb.max);
        aabb.expand_to_include(Vec2::new(-1.0, 5.0));
        assert_eq!(aabb.min, Vec2::new(-1.0, 3.0));
        assert_eq!(aabb.max, Vec2::new(2.0, 5.0));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::new(Vec2::new(0.0f64, 0.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(1.0f64, 0.5), Vec2::new(2.0, 2.0));
        let c = Aabb::new(Vec2::new(1.1f64, 0.5), Vec2::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
