//! Closed polygon shapes in a local frame.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// A closed polygon described by its local-frame vertices.
///
/// Vertices are expected in counter-clockwise order; edge normals derived
/// from this winding point outward.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosedShape<F: Float> {
    vertices: AllocVec<Vec2<F>>,
}

impl<F: Float> ClosedShape<F> {
    /// Build from vertices, recentered so their centroid sits at the origin.
    pub fn from_points(points: &[Vec2<F>]) -> Self {
        let mut vertices: AllocVec<Vec2<F>> = points.to_vec();
        if !vertices.is_empty() {
            let n = F::from_f32(vertices.len() as f32);
            let mut center = Vec2::zero();
            for v in &vertices {
                center += *v;
            }
            let center = center.scale(F::one() / n);
            for v in vertices.iter_mut() {
                *v -= center;
            }
        }
        ClosedShape { vertices }
    }

    /// Build from vertices as given, without recentering.
    pub fn from_points_uncentered(points: &[Vec2<F>]) -> Self {
        ClosedShape { vertices: points.to_vec() }
    }

    /// Regular polygon approximating a circle.
    pub fn circle(radius: F, count: usize) -> Self {
        let two_pi = F::two() * F::pi();
        let vertices = (0..count)
            .map(|i| {
                let angle = two_pi * F::from_f32(i as f32) / F::from_f32(count as f32);
                Vec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        ClosedShape { vertices }
    }

    /// Axis-aligned rectangle centered on the origin.
    pub fn rectangle(width: F, height: F) -> Self {
        let hw = width * F::half();
        let hh = height * F::half();
        ClosedShape {
            vertices: alloc::vec![
                Vec2::new(-hw, -hh),
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
            ],
        }
    }

    pub fn vertices(&self) -> &[Vec2<F>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Scale, rotate, then translate every vertex into world space.
    pub fn transform_vertices(&self, position: Vec2<F>, angle: F, scale: F) -> AllocVec<Vec2<F>> {
        let mut out = AllocVec::with_capacity(self.vertices.len());
        self.transform_vertices_into(position, angle, scale, &mut out);
        out
    }

    /// Like [`transform_vertices`](Self::transform_vertices) but reuses `out`.
    pub fn transform_vertices_into(
        &self,
        position: Vec2<F>,
        angle: F,
        scale: F,
        out: &mut AllocVec<Vec2<F>>,
    ) {
        out.clear();
        let (s, c) = (angle.sin(), angle.cos());
        out.extend(self.vertices.iter().map(|v| {
            let x = v.x * scale;
            let y = v.y * scale;
            Vec2::new(x * c - y * s + position.x, x * s + y * c + position.y)
        }));
    }

    /// Signed area: positive for counter-clockwise winding.
    pub fn area(&self) -> F {
        polygon_area(&self.vertices)
    }
}

/// Signed shoelace area of a closed polygon.
pub fn polygon_area<F: Float>(points: &[Vec2<F>]) -> F {
    let n = points.len();
    if n < 3 {
        return F::zero();
    }
    let mut sum = F::zero();
    for i in 0..n {
        let j = (i + 1) % n;
        sum = sum + points[i].cross(points[j]);
    }
    sum * F::half()
}

/// Intersection of segments `a1..a2` and `b1..b2`.
///
/// Returns the hit point and the fractions along each segment. Parallel or
/// collinear segments report no intersection.
pub fn segment_intersection<F: Float>(
    a1: Vec2<F>,
    a2: Vec2<F>,
    b1: Vec2<F>,
    b2: Vec2<F>,
) -> Option<(Vec2<F>, F, F)> {
    let da = a2 - a1;
    let db = b2 - b1;
    let denom = da.cross(db);
    if denom.is_near_zero(F::from_f32(1e-12)) {
        return None;
    }
    let offset = b1 - a1;
    let ua = offset.cross(db) / denom;
    let ub = offset.cross(da) / denom;
    let unit = F::zero()..=F::one();
    if unit.contains(&ua) && unit.contains(&ub) {
        Some((a1 + da.scale(ua), ua, ub))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_area_approx_pi_r_squared() {
        let shape = ClosedShape::circle(1.0f32, 32);
        let expected = core::f32::consts::PI;
        assert!((shape.area() - expected).abs() < 0.1, "area = {}", shape.area());
    }

    #[test]
    fn from_points_recenters() {
        let shape = ClosedShape::from_points(&[
            Vec2::new(10.0f64, 10.0),
            Vec2::new(12.0, 10.0),
            Vec2::new(12.0, 12.0),
            Vec2::new(10.0, 12.0),
        ]);
        assert_eq!(shape.vertices()[0], Vec2::new(-1.0, -1.0));
        assert_eq!(shape.vertices()[2], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn transform_applies_scale_rotation_translation() {
        let shape = ClosedShape::from_points_uncentered(&[Vec2::new(1.0f64, 0.0)]);
        let out = shape.transform_vertices(Vec2::new(5.0, 5.0), core::f64::consts::FRAC_PI_2, 2.0);
        assert!((out[0].x - 5.0).abs() < 1e-12);
        assert!((out[0].y - 7.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_segments_intersect() {
        let hit = segment_intersection(
            Vec2::new(0.0f64, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        );
        let (point, ua, ub) = hit.expect("segments cross");
        assert!((point.x - 1.0).abs() < 1e-12 && (point.y - 1.0).abs() < 1e-12);
        assert!((ua - 0.5).abs() < 1e-12 && (ub - 0.5).abs() < 1e-12);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let hit = segment_intersection(
            Vec2::new(0.0f32, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn rectangle_is_counter_clockwise() {
        assert!(ClosedShape::rectangle(2.0f32, 1.0).area() > 0.0);
    }
}
