//! Damped springs between point masses.

use crate::float::Float;
use crate::vec::{Vec, Vec2};

/// Distances at or below this are treated as coincident points.
pub(crate) const SPRING_EPSILON: f32 = 5e-7;

/// Force on endpoint A of a damped spring between A and B.
///
/// `(rest - current) * coefficient - closing_velocity * damping`, directed
/// from B to A. Apply the negation to B. Coincident endpoints yield zero.
pub fn spring_force<F: Float>(
    pos_a: Vec2<F>,
    vel_a: Vec2<F>,
    pos_b: Vec2<F>,
    vel_b: Vec2<F>,
    rest_distance: F,
    coefficient: F,
    damping: F,
) -> Vec2<F> {
    let dist = pos_a.distance(pos_b);
    if dist <= F::from_f32(SPRING_EPSILON) {
        return Vec2::zero();
    }
    let b_to_a = (pos_a - pos_b).scale(F::one() / dist);
    let stretch = rest_distance - dist;
    let rel_vel = (vel_a - vel_b).dot(b_to_a);
    b_to_a.scale(stretch * coefficient - rel_vel * damping)
}

/// A spring connecting two point masses of the same body, addressed by index.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalSpring<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_distance: F,
    pub coefficient: F,
    pub damping: F,
}

impl<F: Float> InternalSpring<F> {
    pub fn new(a: usize, b: usize, rest_distance: F, coefficient: F, damping: F) -> Self {
        InternalSpring { a, b, rest_distance, coefficient, damping }
    }
}
