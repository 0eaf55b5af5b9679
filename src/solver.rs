//! Collision response: positional correction plus a restitution/friction
//! impulse per record.

use crate::body::Body;
use crate::collision::BodyCollisionInformation;
use crate::config::WorldConfig;
use crate::float::Float;
use crate::material::MaterialMatrix;
use crate::observer::CollisionObserver;
use crate::point_mass::PointMass;
use crate::vec::{Vec, Vec2};

/// Approach speeds at or below this along the normal receive an impulse.
const IMPULSE_VELOCITY_TOLERANCE: f32 = 1e-4;

/// Resolve `records` in order. Each record sees the velocities left by the
/// ones before it, but penetration and normal stay as detected.
pub(crate) fn resolve_collisions<F: Float, O: CollisionObserver<F>>(
    records: &[BodyCollisionInformation<F>],
    bodies: &mut [Option<Body<F>>],
    materials: &MaterialMatrix<F>,
    config: &WorldConfig<F>,
    observer: &mut O,
) -> usize {
    let mut resolved = 0;
    for info in records {
        let Some((a, b)) = pair_mut(bodies, info.body_a.index(), info.body_b.index()) else {
            continue;
        };
        if resolve_one(info, a, b, materials, config, observer) {
            resolved += 1;
        }
    }
    resolved
}

fn resolve_one<F: Float, O: CollisionObserver<F>>(
    info: &BodyCollisionInformation<F>,
    a: &mut Body<F>,
    b: &mut Body<F>,
    materials: &MaterialMatrix<F>,
    config: &WorldConfig<F>,
    observer: &mut O,
) -> bool {
    let normal = info.normal;
    let d = info.edge_d;
    let a_pm = a.point_mass(info.point_a);
    let (b1, b2) = (b.point_mass(info.b_point1), b.point_mass(info.b_point2));

    let b_velocity = (b1.velocity + b2.velocity).scale(F::half());
    let relative_velocity = a_pm.velocity - b_velocity;
    let relative_dot = relative_velocity.dot(normal);

    let pair = materials.pair(a.material, b.material);
    if !pair.accepts(info, relative_dot) {
        return false;
    }
    if info.penetration > config.penetration_threshold {
        tracing::trace!(
            "skipping point {} of body {}: penetration {:?} over threshold",
            info.point_a,
            info.body_a.index(),
            info.penetration
        );
        observer.on_penetration_exceeded(info);
        return false;
    }

    let a_mass = a_pm.mass;
    let b_mass = b1.mass + b2.mass;
    let a_finite = a_mass.is_finite();
    let b_finite = b_mass.is_finite();
    if !a_finite && !b_finite {
        return false;
    }

    let penetration = info.penetration;
    let (a_move, b_move) = if !a_finite {
        (F::zero(), penetration + config.separation_epsilon)
    } else if !b_finite {
        (penetration + config.separation_epsilon, F::zero())
    } else {
        let total = a_mass + b_mass;
        (penetration * (b_mass / total), penetration * (a_mass / total))
    };
    let (b1_share, b2_share) = (F::one() - d, d);

    nudge(a.point_mass_mut(info.point_a), normal.scale(a_move), Vec2::zero());
    nudge(b.point_mass_mut(info.b_point1), -normal.scale(b_move * b1_share), Vec2::zero());
    nudge(b.point_mass_mut(info.b_point2), -normal.scale(b_move * b2_share), Vec2::zero());

    if relative_dot <= F::from_f32(IMPULSE_VELOCITY_TOLERANCE) {
        let a_inv = if a_finite { F::one() / a_mass } else { F::zero() };
        let b_inv = if b_finite { F::one() / b_mass } else { F::zero() };
        let denominator = a_inv + b_inv;

        let elasticity = pair.elasticity;
        let j = -(F::one() + elasticity) * relative_dot / denominator;
        let tangent = normal.perp();
        let f = relative_velocity.dot(tangent) * pair.friction / denominator;
        let impulse = normal.scale(j) - tangent.scale(f);

        nudge(a.point_mass_mut(info.point_a), Vec2::zero(), impulse.scale(a_inv));
        let b_impulse = -impulse.scale(b_inv);
        nudge(b.point_mass_mut(info.b_point1), Vec2::zero(), b_impulse.scale(b1_share));
        nudge(b.point_mass_mut(info.b_point2), Vec2::zero(), b_impulse.scale(b2_share));
    }
    true
}

/// Shift position and velocity of a movable point mass.
fn nudge<F: Float>(pm: &mut PointMass<F>, offset: Vec2<F>, delta_v: Vec2<F>) {
    if pm.is_static() {
        return;
    }
    pm.position += offset;
    pm.velocity += delta_v;
}

/// Two distinct live bodies borrowed mutably at once.
fn pair_mut<F: Float>(
    bodies: &mut [Option<Body<F>>],
    a: usize,
    b: usize,
) -> Option<(&mut Body<F>, &mut Body<F>)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        Some((lo[a].as_mut()?, hi[0].as_mut()?))
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        Some((hi[0].as_mut()?, lo[b].as_mut()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::detect;
    use crate::handle::BodyHandle;
    use crate::material::MaterialPair;
    use crate::shape::ClosedShape;
    use alloc::vec::Vec as AllocVec;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Counter {
        exceeded: usize,
    }

    impl CollisionObserver<f64> for Counter {
        fn on_penetration_exceeded(&mut self, _info: &BodyCollisionInformation<f64>) {
            self.exceeded += 1;
        }
    }

    fn polygon(points: &[Vec2<f64>], mass: f64) -> Body<f64> {
        let shape = ClosedShape::from_points_uncentered(points);
        Body::new(&shape, mass, Vec2::zero(), 0.0, 1.0, false).unwrap()
    }

    fn scene(box_mass: f64) -> (AllocVec<Option<Body<f64>>>, AllocVec<BodyCollisionInformation<f64>>) {
        let tip = polygon(&[Vec2::new(1.0, 1.9), Vec2::new(2.0, 3.0), Vec2::new(0.0, 3.0)], 1.0);
        let square = polygon(
            &[Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)],
            box_mass,
        );
        let mut records = AllocVec::new();
        detect(&tip, BodyHandle(0), &square, BodyHandle(1), 0.3, &mut records);
        (alloc::vec![Some(tip), Some(square)], records)
    }

    fn materials() -> MaterialMatrix<f64> {
        MaterialMatrix::new(MaterialPair::new(0.3, 0.2))
    }

    #[test]
    fn correction_splits_by_mass() {
        let (mut bodies, records) = scene(1.0);
        let config = WorldConfig::new();
        let n = resolve_collisions(&records, &mut bodies, &materials(), &config, &mut Counter::default());
        assert_eq!(n, 1);

        let tip = bodies[0].as_ref().unwrap();
        let square = bodies[1].as_ref().unwrap();
        assert_relative_eq!(tip.point_mass(0).position.y, 1.9 + 0.2 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(square.point_mass(2).position.y, 2.0 - 1.0 / 60.0, epsilon = 1e-9);
        assert_relative_eq!(square.point_mass(3).position.y, 2.0 - 1.0 / 60.0, epsilon = 1e-9);
    }

    #[test]
    fn static_side_pushes_other_out_fully() {
        let (mut bodies, records) = scene(f64::INFINITY);
        let config = WorldConfig::new().with_separation_epsilon(0.01);
        resolve_collisions(&records, &mut bodies, &materials(), &config, &mut Counter::default());

        let tip = bodies[0].as_ref().unwrap();
        let square = bodies[1].as_ref().unwrap();
        assert_relative_eq!(tip.point_mass(0).position.y, 2.01, epsilon = 1e-9);
        assert_eq!(square.point_mass(2).position, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn over_threshold_is_reported_not_resolved() {
        let (mut bodies, records) = scene(1.0);
        let config = WorldConfig::new().with_penetration_threshold(0.05);
        let mut counter = Counter::default();
        let n = resolve_collisions(&records, &mut bodies, &materials(), &config, &mut counter);
        assert_eq!(n, 0);
        assert_eq!(counter.exceeded, 1);
        assert_eq!(bodies[0].as_ref().unwrap().point_mass(0).position, Vec2::new(1.0, 1.9));
    }

    #[test]
    fn approaching_point_bounces() {
        let (mut bodies, records) = scene(1.0);
        bodies[0].as_mut().unwrap().point_mass_mut(0).velocity = Vec2::new(0.0, -3.0);
        let mut matrix = materials();
        matrix.set_data(0, 0, 0.0, 1.0).unwrap();
        resolve_collisions(&records, &mut bodies, &matrix, &WorldConfig::new(), &mut Counter::default());

        // j = -(1 + 1) * -3 / (1 + 1/2) = 4
        let tip = bodies[0].as_ref().unwrap();
        let square = bodies[1].as_ref().unwrap();
        assert_relative_eq!(tip.point_mass(0).velocity.y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(square.point_mass(2).velocity.y, -1.0, epsilon = 1e-9);
        assert_relative_eq!(square.point_mass(3).velocity.y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn filter_can_veto() {
        let (mut bodies, records) = scene(1.0);
        let mut matrix = materials();
        matrix
            .set_filter(0, 0, Some(alloc::sync::Arc::new(|_: &BodyCollisionInformation<f64>, _: f64| false)))
            .unwrap();
        let n = resolve_collisions(&records, &mut bodies, &matrix, &WorldConfig::new(), &mut Counter::default());
        assert_eq!(n, 0);
        assert_eq!(bodies[0].as_ref().unwrap().point_mass(0).position, Vec2::new(1.0, 1.9));
    }

    #[test]
    fn pair_mut_rejects_aliasing() {
        let (mut bodies, _) = scene(1.0);
        assert!(pair_mut(&mut bodies, 1, 1).is_none());
        assert!(pair_mut(&mut bodies, 0, 5).is_none());
        let (x, y) = pair_mut(&mut bodies, 1, 0).unwrap();
        assert_eq!(x.point_count(), 4);
        assert_eq!(y.point_count(), 3);
    }
}
