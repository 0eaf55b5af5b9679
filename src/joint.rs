//! Joints linking attachment points on two bodies.

use crate::body::Body;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::handle::BodyHandle;
use crate::spring::spring_force;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// One end of a joint.
#[derive(Clone, Debug, PartialEq)]
pub enum JointLink<F: Float> {
    /// The whole body, attached at its derived center.
    Body(BodyHandle),
    /// A single point mass.
    Point { body: BodyHandle, index: usize },
    /// A point along edge `index -> index + 1`, `ratio` of the way along.
    Edge { body: BodyHandle, index: usize, ratio: F },
    /// Weighted average of several point masses.
    Shape { body: BodyHandle, points: AllocVec<(usize, F)> },
}

impl<F: Float> JointLink<F> {
    pub fn body(&self) -> BodyHandle {
        match self {
            JointLink::Body(body)
            | JointLink::Point { body, .. }
            | JointLink::Edge { body, .. }
            | JointLink::Shape { body, .. } => *body,
        }
    }

    pub(crate) fn validate(&self, body: &Body<F>) -> Result<(), PhysicsError> {
        let count = body.point_count();
        let check = |index: usize| {
            if index < count {
                Ok(())
            } else {
                Err(PhysicsError::PointMassOutOfBounds { index, count })
            }
        };
        match self {
            JointLink::Body(_) => Ok(()),
            JointLink::Point { index, .. } => check(*index),
            JointLink::Edge { index, ratio, .. } => {
                check(*index)?;
                if *ratio < F::zero() || *ratio > F::one() || ratio.is_nan() {
                    return Err(PhysicsError::InvalidEdgeRatio);
                }
                Ok(())
            }
            JointLink::Shape { points, .. } => {
                let total = points.iter().fold(F::zero(), |acc, &(_, w)| acc + w);
                if points.is_empty() || !(total > F::zero()) {
                    return Err(PhysicsError::EmptyShapeLink);
                }
                points.iter().try_for_each(|&(index, _)| check(index))
            }
        }
    }

    fn edge_ends(body: &Body<F>, index: usize) -> (usize, usize) {
        (index, (index + 1) % body.point_count())
    }

    fn shape_weight(points: &[(usize, F)]) -> F {
        points.iter().fold(F::zero(), |acc, &(_, w)| acc + w)
    }

    /// World-space attachment point.
    pub fn position(&self, body: &Body<F>) -> Vec2<F> {
        match self {
            JointLink::Body(_) => body.derived_position(),
            JointLink::Point { index, .. } => body.point_mass(*index).position,
            JointLink::Edge { index, ratio, .. } => {
                let (i, j) = Self::edge_ends(body, *index);
                body.point_mass(i).position.lerp(body.point_mass(j).position, *ratio)
            }
            JointLink::Shape { points, .. } => {
                let total = Self::shape_weight(points);
                points
                    .iter()
                    .fold(Vec2::zero(), |acc, &(i, w)| acc + body.point_mass(i).position.scale(w))
                    .scale(F::one() / total)
            }
        }
    }

    /// World-space velocity of the attachment point.
    pub fn velocity(&self, body: &Body<F>) -> Vec2<F> {
        match self {
            JointLink::Body(_) => body.derived_velocity(),
            JointLink::Point { index, .. } => body.point_mass(*index).velocity,
            JointLink::Edge { index, ratio, .. } => {
                let (i, j) = Self::edge_ends(body, *index);
                body.point_mass(i).velocity.lerp(body.point_mass(j).velocity, *ratio)
            }
            JointLink::Shape { points, .. } => {
                let total = Self::shape_weight(points);
                points
                    .iter()
                    .fold(Vec2::zero(), |acc, &(i, w)| acc + body.point_mass(i).velocity.scale(w))
                    .scale(F::one() / total)
            }
        }
    }

    /// Mass behind the link; infinite if any participating point is.
    pub fn mass(&self, body: &Body<F>) -> F {
        match self {
            JointLink::Body(_) => body.total_mass(),
            JointLink::Point { index, .. } => body.point_mass(*index).mass,
            JointLink::Edge { index, .. } => {
                let (i, j) = Self::edge_ends(body, *index);
                body.point_mass(i).mass + body.point_mass(j).mass
            }
            JointLink::Shape { points, .. } => points
                .iter()
                .fold(F::zero(), |acc, &(i, _)| acc + body.point_mass(i).mass),
        }
    }

    pub fn is_static(&self, body: &Body<F>) -> bool {
        !self.mass(body).is_finite()
    }

    /// Apply `force` at the attachment point.
    ///
    /// Edge links split the force between the two endpoints by the ratio and
    /// add a torque about the body center that tapers to zero at the edge
    /// ends. Shape links split by weight and add the untapered torque.
    pub fn apply_force(&self, body: &mut Body<F>, force: Vec2<F>) {
        match self {
            JointLink::Body(_) => {
                let center = body.derived_position();
                body.add_global_force(force, center);
            }
            JointLink::Point { index, .. } => body.point_mass_mut(*index).apply_force(force),
            JointLink::Edge { index, ratio, .. } => {
                let (i, j) = Self::edge_ends(body, *index);
                let at = self.position(body);
                body.point_mass_mut(i).apply_force(force.scale(F::one() - *ratio));
                body.point_mass_mut(j).apply_force(force.scale(*ratio));
                let taper = F::one() - (F::two() * *ratio - F::one()).abs();
                let torque = (at - body.derived_position()).cross(force) * taper;
                body.apply_torque(torque);
            }
            JointLink::Shape { points, .. } => {
                let total = Self::shape_weight(points);
                let at = self.position(body);
                for &(i, w) in points {
                    body.point_mass_mut(i).apply_force(force.scale(w / total));
                }
                let torque = (at - body.derived_position()).cross(force);
                body.apply_torque(torque);
            }
        }
    }

    /// Shift the attachment point by `offset`. Immovable points stay put.
    pub fn translate(&self, body: &mut Body<F>, offset: Vec2<F>) {
        let shift = |body: &mut Body<F>, i: usize| {
            let pm = body.point_mass_mut(i);
            if !pm.is_static() {
                pm.position += offset;
            }
        };
        match self {
            JointLink::Body(_) => {
                for i in 0..body.point_count() {
                    shift(body, i);
                }
            }
            JointLink::Point { index, .. } => shift(body, *index),
            JointLink::Edge { index, .. } => {
                let (i, j) = Self::edge_ends(body, *index);
                shift(body, i);
                shift(body, j);
            }
            JointLink::Shape { points, .. } => {
                for &(i, _) in points {
                    shift(body, i);
                }
            }
        }
    }
}

/// Distance a joint maintains between its links.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RestDistance<F: Float> {
    Fixed(F),
    /// Only distances outside `[min, max]` are corrected.
    Ranged { min: F, max: F },
}

impl<F: Float> RestDistance<F> {
    /// Target for the current distance, or `None` while inside the band.
    pub fn target(&self, distance: F) -> Option<F> {
        match *self {
            RestDistance::Fixed(d) => Some(d),
            RestDistance::Ranged { min, max } => {
                if distance >= min && distance <= max {
                    None
                } else {
                    Some(distance.clamp(min, max))
                }
            }
        }
    }
}

/// How a joint pulls its links together.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JointKind<F: Float> {
    /// Damped spring force.
    Spring { coefficient: F, damping: F },
    /// Direct positional correction, split by inverse mass.
    Distance { stiffness: F },
}

/// A constraint between two links, owned by the world.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyJoint<F: Float> {
    pub link1: JointLink<F>,
    pub link2: JointLink<F>,
    pub kind: JointKind<F>,
    /// `None` until the world fills in the distance at insertion time.
    pub rest_distance: Option<RestDistance<F>>,
    /// Lets the joined bodies pass through each other: the pair is left out
    /// of collision detection.
    pub allow_collisions: bool,
    pub enabled: bool,
}

impl<F: Float> BodyJoint<F> {
    pub fn new(link1: JointLink<F>, link2: JointLink<F>, kind: JointKind<F>) -> Self {
        BodyJoint {
            link1,
            link2,
            kind,
            rest_distance: None,
            allow_collisions: false,
            enabled: true,
        }
    }

    /// Spring joint with the given constants.
    pub fn spring(link1: JointLink<F>, link2: JointLink<F>, coefficient: F, damping: F) -> Self {
        Self::new(link1, link2, JointKind::Spring { coefficient, damping })
    }

    pub fn with_rest_distance(mut self, rest: RestDistance<F>) -> Self {
        self.rest_distance = Some(rest);
        self
    }

    pub fn with_allow_collisions(mut self, allow: bool) -> Self {
        self.allow_collisions = allow;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True if this joint links `a` and `b` (in either order).
    pub fn joins(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (b1, b2) = (self.link1.body(), self.link2.body());
        (b1 == a && b2 == b) || (b1 == b && b2 == a)
    }

    pub(crate) fn validate(&self) -> Result<(), PhysicsError> {
        if let Some(RestDistance::Ranged { min, max }) = self.rest_distance {
            if min > max {
                return Err(PhysicsError::InvalidRestRange);
            }
        }
        Ok(())
    }

    /// Pull the two links toward the rest distance. Disabled joints do nothing.
    pub(crate) fn resolve(&self, bodies: &mut [Option<Body<F>>]) {
        if !self.enabled {
            return;
        }
        let (h1, h2) = (self.link1.body().0, self.link2.body().0);
        let (p1, v1, m1, p2, v2, m2) = match (&bodies[h1], &bodies[h2]) {
            (Some(b1), Some(b2)) => (
                self.link1.position(b1),
                self.link1.velocity(b1),
                self.link1.mass(b1),
                self.link2.position(b2),
                self.link2.velocity(b2),
                self.link2.mass(b2),
            ),
            _ => return,
        };
        if !m1.is_finite() && !m2.is_finite() {
            return;
        }

        let distance = p1.distance(p2);
        let rest = match self.rest_distance {
            Some(rest) => rest,
            None => RestDistance::Fixed(distance),
        };
        let Some(target) = rest.target(distance) else {
            return;
        };

        match self.kind {
            JointKind::Spring { coefficient, damping } => {
                let force = spring_force(p1, v1, p2, v2, target, coefficient, damping);
                if let Some(b1) = bodies[h1].as_mut() {
                    self.link1.apply_force(b1, force);
                }
                if let Some(b2) = bodies[h2].as_mut() {
                    self.link2.apply_force(b2, -force);
                }
            }
            JointKind::Distance { stiffness } => {
                if distance.is_near_zero(F::from_f32(1e-10)) {
                    return;
                }
                let inv1 = if m1.is_finite() { F::one() / m1 } else { F::zero() };
                let inv2 = if m2.is_finite() { F::one() / m2 } else { F::zero() };
                let w_total = inv1 + inv2;
                let error = distance - target;
                let correction = (p2 - p1).scale(error * stiffness / distance);
                if let Some(b1) = bodies[h1].as_mut() {
                    self.link1.translate(b1, correction.scale(inv1 / w_total));
                }
                if let Some(b2) = bodies[h2].as_mut() {
                    self.link2.translate(b2, -correction.scale(inv2 / w_total));
                }
            }
        }
    }
}
