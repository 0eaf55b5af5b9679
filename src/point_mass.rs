//! Point masses: the particles a soft body is made of.

use crate::float::Float;
use crate::vec::{Vec, Vec2};

/// A simulated particle with explicit velocity.
///
/// A mass of `F::infinity()` marks an immovable anchor: integration,
/// damping and collision response never change its position or velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMass<F: Float> {
    pub position: Vec2<F>,
    pub velocity: Vec2<F>,
    pub force: Vec2<F>,
    pub mass: F,
}

impl<F: Float> PointMass<F> {
    pub fn new(position: Vec2<F>, mass: F) -> Self {
        PointMass {
            position,
            velocity: Vec2::zero(),
            force: Vec2::zero(),
            mass,
        }
    }

    /// An immovable point mass.
    pub fn fixed(position: Vec2<F>) -> Self {
        Self::new(position, F::infinity())
    }

    pub fn is_static(&self) -> bool {
        !self.mass.is_finite()
    }

    /// `1 / mass`, or zero for an infinite mass.
    pub fn inverse_mass(&self) -> F {
        if self.is_static() {
            F::zero()
        } else {
            F::one() / self.mass
        }
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        self.force += force;
    }

    /// Semi-implicit Euler step. The accumulated force is consumed either way.
    pub fn integrate(&mut self, dt: F) {
        if !self.is_static() {
            let accel = self.force.scale(dt / self.mass);
            self.velocity += accel;
            self.position += self.velocity.scale(dt);
        }
        self.force = Vec2::zero();
    }

    /// Multiply velocity by `factor`. Static point masses are left alone.
    pub fn dampen(&mut self, factor: F) {
        if !self.is_static() {
            self.velocity = self.velocity.scale(factor);
        }
    }
}
