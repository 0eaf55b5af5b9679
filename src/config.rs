//! Configuration types for the world simulation.

use crate::aabb::Aabb;
use crate::float::Float;
use crate::vec::Vec2;

/// Configuration for a [`World`](crate::World).
///
/// # Builder Pattern
/// ```
/// use wobble::config::WorldConfig;
/// use wobble::vec::Vec2;
///
/// let config: WorldConfig<f32> = WorldConfig::new()
///     .with_penetration_threshold(0.5)
///     .with_velocity_damping(0.8)
///     .with_world_limits(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0))
///     .with_default_material(0.4, 0.1);
/// ```
#[derive(Clone, Debug)]
pub struct WorldConfig<F: Float> {
    /// Penetrations deeper than this are treated as tunneling and skipped
    /// rather than resolved. Default: 0.3.
    pub penetration_threshold: F,
    /// Fraction of velocity kept after one second of damping, in (0, 1].
    /// Bodies may override it. Default: 0.9.
    pub velocity_damping: F,
    /// Extra separation added when one side of a contact is immovable.
    /// Default: 0.001.
    pub separation_epsilon: F,
    /// Region covered by the broad-phase grid. Default: (-20, -20)..(20, 20).
    pub world_limits: Aabb<F>,
    /// Friction of newly created material pairs. Default: 0.3.
    pub default_friction: F,
    /// Elasticity (restitution) of newly created material pairs. Default: 0.2.
    pub default_elasticity: F,
    /// Grow body bounds to cover the step's motion. Default: true.
    pub conservative_aabb: bool,
}

impl<F: Float> WorldConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        WorldConfig {
            penetration_threshold: F::from_f32(0.3),
            velocity_damping: F::from_f32(0.9),
            separation_epsilon: F::from_f32(0.001),
            world_limits: Aabb::new(
                Vec2::new(F::from_f32(-20.0), F::from_f32(-20.0)),
                Vec2::new(F::from_f32(20.0), F::from_f32(20.0)),
            ),
            default_friction: F::from_f32(0.3),
            default_elasticity: F::from_f32(0.2),
            conservative_aabb: true,
        }
    }

    /// Set the tunneling penetration threshold.
    pub fn with_penetration_threshold(mut self, threshold: F) -> Self {
        self.penetration_threshold = threshold;
        self
    }

    /// Set the global velocity damping (retained fraction per second).
    pub fn with_velocity_damping(mut self, damping: F) -> Self {
        self.velocity_damping = damping.clamp(F::zero(), F::one());
        self
    }

    /// Set the separation epsilon used against immovable contacts.
    pub fn with_separation_epsilon(mut self, epsilon: F) -> Self {
        self.separation_epsilon = epsilon;
        self
    }

    /// Set the region covered by the broad-phase grid.
    pub fn with_world_limits(mut self, min: Vec2<F>, max: Vec2<F>) -> Self {
        self.world_limits = Aabb::new(min, max);
        self
    }

    /// Set friction and elasticity for newly created material pairs.
    pub fn with_default_material(mut self, friction: F, elasticity: F) -> Self {
        self.default_friction = friction;
        self.default_elasticity = elasticity;
        self
    }

    /// Toggle velocity-expanded bounding boxes.
    pub fn with_conservative_aabb(mut self, enabled: bool) -> Self {
        self.conservative_aabb = enabled;
        self
    }
}

impl<F: Float> Default for WorldConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
