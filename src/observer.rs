//! Collision observer trait for monitoring each simulation step.

use crate::collision::BodyCollisionInformation;
use crate::float::Float;

/// Receives the collisions found during [`World::update`](crate::World::update).
///
/// Detection callbacks fire after narrow-phase and before any record is
/// resolved. Observers must not try to reach back into the world. All
/// methods default to no-ops.
pub trait CollisionObserver<F: Float> {
    /// Called once per collision record, in detection order.
    fn on_collision(&mut self, _info: &BodyCollisionInformation<F>) {}

    /// Called once per step with every record found that step.
    fn on_collisions(&mut self, _infos: &[BodyCollisionInformation<F>]) {}

    /// Called when a record's penetration exceeds the configured threshold;
    /// the record is skipped instead of resolved.
    fn on_penetration_exceeded(&mut self, _info: &BodyCollisionInformation<F>) {}
}

/// A no-op observer. Use when nothing needs to watch the step.
pub struct NoOpCollisionObserver;

impl<F: Float> CollisionObserver<F> for NoOpCollisionObserver {}
