//! The world: owns bodies, joints and materials, and runs the step pipeline.

use crate::aabb::Aabb;
use crate::body::Body;
use crate::collision::{detect, BodyCollisionInformation};
use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::{masks_overlap, BroadPhaseGrid};
use crate::handle::{BodyHandle, JointHandle};
use crate::joint::{BodyJoint, RestDistance};
use crate::material::{CollisionFilter, MaterialMatrix, MaterialPair};
use crate::observer::CollisionObserver;
use crate::solver::resolve_collisions;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// A soft-body simulation.
///
/// Bodies and joints live in arenas addressed by [`BodyHandle`] and
/// [`JointHandle`]. Removing an object leaves its slot empty forever.
pub struct World<F: Float> {
    pub(crate) bodies: AllocVec<Option<Body<F>>>,
    pub(crate) joints: AllocVec<Option<BodyJoint<F>>>,
    materials: MaterialMatrix<F>,
    grid: BroadPhaseGrid<F>,
    config: WorldConfig<F>,
    collisions: AllocVec<BodyCollisionInformation<F>>,
}

impl<F: Float> World<F> {
    /// Create an empty world. Limits without positive finite extent on both
    /// axes are replaced by the default limits.
    pub fn new(mut config: WorldConfig<F>) -> Self {
        if !usable_limits(&config.world_limits) {
            tracing::warn!("unusable world limits {:?}, using defaults", config.world_limits);
            config.world_limits = WorldConfig::new().world_limits;
        }
        let default_pair = MaterialPair::new(config.default_friction, config.default_elasticity);
        World {
            bodies: AllocVec::new(),
            joints: AllocVec::new(),
            materials: MaterialMatrix::new(default_pair),
            grid: BroadPhaseGrid::new(config.world_limits),
            config,
            collisions: AllocVec::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig<F> {
        &self.config
    }

    /// Mutable access to tuning values. World limits go through
    /// [`set_world_limits`](Self::set_world_limits) so the grid stays in sync.
    pub fn config_mut(&mut self) -> &mut WorldConfig<F> {
        &mut self.config
    }

    pub fn grid(&self) -> &BroadPhaseGrid<F> {
        &self.grid
    }

    /// Replace the region covered by the broad-phase grid.
    pub fn set_world_limits(&mut self, min: Vec2<F>, max: Vec2<F>) -> Result<(), PhysicsError> {
        let limits = Aabb::new(min, max);
        if max.x < min.x || max.y < min.y || !usable_limits(&limits) {
            return Err(PhysicsError::InvalidWorldLimits);
        }
        self.config.world_limits = limits;
        self.grid = BroadPhaseGrid::new(limits);
        for body in self.bodies.iter_mut().flatten() {
            let (x, y) = self.grid.bitmasks(&body.aabb);
            body.bitmask_x = x;
            body.bitmask_y = y;
        }
        tracing::debug!("world limits set to {:?}..{:?}", min, max);
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Materials
    // ----------------------------------------------------------------------

    pub fn materials(&self) -> &MaterialMatrix<F> {
        &self.materials
    }

    /// Register a new material and return its id.
    pub fn add_material(&mut self) -> usize {
        let id = self.materials.add_material();
        tracing::debug!("added material {}", id);
        id
    }

    pub fn set_material_pair_collide(&mut self, a: usize, b: usize, collide: bool) -> Result<(), PhysicsError> {
        self.materials.set_collide(a, b, collide)
    }

    pub fn set_material_pair_data(
        &mut self,
        a: usize,
        b: usize,
        friction: F,
        elasticity: F,
    ) -> Result<(), PhysicsError> {
        self.materials.set_data(a, b, friction, elasticity)
    }

    pub fn set_material_pair_filter_callback(
        &mut self,
        a: usize,
        b: usize,
        filter: Option<CollisionFilter<F>>,
    ) -> Result<(), PhysicsError> {
        self.materials.set_filter(a, b, filter)
    }

    // ----------------------------------------------------------------------
    // Bodies
    // ----------------------------------------------------------------------

    pub fn add_body(&mut self, mut body: Body<F>) -> Result<BodyHandle, PhysicsError> {
        if body.material >= self.materials.count() {
            return Err(PhysicsError::UnknownMaterial {
                id: body.material,
                count: self.materials.count(),
            });
        }
        body.joints.clear();
        let (x, y) = self.grid.bitmasks(&body.aabb);
        body.bitmask_x = x;
        body.bitmask_y = y;

        let handle = BodyHandle(self.bodies.len());
        tracing::debug!(
            "added body {}: {} point masses, material {}",
            handle.index(),
            body.point_count(),
            body.material
        );
        self.bodies.push(Some(body));
        Ok(handle)
    }

    /// Remove a body along with every joint attached to it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body<F>, PhysicsError> {
        let mut body = self
            .bodies
            .get_mut(handle.0)
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownBody(handle))?;

        let attached = core::mem::take(&mut body.joints);
        for joint_handle in &attached {
            let Some(joint) = self.joints.get_mut(joint_handle.0).and_then(Option::take) else {
                continue;
            };
            for other in [joint.link1.body(), joint.link2.body()] {
                if let Some(other) = self.bodies.get_mut(other.0).and_then(Option::as_mut) {
                    other.joints.retain(|h| h != joint_handle);
                }
            }
        }
        tracing::debug!("removed body {} and {} joint(s)", handle.index(), attached.len());
        Ok(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body<F>> {
        self.bodies.get(handle.0).and_then(Option::as_ref)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body<F>> {
        self.bodies.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Live bodies in handle order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body<F>)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (BodyHandle(i), b)))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    // ----------------------------------------------------------------------
    // Joints
    // ----------------------------------------------------------------------

    /// Validate and register a joint. Without an explicit rest distance the
    /// joint keeps its links at their current separation.
    pub fn add_joint(&mut self, mut joint: BodyJoint<F>) -> Result<JointHandle, PhysicsError> {
        joint.validate()?;
        let (h1, h2) = (joint.link1.body(), joint.link2.body());
        let b1 = self.body(h1).ok_or(PhysicsError::UnknownBody(h1))?;
        let b2 = self.body(h2).ok_or(PhysicsError::UnknownBody(h2))?;
        joint.link1.validate(b1)?;
        joint.link2.validate(b2)?;
        if joint.rest_distance.is_none() {
            let distance = joint.link1.position(b1).distance(joint.link2.position(b2));
            joint.rest_distance = Some(RestDistance::Fixed(distance));
        }

        let handle = JointHandle(self.joints.len());
        self.joints.push(Some(joint));
        if let Some(body) = self.body_mut(h1) {
            body.joints.push(handle);
        }
        if h2 != h1 {
            if let Some(body) = self.body_mut(h2) {
                body.joints.push(handle);
            }
        }
        tracing::debug!("added joint {} between bodies {} and {}", handle.index(), h1.index(), h2.index());
        Ok(handle)
    }

    /// Remove a joint and drop its back-references from both bodies.
    pub fn remove_joint(&mut self, handle: JointHandle) -> Result<BodyJoint<F>, PhysicsError> {
        let joint = self
            .joints
            .get_mut(handle.0)
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownJoint(handle))?;
        for body in [joint.link1.body(), joint.link2.body()] {
            if let Some(body) = self.body_mut(body) {
                body.joints.retain(|&h| h != handle);
            }
        }
        tracing::debug!("removed joint {}", handle.index());
        Ok(joint)
    }

    pub fn joint(&self, handle: JointHandle) -> Option<&BodyJoint<F>> {
        self.joints.get(handle.0).and_then(Option::as_ref)
    }

    pub fn joint_mut(&mut self, handle: JointHandle) -> Option<&mut BodyJoint<F>> {
        self.joints.get_mut(handle.0).and_then(Option::as_mut)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.iter().flatten().count()
    }

    // ----------------------------------------------------------------------
    // Stepping
    // ----------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds.
    pub fn update<O: CollisionObserver<F>>(&mut self, dt: F, observer: &mut O) {
        self.step(dt, false, observer);
    }

    /// Advance with only restorative components (springs, shape matching,
    /// pressure). Lets a freshly built scene settle without gravity.
    pub fn relax<O: CollisionObserver<F>>(&mut self, dt: F, observer: &mut O) {
        self.step(dt, true, observer);
    }

    fn step<O: CollisionObserver<F>>(&mut self, dt: F, relaxing: bool, observer: &mut O) {
        let conservative = self.config.conservative_aabb;

        for body in self.bodies.iter_mut().flatten() {
            body.prepare();
            body.accumulate_forces(relaxing);
            body.integrate(dt, conservative);
        }

        if !self.joints.is_empty() {
            for joint in self.joints.iter().flatten() {
                joint.resolve(&mut self.bodies);
            }
            // distance joints move points directly
            for body in self.bodies.iter_mut().flatten().filter(|b| !b.joints.is_empty()) {
                body.update_edges();
                body.update_aabb(dt, conservative);
            }
        }

        for body in self.bodies.iter_mut().flatten() {
            let (x, y) = self.grid.bitmasks(&body.aabb);
            body.bitmask_x = x;
            body.bitmask_y = y;
        }

        self.collisions.clear();
        let threshold = self.config.penetration_threshold;
        let count = self.bodies.len();
        let mut candidates = 0usize;
        for i in 0..count {
            let Some(a) = self.bodies[i].as_ref() else {
                continue;
            };
            for j in (i + 1)..count {
                let Some(b) = self.bodies[j].as_ref() else {
                    continue;
                };
                let (ha, hb) = (BodyHandle(i), BodyHandle(j));
                if !should_collide(a, ha, b, hb, &self.materials, &self.joints) {
                    continue;
                }
                candidates += 1;
                detect(a, ha, b, hb, threshold, &mut self.collisions);
                detect(b, hb, a, ha, threshold, &mut self.collisions);
            }
        }

        for info in &self.collisions {
            observer.on_collision(info);
        }
        observer.on_collisions(&self.collisions);

        let resolved = resolve_collisions(
            &self.collisions,
            &mut self.bodies,
            &self.materials,
            &self.config,
            observer,
        );
        tracing::trace!(
            "step dt={:?}: {} candidate pair(s), {} collision(s), {} resolved",
            dt,
            candidates,
            self.collisions.len(),
            resolved
        );
        self.collisions.clear();

        let default_damping = self.config.velocity_damping;
        for body in self.bodies.iter_mut().flatten() {
            let damping = body.velocity_damping.unwrap_or(default_damping);
            body.dampen(damping.powf(dt));
        }
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

/// Broad-phase gate for one unordered pair.
fn usable_limits<F: Float>(limits: &Aabb<F>) -> bool {
    let size = limits.size();
    size.x > F::zero() && size.y > F::zero() && size.x.is_finite() && size.y.is_finite()
}

fn should_collide<F: Float>(
    a: &Body<F>,
    ha: BodyHandle,
    b: &Body<F>,
    hb: BodyHandle,
    materials: &MaterialMatrix<F>,
    joints: &[Option<BodyJoint<F>>],
) -> bool {
    let immovable = |body: &Body<F>| body.is_static() && !body.is_kinematic();
    if immovable(a) && immovable(b) {
        return false;
    }
    if !masks_overlap((a.bitmask_x, a.bitmask_y), (b.bitmask_x, b.bitmask_y)) {
        return false;
    }
    if !a.aabb.intersects(&b.aabb) {
        return false;
    }
    if !materials.pair(a.material, b.material).collide {
        return false;
    }
    !a.joints.iter().any(|h| {
        joints
            .get(h.0)
            .and_then(Option::as_ref)
            .map_or(false, |joint| joint.allow_collisions && joint.joins(ha, hb))
    })
}
