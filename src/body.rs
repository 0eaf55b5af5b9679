//! Deformable 2D bodies: closed loops of point masses.

use crate::aabb::Aabb;
use crate::component::{BodyComponent, ComponentCreator, GravityComponent, PressureComponent, SpringComponent};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::handle::JointHandle;
use crate::point_mass::PointMass;
use crate::shape::{polygon_area, segment_intersection, ClosedShape};
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// Cached geometry of one body edge, from point `i` to point `(i + 1) % n`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeInfo<F: Float> {
    pub start: Vec2<F>,
    pub end: Vec2<F>,
    /// Unit direction from start to end (zero for a collapsed edge).
    pub direction: Vec2<F>,
    /// Outward normal for counter-clockwise winding.
    pub normal: Vec2<F>,
    pub length: F,
    pub length_sq: F,
}

/// Closest point on an edge to some query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeProjection<F: Float> {
    pub point: Vec2<F>,
    pub normal: Vec2<F>,
    /// Fraction along the edge, 0 at its start and 1 at its end.
    pub edge_d: F,
    pub distance_sq: F,
}

/// A soft body: an ordered, closed polygon of point masses plus the force
/// components that act on them.
///
/// The point-mass count is fixed for the body's lifetime; indices into it
/// are how springs, joints and collision records address points.
#[derive(Clone, Debug)]
pub struct Body<F: Float> {
    pub(crate) point_masses: AllocVec<PointMass<F>>,
    pub(crate) base_shape: ClosedShape<F>,
    pub(crate) global_shape: AllocVec<Vec2<F>>,
    pub(crate) edges: AllocVec<EdgeInfo<F>>,
    pub(crate) aabb: Aabb<F>,
    pub(crate) bitmask_x: u32,
    pub(crate) bitmask_y: u32,
    pub(crate) kinematic: bool,
    pub(crate) derived_position: Vec2<F>,
    pub(crate) derived_velocity: Vec2<F>,
    pub(crate) derived_angle: F,
    pub(crate) derived_scale: F,
    pub(crate) components: AllocVec<BodyComponent<F>>,
    pub(crate) joints: AllocVec<JointHandle>,
    /// Rest scale applied to the base shape when building the shape-matching target.
    pub scale: F,
    /// Index into the world's material matrix.
    pub material: usize,
    /// Layer bits matched against query bitmasks.
    pub layer_mask: u32,
    /// Overrides the world's velocity damping for this body.
    pub velocity_damping: Option<F>,
}

impl<F: Float> Body<F> {
    /// Create a body whose point masses all weigh `point_mass`.
    ///
    /// Pass `F::infinity()` for an immovable body.
    pub fn new(
        shape: &ClosedShape<F>,
        point_mass: F,
        position: Vec2<F>,
        angle: F,
        scale: F,
        kinematic: bool,
    ) -> Result<Self, PhysicsError> {
        let masses = alloc::vec![point_mass; shape.len()];
        Self::with_masses(shape, &masses, position, angle, scale, kinematic)
    }

    /// Create a body with an individual mass per vertex.
    pub fn with_masses(
        shape: &ClosedShape<F>,
        masses: &[F],
        position: Vec2<F>,
        angle: F,
        scale: F,
        kinematic: bool,
    ) -> Result<Self, PhysicsError> {
        if shape.len() < 3 {
            return Err(PhysicsError::InsufficientVertices(shape.len()));
        }
        if masses.len() != shape.len() {
            return Err(PhysicsError::MassCountMismatch {
                expected: shape.len(),
                actual: masses.len(),
            });
        }
        if masses.iter().any(|m| m.is_nan() || *m <= F::zero()) {
            return Err(PhysicsError::InvalidMass);
        }

        let global_shape = shape.transform_vertices(position, angle, scale);
        let point_masses = global_shape
            .iter()
            .zip(masses)
            .map(|(&p, &m)| PointMass::new(p, m))
            .collect();

        let mut body = Body {
            point_masses,
            base_shape: shape.clone(),
            global_shape,
            edges: alloc::vec![EdgeInfo::default(); shape.len()],
            aabb: Aabb::invalid(),
            bitmask_x: 0,
            bitmask_y: 0,
            kinematic,
            derived_position: position,
            derived_velocity: Vec2::zero(),
            derived_angle: angle,
            derived_scale: scale,
            components: AllocVec::new(),
            joints: AllocVec::new(),
            scale,
            material: 0,
            layer_mask: u32::MAX,
            velocity_damping: None,
        };
        body.update_edges();
        body.update_aabb(F::zero(), false);
        Ok(body)
    }

    /// Set the material id. The world checks it when the body is added.
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = material;
        self
    }

    /// Build a component from `creator` and attach it.
    pub fn add_component<C: ComponentCreator<F>>(&mut self, creator: &C) {
        let component = creator.create(self);
        self.components.push(component);
    }

    pub fn components(&self) -> &[BodyComponent<F>] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [BodyComponent<F>] {
        &mut self.components
    }

    pub fn remove_components(&mut self) {
        self.components.clear();
    }

    pub fn spring_component(&self) -> Option<&SpringComponent<F>> {
        self.components.iter().find_map(|c| match c {
            BodyComponent::Spring(s) => Some(s),
            _ => None,
        })
    }

    pub fn spring_component_mut(&mut self) -> Option<&mut SpringComponent<F>> {
        self.components.iter_mut().find_map(|c| match c {
            BodyComponent::Spring(s) => Some(s),
            _ => None,
        })
    }

    pub fn gravity_component_mut(&mut self) -> Option<&mut GravityComponent<F>> {
        self.components.iter_mut().find_map(|c| match c {
            BodyComponent::Gravity(g) => Some(g),
            _ => None,
        })
    }

    pub fn pressure_component_mut(&mut self) -> Option<&mut PressureComponent<F>> {
        self.components.iter_mut().find_map(|c| match c {
            BodyComponent::Pressure(p) => Some(p),
            _ => None,
        })
    }

    pub fn point_count(&self) -> usize {
        self.point_masses.len()
    }

    pub fn point_masses(&self) -> &[PointMass<F>] {
        &self.point_masses
    }

    pub fn point_masses_mut(&mut self) -> &mut [PointMass<F>] {
        &mut self.point_masses
    }

    pub fn point_mass(&self, index: usize) -> &PointMass<F> {
        &self.point_masses[index]
    }

    pub fn point_mass_mut(&mut self, index: usize) -> &mut PointMass<F> {
        &mut self.point_masses[index]
    }

    pub fn base_shape(&self) -> &ClosedShape<F> {
        &self.base_shape
    }

    /// Base shape transformed by the derived frame at the last step.
    pub fn global_shape(&self) -> &[Vec2<F>] {
        &self.global_shape
    }

    pub fn edges(&self) -> &[EdgeInfo<F>] {
        &self.edges
    }

    pub fn aabb(&self) -> &Aabb<F> {
        &self.aabb
    }

    pub fn bitmask_x(&self) -> u32 {
        self.bitmask_x
    }

    pub fn bitmask_y(&self) -> u32 {
        self.bitmask_y
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }

    /// Drive a kinematic body's frame. Its points follow through shape matching.
    pub fn set_kinematic_transform(&mut self, position: Vec2<F>, angle: F) {
        self.derived_position = position;
        self.derived_angle = angle;
    }

    pub fn derived_position(&self) -> Vec2<F> {
        self.derived_position
    }

    pub fn derived_velocity(&self) -> Vec2<F> {
        self.derived_velocity
    }

    pub fn derived_angle(&self) -> F {
        self.derived_angle
    }

    /// Current size relative to the unscaled base shape (RMS radius ratio).
    pub fn derived_scale(&self) -> F {
        self.derived_scale
    }

    /// Joints attached to this body. Maintained by the world.
    pub fn joints(&self) -> &[JointHandle] {
        &self.joints
    }

    /// True when every point mass is immovable.
    pub fn is_static(&self) -> bool {
        self.point_masses.iter().all(PointMass::is_static)
    }

    /// Sum of point masses; infinite if any point is immovable.
    pub fn total_mass(&self) -> F {
        self.point_masses.iter().fold(F::zero(), |acc, pm| acc + pm.mass)
    }

    /// Signed area of the current polygon.
    pub fn area(&self) -> F {
        let mut sum = F::zero();
        for edge in &self.edges {
            sum = sum + edge.start.cross(edge.end);
        }
        sum * F::half()
    }

    pub(crate) fn derive_transform(&mut self) {
        let n = F::from_f32(self.point_masses.len() as f32);
        let mut position = Vec2::zero();
        let mut velocity = Vec2::zero();
        for pm in &self.point_masses {
            position += pm.position;
            velocity += pm.velocity;
        }
        let position = position.scale(F::one() / n);
        self.derived_velocity = velocity.scale(F::one() / n);

        let mut cross_sum = F::zero();
        let mut dot_sum = F::zero();
        let mut current_sq = F::zero();
        let mut base_sq = F::zero();
        for (pm, base) in self.point_masses.iter().zip(self.base_shape.vertices()) {
            let r = pm.position - position;
            cross_sum = cross_sum + base.cross(r);
            dot_sum = dot_sum + base.dot(r);
            current_sq = current_sq + r.length_sq();
            base_sq = base_sq + base.length_sq();
        }
        if base_sq > F::zero() {
            self.derived_scale = (current_sq / base_sq).sqrt();
        }

        if !self.kinematic {
            self.derived_position = position;
            if !(cross_sum.is_near_zero(F::from_f32(1e-12)) && dot_sum.is_near_zero(F::from_f32(1e-12))) {
                self.derived_angle = F::atan2(cross_sum, dot_sum);
            }
        }
    }

    pub(crate) fn update_global_shape(&mut self) {
        self.base_shape.transform_vertices_into(
            self.derived_position,
            self.derived_angle,
            self.scale,
            &mut self.global_shape,
        );
    }

    pub(crate) fn update_edges(&mut self) {
        let n = self.point_masses.len();
        for i in 0..n {
            let start = self.point_masses[i].position;
            let end = self.point_masses[(i + 1) % n].position;
            let delta = end - start;
            let length_sq = delta.length_sq();
            let length = length_sq.sqrt();
            let direction = if length.is_near_zero(F::from_f32(1e-10)) {
                Vec2::zero()
            } else {
                delta.scale(F::one() / length)
            };
            self.edges[i] = EdgeInfo {
                start,
                end,
                direction,
                normal: Vec2::new(direction.y, -direction.x),
                length,
                length_sq,
            };
        }
    }

    /// Recompute the bounding box; `margin_dt > 0` also covers `velocity * margin_dt`.
    pub(crate) fn update_aabb(&mut self, margin_dt: F, conservative: bool) {
        self.aabb.clear();
        for pm in &self.point_masses {
            self.aabb.expand_to_include(pm.position);
            if conservative {
                self.aabb.expand_to_include(pm.position + pm.velocity.scale(margin_dt));
            }
        }
    }

    /// Derive the frame and refresh caches ahead of force accumulation.
    pub(crate) fn prepare(&mut self) {
        self.derive_transform();
        self.update_global_shape();
        if !self.components.is_empty() {
            self.update_edges();
        }
    }

    pub(crate) fn accumulate_forces(&mut self, relaxing: bool) {
        let mut components = core::mem::take(&mut self.components);
        for component in components.iter_mut() {
            if relaxing && !component.relaxable() {
                continue;
            }
            component.prepare(self);
            component.accumulate_external_forces(self);
            component.accumulate_internal_forces(self);
        }
        self.components = components;
    }

    pub(crate) fn integrate(&mut self, dt: F, conservative_aabb: bool) {
        for pm in self.point_masses.iter_mut() {
            pm.integrate(dt);
        }
        self.update_edges();
        self.update_aabb(dt, conservative_aabb);
    }

    pub(crate) fn dampen(&mut self, factor: F) {
        for pm in self.point_masses.iter_mut() {
            pm.dampen(factor);
        }
    }

    /// Move every movable point mass by `offset`.
    pub fn translate(&mut self, offset: Vec2<F>) {
        for pm in self.point_masses.iter_mut().filter(|pm| !pm.is_static()) {
            pm.position += offset;
        }
        if self.kinematic {
            self.derived_position += offset;
        }
        self.update_edges();
        self.update_aabb(F::zero(), false);
    }

    /// Add `delta` to every movable point mass velocity.
    pub fn add_velocity(&mut self, delta: Vec2<F>) {
        for pm in self.point_masses.iter_mut().filter(|pm| !pm.is_static()) {
            pm.velocity += delta;
        }
    }

    /// Spin the body about its derived position.
    ///
    /// Each point receives `perp(r_i) * torque / Σ|r_j|²`, which sums to
    /// exactly `torque` about the center.
    pub fn apply_torque(&mut self, torque: F) {
        let center = self.derived_position;
        let radius_sq: F = self
            .point_masses
            .iter()
            .fold(F::zero(), |acc, pm| acc + (pm.position - center).length_sq());
        if radius_sq.is_near_zero(F::from_f32(1e-12)) {
            return;
        }
        let per_unit = torque / radius_sq;
        for pm in self.point_masses.iter_mut() {
            let r = pm.position - center;
            pm.apply_force(r.perp().scale(per_unit));
        }
    }

    /// Apply `force` at world-space point `at`: split evenly as a linear
    /// force plus the torque it produces about the derived position.
    pub fn add_global_force(&mut self, force: Vec2<F>, at: Vec2<F>) {
        let n = F::from_f32(self.point_masses.len() as f32);
        let share = force.scale(F::one() / n);
        for pm in self.point_masses.iter_mut() {
            pm.apply_force(share);
        }
        let torque = (at - self.derived_position).cross(force);
        self.apply_torque(torque);
    }

    /// Even-odd point-in-polygon test over the cached edges.
    pub fn contains(&self, point: Vec2<F>) -> bool {
        if !self.aabb.contains(point) {
            return false;
        }
        let mut inside = false;
        for edge in &self.edges {
            let (a, b) = (edge.start, edge.end);
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Normal at point mass `index`: the normalized sum of its two edge normals.
    pub fn point_normal(&self, index: usize) -> Vec2<F> {
        let n = self.edges.len();
        let prev = (index + n - 1) % n;
        (self.edges[prev].normal + self.edges[index].normal).normalize()
    }

    /// Closest point on edge `edge_index` to `point`.
    pub fn closest_point_on_edge(&self, point: Vec2<F>, edge_index: usize) -> EdgeProjection<F> {
        let edge = &self.edges[edge_index];
        let to_point = point - edge.start;
        let along = to_point.dot(edge.direction);

        if along <= F::zero() {
            EdgeProjection {
                point: edge.start,
                normal: edge.normal,
                edge_d: F::zero(),
                distance_sq: to_point.length_sq(),
            }
        } else if along >= edge.length {
            EdgeProjection {
                point: edge.end,
                normal: edge.normal,
                edge_d: F::one(),
                distance_sq: (point - edge.end).length_sq(),
            }
        } else {
            let perpendicular = to_point.cross(edge.direction);
            EdgeProjection {
                point: edge.start + edge.direction.scale(along),
                normal: edge.normal,
                edge_d: along / edge.length,
                distance_sq: perpendicular * perpendicular,
            }
        }
    }

    /// Closest point on the whole outline, with the index of its edge.
    pub fn closest_point(&self, point: Vec2<F>) -> (usize, EdgeProjection<F>) {
        let mut best = (0, self.closest_point_on_edge(point, 0));
        for i in 1..self.edges.len() {
            let candidate = self.closest_point_on_edge(point, i);
            if candidate.distance_sq < best.1.distance_sq {
                best = (i, candidate);
            }
        }
        best
    }

    /// True if the segment crosses any edge of the body.
    pub fn intersects_segment(&self, start: Vec2<F>, end: Vec2<F>) -> bool {
        if !self.aabb.intersects(&Aabb::new(start, end)) {
            return false;
        }
        self.edges
            .iter()
            .any(|e| segment_intersection(start, end, e.start, e.end).is_some())
    }

    /// First edge hit travelling from `start` to `end`, as (point, fraction).
    pub fn ray_cast(&self, start: Vec2<F>, end: Vec2<F>) -> Option<(Vec2<F>, F)> {
        if !self.aabb.intersects(&Aabb::new(start, end)) {
            return None;
        }
        let mut best: Option<(Vec2<F>, F)> = None;
        for edge in &self.edges {
            if let Some((point, t, _)) = segment_intersection(start, end, edge.start, edge.end) {
                if best.map_or(true, |(_, best_t)| t < best_t) {
                    best = Some((point, t));
                }
            }
        }
        best
    }

    /// True if this body and the closed polygon `points` overlap.
    pub fn intersects_polygon(&self, points: &[Vec2<F>]) -> bool {
        let n = points.len();
        if n < 3 || !self.aabb.intersects(&Aabb::from_points(points)) {
            return false;
        }
        if points.iter().any(|&p| self.contains(p)) {
            return true;
        }
        if self.point_masses.iter().any(|pm| polygon_contains(points, pm.position)) {
            return true;
        }
        (0..n).any(|i| self.intersects_segment(points[i], points[(i + 1) % n]))
    }
}

/// Even-odd point-in-polygon test over raw vertices.
pub(crate) fn polygon_contains<F: Float>(points: &[Vec2<F>], point: Vec2<F>) -> bool {
    let n = points.len();
    if n < 3 || polygon_area(points) == F::zero() {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[j], points[i]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
