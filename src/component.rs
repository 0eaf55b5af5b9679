//! Force components attached to bodies: springs with shape matching,
//! gravity, and gas pressure.

use crate::body::Body;
use crate::float::Float;
use crate::spring::{spring_force, InternalSpring};
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// A force contributor attached to one body.
///
/// Dispatch goes through [`relaxable`](Self::relaxable),
/// [`prepare`](Self::prepare) and the two accumulate hooks.
#[derive(Clone, Debug)]
pub enum BodyComponent<F: Float> {
    Spring(SpringComponent<F>),
    Gravity(GravityComponent<F>),
    Pressure(PressureComponent<F>),
}

impl<F: Float> BodyComponent<F> {
    /// Whether the component still runs in relaxation mode.
    ///
    /// Restorative forces relax; energy-injecting ones do not.
    pub fn relaxable(&self) -> bool {
        !matches!(self, BodyComponent::Gravity(_))
    }

    pub fn prepare(&mut self, body: &Body<F>) {
        if let BodyComponent::Pressure(p) = self {
            p.prepare(body);
        }
    }

    pub fn accumulate_internal_forces(&mut self, body: &mut Body<F>) {
        match self {
            BodyComponent::Spring(s) => s.accumulate_internal_forces(body),
            BodyComponent::Pressure(p) => p.accumulate_internal_forces(body),
            BodyComponent::Gravity(_) => {}
        }
    }

    pub fn accumulate_external_forces(&mut self, body: &mut Body<F>) {
        if let BodyComponent::Gravity(g) = self {
            g.accumulate_external_forces(body);
        }
    }
}

/// Builds a component for a specific body.
///
/// Creators hold every tunable default, so components themselves are only
/// ever configured through them or through their setters after attachment.
pub trait ComponentCreator<F: Float> {
    fn create(&self, body: &Body<F>) -> BodyComponent<F>;
}

// --------------------------------------------------------------------------
// Springs + shape matching
// --------------------------------------------------------------------------

/// Edge springs, user inner springs, and optional shape matching.
///
/// Spring indices `[0, point_count)` are the edge ring; inner springs follow
/// and are addressed by a zero-based inner index.
#[derive(Clone, Debug)]
pub struct SpringComponent<F: Float> {
    springs: AllocVec<InternalSpring<F>>,
    edge_count: usize,
    pub shape_matching: bool,
    pub shape_coefficient: F,
    pub shape_damping: F,
}

impl<F: Float> SpringComponent<F> {
    /// Edge ring built from the body's current edge lengths.
    pub fn new(body: &Body<F>, edge_coefficient: F, edge_damping: F) -> Self {
        let n = body.point_count();
        let springs = (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                let rest = body.point_mass(i).position.distance(body.point_mass(j).position);
                InternalSpring::new(i, j, rest, edge_coefficient, edge_damping)
            })
            .collect();
        SpringComponent {
            springs,
            edge_count: n,
            shape_matching: false,
            shape_coefficient: F::zero(),
            shape_damping: F::zero(),
        }
    }

    pub fn springs(&self) -> &[InternalSpring<F>] {
        &self.springs
    }

    pub fn spring(&self, index: usize) -> &InternalSpring<F> {
        &self.springs[index]
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn inner_spring_count(&self) -> usize {
        self.springs.len() - self.edge_count
    }

    /// Add a spring between two point masses of the body.
    ///
    /// `rest_distance` defaults to their current distance.
    ///
    /// # Panics
    /// If either index is out of range for `body`.
    pub fn add_inner_spring(
        &mut self,
        body: &Body<F>,
        a: usize,
        b: usize,
        coefficient: F,
        damping: F,
        rest_distance: Option<F>,
    ) -> usize {
        let rest = rest_distance
            .unwrap_or_else(|| body.point_mass(a).position.distance(body.point_mass(b).position));
        self.springs.push(InternalSpring::new(a, b, rest, coefficient, damping));
        self.springs.len() - self.edge_count - 1
    }

    /// Configure any spring by its global index.
    pub fn set_spring_constants(&mut self, index: usize, coefficient: F, damping: F) {
        let spring = &mut self.springs[index];
        spring.coefficient = coefficient;
        spring.damping = damping;
    }

    pub fn set_edge_spring_constants(&mut self, coefficient: F, damping: F) {
        for spring in &mut self.springs[..self.edge_count] {
            spring.coefficient = coefficient;
            spring.damping = damping;
        }
    }

    pub fn set_inner_spring_constants(&mut self, inner_index: usize, coefficient: F, damping: F) {
        self.set_spring_constants(self.edge_count + inner_index, coefficient, damping);
    }

    pub fn set_spring_rest_distance(&mut self, index: usize, rest_distance: F) {
        self.springs[index].rest_distance = rest_distance;
    }

    pub fn set_shape_matching(&mut self, enabled: bool, coefficient: F, damping: F) {
        self.shape_matching = enabled;
        self.shape_coefficient = coefficient;
        self.shape_damping = damping;
    }

    fn accumulate_internal_forces(&self, body: &mut Body<F>) {
        for spring in &self.springs {
            let a = &body.point_masses[spring.a];
            let b = &body.point_masses[spring.b];
            let force = spring_force(
                a.position,
                a.velocity,
                b.position,
                b.velocity,
                spring.rest_distance,
                spring.coefficient,
                spring.damping,
            );
            body.point_masses[spring.a].apply_force(force);
            body.point_masses[spring.b].apply_force(-force);
        }

        if self.shape_matching && self.shape_coefficient > F::zero() {
            // kinematic frames are driven from outside; their own motion
            // must not resist the pull
            let target_velocity = if body.kinematic {
                Vec2::zero()
            } else {
                body.derived_velocity
            };
            for (pm, &target) in body.point_masses.iter_mut().zip(body.global_shape.iter()) {
                let force = spring_force(
                    pm.position,
                    pm.velocity,
                    target,
                    target_velocity,
                    F::zero(),
                    self.shape_coefficient,
                    self.shape_damping,
                );
                pm.apply_force(force);
            }
        }
    }
}

/// Inner spring description held by a [`SpringComponentCreator`].
#[derive(Clone, Debug, PartialEq)]
pub struct InnerSpringSettings<F: Float> {
    pub a: usize,
    pub b: usize,
    pub coefficient: F,
    pub damping: F,
    pub rest_distance: Option<F>,
}

/// Creator for [`SpringComponent`].
#[derive(Clone, Debug)]
pub struct SpringComponentCreator<F: Float> {
    pub edge_coefficient: F,
    pub edge_damping: F,
    pub shape_matching: bool,
    pub shape_coefficient: F,
    pub shape_damping: F,
    pub inner_springs: AllocVec<InnerSpringSettings<F>>,
}

impl<F: Float> SpringComponentCreator<F> {
    pub fn new() -> Self {
        SpringComponentCreator {
            edge_coefficient: F::from_f32(50.0),
            edge_damping: F::from_f32(2.0),
            shape_matching: true,
            shape_coefficient: F::from_f32(100.0),
            shape_damping: F::from_f32(10.0),
            inner_springs: AllocVec::new(),
        }
    }

    pub fn with_edge_springs(mut self, coefficient: F, damping: F) -> Self {
        self.edge_coefficient = coefficient;
        self.edge_damping = damping;
        self
    }

    pub fn with_shape_matching(mut self, coefficient: F, damping: F) -> Self {
        self.shape_matching = true;
        self.shape_coefficient = coefficient;
        self.shape_damping = damping;
        self
    }

    pub fn without_shape_matching(mut self) -> Self {
        self.shape_matching = false;
        self
    }

    pub fn with_inner_spring(mut self, a: usize, b: usize, coefficient: F, damping: F) -> Self {
        self.inner_springs.push(InnerSpringSettings { a, b, coefficient, damping, rest_distance: None });
        self
    }
}

impl<F: Float> Default for SpringComponentCreator<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> ComponentCreator<F> for SpringComponentCreator<F> {
    fn create(&self, body: &Body<F>) -> BodyComponent<F> {
        let mut component = SpringComponent::new(body, self.edge_coefficient, self.edge_damping);
        component.set_shape_matching(self.shape_matching, self.shape_coefficient, self.shape_damping);
        for inner in &self.inner_springs {
            component.add_inner_spring(body, inner.a, inner.b, inner.coefficient, inner.damping, inner.rest_distance);
        }
        BodyComponent::Spring(component)
    }
}

// --------------------------------------------------------------------------
// Gravity
// --------------------------------------------------------------------------

/// Constant acceleration applied to every movable point mass.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityComponent<F: Float> {
    pub gravity: Vec2<F>,
}

impl<F: Float> GravityComponent<F> {
    fn accumulate_external_forces(&self, body: &mut Body<F>) {
        for pm in body.point_masses.iter_mut().filter(|pm| !pm.is_static()) {
            let force = self.gravity.scale(pm.mass);
            pm.apply_force(force);
        }
    }
}

/// Creator for [`GravityComponent`].
#[derive(Clone, Debug)]
pub struct GravityComponentCreator<F: Float> {
    pub gravity: Vec2<F>,
}

impl<F: Float> GravityComponentCreator<F> {
    pub fn new(gravity: Vec2<F>) -> Self {
        GravityComponentCreator { gravity }
    }
}

impl<F: Float> Default for GravityComponentCreator<F> {
    fn default() -> Self {
        Self::new(Vec2::new(F::zero(), F::from_f32(-9.8)))
    }
}

impl<F: Float> ComponentCreator<F> for GravityComponentCreator<F> {
    fn create(&self, _body: &Body<F>) -> BodyComponent<F> {
        BodyComponent::Gravity(GravityComponent { gravity: self.gravity })
    }
}

// --------------------------------------------------------------------------
// Pressure
// --------------------------------------------------------------------------

/// Gas pressure pushing every edge outward, inversely to the enclosed area.
#[derive(Clone, Debug, PartialEq)]
pub struct PressureComponent<F: Float> {
    pub gas_amount: F,
    area: F,
}

impl<F: Float> PressureComponent<F> {
    /// Area measured at the last `prepare`.
    pub fn area(&self) -> F {
        self.area
    }

    fn prepare(&mut self, body: &Body<F>) {
        self.area = body.area().abs();
    }

    fn accumulate_internal_forces(&self, body: &mut Body<F>) {
        if self.area < F::from_f32(1e-6) {
            return;
        }
        let n = body.point_count();
        for i in 0..n {
            let edge = body.edges[i];
            let pressure = self.gas_amount * edge.length / self.area;
            let half = edge.normal.scale(pressure * F::half());
            body.point_masses[i].apply_force(half);
            body.point_masses[(i + 1) % n].apply_force(half);
        }
    }
}

/// Creator for [`PressureComponent`].
#[derive(Clone, Debug)]
pub struct PressureComponentCreator<F: Float> {
    pub gas_amount: F,
}

impl<F: Float> PressureComponentCreator<F> {
    pub fn new(gas_amount: F) -> Self {
        PressureComponentCreator { gas_amount }
    }
}

impl<F: Float> ComponentCreator<F> for PressureComponentCreator<F> {
    fn create(&self, body: &Body<F>) -> BodyComponent<F> {
        BodyComponent::Pressure(PressureComponent {
            gas_amount: self.gas_amount,
            area: body.area().abs(),
        })
    }
}
