//! Spatial queries against the bodies in a [`World`].
//!
//! Queries taking a `mask` only consider bodies whose `layer_mask` shares at
//! least one bit with it.

use crate::aabb::Aabb;
use crate::body::Body;
use crate::float::Float;
use crate::handle::BodyHandle;
use crate::vec::{Vec, Vec2};
use crate::world::World;
use alloc::vec::Vec as AllocVec;

/// First body hit by [`World::ray_cast`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit<F: Float> {
    pub body: BodyHandle,
    pub point: Vec2<F>,
    /// Fraction of the way from the ray start to its end.
    pub fraction: F,
}

impl<F: Float> World<F> {
    fn masked(&self, mask: u32) -> impl Iterator<Item = (BodyHandle, &Body<F>)> {
        self.bodies().filter(move |(_, b)| b.layer_mask & mask != 0)
    }

    /// Nearest point mass of any body, as (body, point index, distance).
    pub fn closest_point_mass(&self, point: Vec2<F>) -> Option<(BodyHandle, usize, F)> {
        let mut best: Option<(BodyHandle, usize, F)> = None;
        for (handle, body) in self.bodies() {
            for (i, pm) in body.point_masses().iter().enumerate() {
                let d = pm.position.distance_sq(point);
                if best.map_or(true, |(_, _, best_d)| d < best_d) {
                    best = Some((handle, i, d));
                }
            }
        }
        best.map(|(h, i, d)| (h, i, d.sqrt()))
    }

    /// First body (in handle order) containing `point`.
    pub fn body_under(&self, point: Vec2<F>, mask: u32) -> Option<BodyHandle> {
        self.masked(mask).find(|(_, b)| b.contains(point)).map(|(h, _)| h)
    }

    /// Every body containing `point`.
    pub fn bodies_under(&self, point: Vec2<F>, mask: u32) -> AllocVec<BodyHandle> {
        self.masked(mask)
            .filter(|(_, b)| b.contains(point))
            .map(|(h, _)| h)
            .collect()
    }

    /// Bodies whose bounding box overlaps `aabb`.
    pub fn bodies_in_aabb(&self, aabb: &Aabb<F>, mask: u32) -> AllocVec<BodyHandle> {
        self.masked(mask)
            .filter(|(_, b)| b.aabb().intersects(aabb))
            .map(|(h, _)| h)
            .collect()
    }

    /// Bodies whose outline crosses the segment `start..end`.
    pub fn bodies_intersecting_line(&self, start: Vec2<F>, end: Vec2<F>, mask: u32) -> AllocVec<BodyHandle> {
        self.masked(mask)
            .filter(|(_, b)| b.intersects_segment(start, end))
            .map(|(h, _)| h)
            .collect()
    }

    /// Bodies overlapping the closed polygon `points`.
    pub fn bodies_intersecting_shape(&self, points: &[Vec2<F>], mask: u32) -> AllocVec<BodyHandle> {
        self.masked(mask)
            .filter(|(_, b)| b.intersects_polygon(points))
            .map(|(h, _)| h)
            .collect()
    }

    /// Nearest body edge crossed travelling from `from` to `to`.
    pub fn ray_cast(&self, from: Vec2<F>, to: Vec2<F>, mask: u32, ignoring: &[BodyHandle]) -> Option<RayHit<F>> {
        let mut best: Option<RayHit<F>> = None;
        for (handle, body) in self.masked(mask) {
            if ignoring.contains(&handle) {
                continue;
            }
            if let Some((point, fraction)) = body.ray_cast(from, to) {
                if best.map_or(true, |hit| fraction < hit.fraction) {
                    best = Some(RayHit { body: handle, point, fraction });
                }
            }
        }
        best
    }
}
