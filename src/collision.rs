//! Narrow phase: which point masses of one body sit inside another.

use crate::body::{Body, EdgeProjection};
use crate::float::Float;
use crate::handle::BodyHandle;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// One point mass of `body_a` found inside `body_b`, with the edge of `body_b`
/// it should be pushed out through.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyCollisionInformation<F: Float> {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Penetrating point mass of `body_a`.
    pub point_a: usize,
    /// Start point of the hit edge on `body_b`.
    pub b_point1: usize,
    /// End point of the hit edge, `(b_point1 + 1) % n`.
    pub b_point2: usize,
    /// Fraction along the hit edge, in [0, 1].
    pub edge_d: F,
    /// Closest point on the hit edge.
    pub hit_point: Vec2<F>,
    /// Outward normal of the hit edge.
    pub normal: Vec2<F>,
    /// Distance from the point mass to `hit_point`.
    pub penetration: F,
}

/// Append a record to `out` for every point mass of `body_a` inside `body_b`.
/// Returns the number of records added.
///
/// Each B edge is classified by comparing its normal with the point's own
/// normal. Edges facing away from the point are the natural exit; the
/// closest edge facing the same way is only taken when the best away-facing
/// edge is farther than `penetration_threshold` and the same-facing one is
/// closer still, which keeps deep points from being pushed through thin
/// bodies.
pub fn detect<F: Float>(
    body_a: &Body<F>,
    handle_a: BodyHandle,
    body_b: &Body<F>,
    handle_b: BodyHandle,
    penetration_threshold: F,
    out: &mut AllocVec<BodyCollisionInformation<F>>,
) -> usize {
    let before = out.len();
    let edge_count = body_b.edges().len();
    let threshold_sq = penetration_threshold * penetration_threshold;

    for (i, pm) in body_a.point_masses().iter().enumerate() {
        let point = pm.position;
        if !body_b.contains(point) {
            continue;
        }

        let point_normal = body_a.point_normal(i);
        let mut away: Option<(usize, EdgeProjection<F>)> = None;
        let mut same: Option<(usize, EdgeProjection<F>)> = None;

        for edge in 0..edge_count {
            let projection = body_b.closest_point_on_edge(point, edge);
            let slot = if point_normal.dot(projection.normal) <= F::zero() {
                &mut away
            } else {
                &mut same
            };
            if slot.map_or(true, |(_, best)| projection.distance_sq < best.distance_sq) {
                *slot = Some((edge, projection));
            }
        }

        let chosen = match (away, same) {
            (Some(a), Some(s)) if a.1.distance_sq > threshold_sq && s.1.distance_sq < a.1.distance_sq => s,
            (Some(a), _) => a,
            (None, Some(s)) => s,
            (None, None) => {
                debug_assert!(false, "body has no edges");
                continue;
            }
        };

        let (edge, projection) = chosen;
        out.push(BodyCollisionInformation {
            body_a: handle_a,
            body_b: handle_b,
            point_a: i,
            b_point1: edge,
            b_point2: (edge + 1) % edge_count,
            edge_d: projection.edge_d,
            hit_point: projection.point,
            normal: projection.normal,
            penetration: projection.distance_sq.sqrt(),
        });
    }

    out.len() - before
}
