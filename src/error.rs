//! Error types for physics operations.

use crate::handle::{BodyHandle, JointHandle};
use thiserror::Error;

/// Errors returned by construction and registration APIs.
///
/// Per-step code never fails: degenerate geometry falls back to zero forces
/// or empty bitmasks instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Point masses need a positive mass; infinity is allowed for anchors.
    #[error("mass must be positive (use infinity for immovable point masses)")]
    InvalidMass,
    /// A body polygon needs at least three vertices.
    #[error("body shape needs at least 3 vertices, got {0}")]
    InsufficientVertices(usize),
    /// Per-point mass list does not match the shape's vertex count.
    #[error("expected {expected} point masses, got {actual}")]
    MassCountMismatch { expected: usize, actual: usize },
    /// Point mass index is out of bounds.
    #[error("point mass index {index} out of bounds (count: {count})")]
    PointMassOutOfBounds { index: usize, count: usize },
    /// Edge link ratio outside [0, 1].
    #[error("edge ratio must lie in [0, 1]")]
    InvalidEdgeRatio,
    /// Shape link with no points or non-positive total weight.
    #[error("shape link needs at least one point with positive total weight")]
    EmptyShapeLink,
    /// Ranged rest distance with min > max.
    #[error("rest distance range requires min <= max")]
    InvalidRestRange,
    /// World limits must have non-zero extent on both axes.
    #[error("world limits must have min < max on both axes")]
    InvalidWorldLimits,
    /// No body behind this handle (never added, or already removed).
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
    /// No joint behind this handle.
    #[error("unknown joint {0:?}")]
    UnknownJoint(JointHandle),
    /// Material id not registered with the world.
    #[error("material id {id} out of range (count: {count})")]
    UnknownMaterial { id: usize, count: usize },
}
