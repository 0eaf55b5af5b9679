//! Per-material-pair collision settings.

use crate::collision::BodyCollisionInformation;
use crate::error::PhysicsError;
use crate::float::Float;
use alloc::sync::Arc;
use alloc::vec::Vec as AllocVec;
use core::fmt;

/// Veto hook for a material pair. Receives the record and the relative
/// velocity along its normal; returning `false` skips resolution.
pub type CollisionFilter<F> = Arc<dyn Fn(&BodyCollisionInformation<F>, F) -> bool + Send + Sync>;

/// Collision settings for one pair of materials.
#[derive(Clone)]
pub struct MaterialPair<F: Float> {
    pub collide: bool,
    pub friction: F,
    pub elasticity: F,
    pub filter: Option<CollisionFilter<F>>,
}

impl<F: Float> MaterialPair<F> {
    pub fn new(friction: F, elasticity: F) -> Self {
        MaterialPair { collide: true, friction, elasticity, filter: None }
    }

    /// Run the filter, if any. No filter means "resolve".
    pub fn accepts(&self, info: &BodyCollisionInformation<F>, relative_normal_velocity: F) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter(info, relative_normal_velocity))
    }
}

impl<F: Float> fmt::Debug for MaterialPair<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialPair")
            .field("collide", &self.collide)
            .field("friction", &self.friction)
            .field("elasticity", &self.elasticity)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Square, symmetric table of [`MaterialPair`]s indexed by material id.
#[derive(Clone, Debug)]
pub struct MaterialMatrix<F: Float> {
    pairs: AllocVec<MaterialPair<F>>,
    count: usize,
    default_pair: MaterialPair<F>,
}

impl<F: Float> MaterialMatrix<F> {
    /// Matrix with a single material (id 0).
    pub fn new(default_pair: MaterialPair<F>) -> Self {
        MaterialMatrix {
            pairs: alloc::vec![default_pair.clone()],
            count: 1,
            default_pair,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn default_pair(&self) -> &MaterialPair<F> {
        &self.default_pair
    }

    /// Grow by one material and return its id. Existing pairs are kept; new
    /// cells start as the default pair.
    pub fn add_material(&mut self) -> usize {
        let old = self.count;
        let new = old + 1;
        let mut pairs = AllocVec::with_capacity(new * new);
        for a in 0..new {
            for b in 0..new {
                if a < old && b < old {
                    pairs.push(self.pairs[a * old + b].clone());
                } else {
                    pairs.push(self.default_pair.clone());
                }
            }
        }
        self.pairs = pairs;
        self.count = new;
        old
    }

    fn check(&self, id: usize) -> Result<(), PhysicsError> {
        if id < self.count {
            Ok(())
        } else {
            Err(PhysicsError::UnknownMaterial { id, count: self.count })
        }
    }

    /// Settings for materials `a` and `b`.
    ///
    /// # Panics
    /// If either id is not registered.
    pub fn pair(&self, a: usize, b: usize) -> &MaterialPair<F> {
        &self.pairs[a * self.count + b]
    }

    fn update(
        &mut self,
        a: usize,
        b: usize,
        mut edit: impl FnMut(&mut MaterialPair<F>),
    ) -> Result<(), PhysicsError> {
        self.check(a)?;
        self.check(b)?;
        edit(&mut self.pairs[a * self.count + b]);
        edit(&mut self.pairs[b * self.count + a]);
        Ok(())
    }

    pub fn set_collide(&mut self, a: usize, b: usize, collide: bool) -> Result<(), PhysicsError> {
        self.update(a, b, |pair| pair.collide = collide)
    }

    pub fn set_data(&mut self, a: usize, b: usize, friction: F, elasticity: F) -> Result<(), PhysicsError> {
        self.update(a, b, |pair| {
            pair.friction = friction;
            pair.elasticity = elasticity;
        })
    }

    pub fn set_filter(
        &mut self,
        a: usize,
        b: usize,
        filter: Option<CollisionFilter<F>>,
    ) -> Result<(), PhysicsError> {
        self.update(a, b, |pair| pair.filter = filter.clone())
    }
}
