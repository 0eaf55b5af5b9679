//! Deformable 2D bodies built from point masses.
//!
//! `wobble` simulates closed polygons of point masses held in shape by
//! springs, shape matching and gas pressure, linked by joints, and kept
//! apart by point-vs-edge collision detection with impulse response.
//!
//! # Features
//!
//! - **Soft bodies**: edge and inner springs, shape matching toward a rest
//!   shape, pressure, per-vertex masses and infinite-mass anchors
//! - **Joints**: spring or distance constraints between whole bodies, single
//!   points, points along an edge, or weighted point sets
//! - **Collisions**: 32x32 bitmask broad phase, point-in-polygon narrow
//!   phase, restitution and friction per material pair
//! - **Queries**: point, box, line, polygon and ray queries with layer masks
//! - **Observable**: watch collisions through the `CollisionObserver` trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! # Example
//! ```
//! use wobble::{Body, ClosedShape, GravityComponentCreator, NoOpCollisionObserver,
//!              SpringComponentCreator, Vec2, World, WorldConfig};
//!
//! let mut world: World<f32> = World::new(WorldConfig::new());
//! let shape = ClosedShape::rectangle(1.0, 1.0);
//!
//! let mut jelly = Body::new(&shape, 1.0, Vec2::new(0.0, 2.0), 0.0, 1.0, false).unwrap();
//! jelly.add_component(&SpringComponentCreator::new());
//! jelly.add_component(&GravityComponentCreator::default());
//! let jelly = world.add_body(jelly).unwrap();
//!
//! let floor_shape = ClosedShape::rectangle(10.0, 1.0);
//! let floor = Body::new(&floor_shape, f32::INFINITY, Vec2::new(0.0, -1.0), 0.0, 1.0, false).unwrap();
//! world.add_body(floor).unwrap();
//!
//! for _ in 0..120 {
//!     world.update(1.0 / 60.0, &mut NoOpCollisionObserver);
//! }
//! assert!(world.body(jelly).unwrap().derived_position().y > -1.0);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod aabb;
pub mod shape;
pub mod point_mass;
pub mod spring;
pub mod component;
pub mod body;
pub mod joint;
pub mod material;
pub mod grid;
pub mod collision;
mod solver;
pub mod observer;
pub mod config;
pub mod error;
pub mod handle;
pub mod world;
pub mod query;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2};
pub use aabb::Aabb;
pub use shape::ClosedShape;
pub use point_mass::PointMass;
pub use spring::InternalSpring;
pub use component::{
    BodyComponent, ComponentCreator, GravityComponent, GravityComponentCreator, PressureComponent,
    PressureComponentCreator, SpringComponent, SpringComponentCreator,
};
pub use body::{Body, EdgeInfo, EdgeProjection};
pub use joint::{BodyJoint, JointKind, JointLink, RestDistance};
pub use material::{CollisionFilter, MaterialMatrix, MaterialPair};
pub use grid::{BroadPhaseGrid, GRID_SIZE};
pub use collision::BodyCollisionInformation;
pub use observer::{CollisionObserver, NoOpCollisionObserver};
pub use config::WorldConfig;
pub use error::PhysicsError;
pub use handle::{BodyHandle, JointHandle};
pub use world::World;
pub use query::RayHit;
