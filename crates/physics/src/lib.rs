//! Physics world adapter: rigid bodies, collision, gravity.
//!
//! Wraps a rapier3d pipeline behind a small surface (add, remove, step,
//! pose readback, velocity) so the rest of the workspace never touches the
//! physics engine's own types.
//!
//! # Invariants
//! - Bodies with mass 0 are fixed; they collide but never move.
//! - `step` never runs more than `max_substeps` fixed substeps per call.

mod body;
mod world;

pub use body::{CollisionShape, DEFAULT_MARGIN, RigidBodyDesc};
pub use world::{BodyHandle, PhysicsConfig, PhysicsWorld, WorldBounds};

pub fn crate_info() -> &'static str {
    "brickyard-physics v0.1.0"
}
