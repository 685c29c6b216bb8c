//! Shared types for the brickyard simulation.
//!
//! `Transform` is the currency exchanged between the physics world and the
//! render scene; `ObjectId` names a renderable for its whole lifetime.

mod types;

pub use types::{ObjectId, Ray, Transform};
