//! wgpu render backend for the brickyard scene.
//!
//! Draws boxes and spheres as instanced unit meshes, lit by the scene's
//! first directional light (with a shadow map) plus ambient light.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Objects appear with the pose the engine last copied from physics.
//! - Presenting the surface is left to the caller.

mod gpu;
mod shaders;

pub use gpu::{DrawStats, SurfaceTarget, WgpuRenderer};
