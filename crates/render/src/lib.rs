//! Rendering adapter: renderer-agnostic scene graph and camera.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - Object transforms are written by the simulation engine only.
//!
//! The [`Renderer`] trait is the seam between the scene and a backend. A
//! headless [`DebugTextRenderer`] ships here; the GPU backend lives in
//! `brickyard-render-wgpu`.

mod camera;
mod renderer;
mod scene;

pub use camera::{PerspectiveCamera, RenderView};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{
    AmbientLight, DirectionalLight, Light, Material, MaterialId, Mesh, RenderScene,
    RenderableObject, ShadowCamera, color_from_hex,
};

pub fn crate_info() -> &'static str {
    "brickyard-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
