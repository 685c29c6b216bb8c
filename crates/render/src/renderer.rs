use crate::camera::RenderView;
use crate::scene::{Mesh, RenderScene};
use std::fmt::Write as _;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and a view and produces output. It never
/// mutates the scene; object poses are owned by the simulation engine.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `view`.
    fn render(&mut self, scene: &RenderScene, view: &RenderView) -> Self::Output;
}

/// Headless renderer producing a text dump of the scene.
///
/// Used by the CLI, in logs, and by tests that need a frame without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &RenderScene, view: &RenderView) -> String {
        self.frames += 1;
        let eye = view.eye();
        let fwd = view.forward();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (frame={}, objects={}, materials={}, lights={}) ===",
            self.frames,
            scene.object_count(),
            scene.materials().len(),
            scene.lights().len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) forward=({:.2}, {:.2}, {:.2}) fov={:.0}",
            eye.x, eye.y, eye.z, fwd.x, fwd.y, fwd.z, view.camera.fov_y_degrees
        );

        for (id, object) in scene.objects() {
            let p = object.transform.position;
            let shape = match object.mesh {
                Mesh::Box { .. } => "box",
                Mesh::Sphere { .. } => "sphere",
            };
            let _ = writeln!(
                out,
                "  [{id}] {shape} pos=({:.2}, {:.2}, {:.2})",
                p.x, p.y, p.z
            );
        }

        out
    }
}
