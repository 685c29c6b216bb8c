use brickyard_common::{Ray, Transform};
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.2,
            far: 1000.0,
        }
    }
}

impl PerspectiveCamera {
    /// Track the output surface size. Zero heights are treated as one pixel.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

/// A camera placed in the world: projection plus world pose.
///
/// The camera looks down its local −Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub camera: PerspectiveCamera,
    pub transform: Transform,
}

impl RenderView {
    pub fn new(camera: PerspectiveCamera, transform: Transform) -> Self {
        Self { camera, transform }
    }

    pub fn eye(&self) -> Vec3 {
        self.transform.position
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.transform_vector(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.transform.rotation, self.transform.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.camera.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point given in normalized device
    /// coordinates (`(0, 0)` is the viewport centre, corners at ±1).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let clip = inv * Vec4::new(ndc.x, ndc.y, 0.5, 1.0);
        let point = clip.truncate() / clip.w;
        Ray::new(self.eye(), point - self.eye())
    }
}
