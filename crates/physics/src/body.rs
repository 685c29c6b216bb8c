use brickyard_common::Transform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Collision margin applied to every convex shape.
pub const DEFAULT_MARGIN: f32 = 0.05;

/// Convex primitive used for collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl CollisionShape {
    /// Principal moments of inertia of the solid shape at `mass`.
    ///
    /// Zero mass yields zero inertia, which makes the body immovable.
    pub fn local_inertia(&self, mass: f32) -> Vec3 {
        match *self {
            Self::Box { half_extents } => {
                let l = half_extents * 2.0;
                let k = mass / 12.0;
                Vec3::new(
                    k * (l.y * l.y + l.z * l.z),
                    k * (l.x * l.x + l.z * l.z),
                    k * (l.x * l.x + l.y * l.y),
                )
            }
            Self::Sphere { radius } => Vec3::splat(0.4 * mass * radius * radius),
        }
    }
}

/// Everything needed to construct a rigid body, before it enters a world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyDesc {
    pub shape: CollisionShape,
    pub margin: f32,
    pub mass: f32,
    pub local_inertia: Vec3,
    pub transform: Transform,
    /// When false the body is never put to sleep by the island manager.
    pub can_sleep: bool,
}

impl RigidBodyDesc {
    /// Describe a body of `shape` at `transform`, with inertia computed for `mass`.
    pub fn new(shape: CollisionShape, mass: f32, transform: Transform) -> Self {
        Self {
            shape,
            margin: DEFAULT_MARGIN,
            mass,
            local_inertia: shape.local_inertia(mass),
            transform,
            can_sleep: true,
        }
    }

    /// Bodies with positive mass are simulated; the rest are fixed.
    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_mass_has_zero_inertia() {
        let shape = CollisionShape::Box {
            half_extents: Vec3::new(50.0, 0.5, 50.0),
        };
        assert_eq!(shape.local_inertia(0.0), Vec3::ZERO);
    }

    #[test]
    fn brick_inertia() {
        let shape = CollisionShape::Box {
            half_extents: Vec3::new(1.5, 0.75, 0.75),
        };
        let i = shape.local_inertia(20.0);
        // 20/12 * (1.5^2 + 1.5^2)
        assert_relative_eq!(i.x, 7.5, epsilon = 1e-5);
        // 20/12 * (3^2 + 1.5^2)
        assert_relative_eq!(i.y, 18.75, epsilon = 1e-5);
        assert_relative_eq!(i.z, 18.75, epsilon = 1e-5);
    }

    #[test]
    fn sphere_inertia() {
        let shape = CollisionShape::Sphere { radius: 1.2 };
        let i = shape.local_inertia(10.0);
        assert_relative_eq!(i.x, 5.76, epsilon = 1e-5);
        assert_eq!(i.x, i.y);
        assert_eq!(i.y, i.z);
    }

    #[test]
    fn desc_defaults() {
        let desc = RigidBodyDesc::new(
            CollisionShape::Sphere { radius: 1.0 },
            1.0,
            Transform::default(),
        );
        assert_eq!(desc.margin, DEFAULT_MARGIN);
        assert!(desc.can_sleep);
        assert!(desc.is_dynamic());
    }
}
