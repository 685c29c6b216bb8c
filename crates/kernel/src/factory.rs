use crate::engine::{EngineError, SimulationEngine};
use brickyard_common::{ObjectId, Transform};
use brickyard_physics::{CollisionShape, RigidBodyDesc};
use brickyard_render::{MaterialId, Mesh, RenderableObject};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Half extents of a 3 × 1.5 × 1.5 brick.
pub const BRICK_HALF_EXTENTS: Vec3 = Vec3::new(1.5, 0.75, 0.75);

/// Vertical distance between brick layers.
const LAYER_HEIGHT: f64 = 1.5;
/// Distance between brick centres along the span.
const BRICK_PITCH: f64 = 3.0;
/// Running-bond offset applied to every other layer.
const HALF_BRICK: f64 = 1.5;

/// World axis a wall runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallAxis {
    X,
    Z,
}

/// Parameters of one brick wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallLayout {
    pub axis: WallAxis,
    /// Mass of each brick.
    pub mass: f32,
    /// First brick centre along the span.
    pub start: f64,
    /// Last admissible brick centre along the span, inclusive.
    pub end: f64,
    /// Height of the topmost admissible layer base, inclusive.
    pub height: f64,
    /// Coordinate of the wall on the other horizontal axis.
    pub offset: f64,
    /// Whether the bottom layer starts shifted by half a brick.
    pub shift: bool,
}

impl WallLayout {
    /// Brick centres in placement order, bottom layer first.
    ///
    /// Layers and bricks are found by accumulating the step and comparing
    /// with `<=`, so the count follows floating-point accumulation rather
    /// than a precomputed division.
    pub fn brick_positions(&self) -> Vec<Vec3> {
        let mut positions = Vec::new();
        let mut shift = self.shift;
        let mut y = 0.0_f64;
        while y <= self.height {
            let shove = if shift { HALF_BRICK } else { 0.0 };
            shift = !shift;
            let mut s = self.start;
            while s <= self.end {
                let along = (s + shove) as f32;
                let up = (y + LAYER_HEIGHT / 2.0) as f32;
                let across = self.offset as f32;
                positions.push(match self.axis {
                    WallAxis::X => Vec3::new(along, up, across),
                    WallAxis::Z => Vec3::new(across, up, along),
                });
                s += BRICK_PITCH;
            }
            y += LAYER_HEIGHT;
        }
        positions
    }

    /// Orientation shared by every brick in the wall.
    pub fn brick_rotation(&self) -> Quat {
        match self.axis {
            WallAxis::X => Quat::IDENTITY,
            WallAxis::Z => Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        }
    }
}

/// Builds matching (renderable, body) pairs and registers them with the engine.
pub struct ShapeFactory {
    rng: StdRng,
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeFactory {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Factory whose material choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn create_box(
        &mut self,
        engine: &mut SimulationEngine,
        half_extents: Vec3,
        mass: f32,
        transform: Transform,
        material: MaterialId,
    ) -> ObjectId {
        engine.register_object(
            RenderableObject::new(Mesh::Box { half_extents }, material, transform),
            RigidBodyDesc::new(CollisionShape::Box { half_extents }, mass, transform),
        )
    }

    pub fn create_sphere(
        &mut self,
        engine: &mut SimulationEngine,
        radius: f32,
        mass: f32,
        transform: Transform,
        material: MaterialId,
    ) -> ObjectId {
        engine.register_object(
            RenderableObject::new(Mesh::Sphere { radius }, material, transform),
            RigidBodyDesc::new(CollisionShape::Sphere { radius }, mass, transform),
        )
    }

    /// Lay out a running-bond brick wall. Each brick takes a material drawn
    /// uniformly from `materials` and casts and receives shadows.
    pub fn create_wall(
        &mut self,
        engine: &mut SimulationEngine,
        layout: &WallLayout,
        materials: &[MaterialId],
    ) -> Result<Vec<ObjectId>, EngineError> {
        if materials.is_empty() {
            return Err(EngineError::EmptyPalette);
        }
        let rotation = layout.brick_rotation();
        let mut bricks = Vec::new();
        for position in layout.brick_positions() {
            let material = materials[self.rng.gen_range(0..materials.len())];
            let id = self.create_box(
                engine,
                BRICK_HALF_EXTENTS,
                layout.mass,
                Transform::new(position, rotation),
                material,
            );
            engine.set_shadow_flags(id, true, true)?;
            bricks.push(id);
        }
        tracing::debug!(axis = ?layout.axis, bricks = bricks.len(), "wall built");
        Ok(bricks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickyard_physics::PhysicsConfig;
    use std::collections::BTreeSet;

    fn engine() -> SimulationEngine {
        SimulationEngine::new(PhysicsConfig::default(), Vec3::ZERO)
    }

    fn x_wall() -> WallLayout {
        WallLayout {
            axis: WallAxis::X,
            mass: 20.0,
            start: -9.0,
            end: 9.0,
            height: 15.0,
            offset: -9.0,
            shift: false,
        }
    }

    #[test]
    fn x_wall_running_bond() {
        let positions = x_wall().brick_positions();
        assert_eq!(positions.len(), 77);

        let layers: Vec<Vec<&Vec3>> = (0..11)
            .map(|layer| {
                let y = layer as f32 * 1.5 + 0.75;
                positions.iter().filter(|p| p.y == y).collect()
            })
            .collect();
        let even = [-9.0, -6.0, -3.0, 0.0, 3.0, 6.0, 9.0];
        let odd = [-7.5, -4.5, -1.5, 1.5, 4.5, 7.5, 10.5];
        for (i, layer) in layers.iter().enumerate() {
            let xs: Vec<f32> = layer.iter().map(|p| p.x).collect();
            let expected = if i % 2 == 0 { even } else { odd };
            assert_eq!(xs, expected, "layer {i}");
            assert!(layer.iter().all(|p| p.z == -9.0));
        }
    }

    #[test]
    fn shifted_wall_starts_offset() {
        let layout = WallLayout {
            shift: true,
            ..x_wall()
        };
        let positions = layout.brick_positions();
        assert_eq!(positions[0], Vec3::new(-7.5, 0.75, -9.0));
        assert_eq!(positions[7], Vec3::new(-9.0, 2.25, -9.0));
    }

    #[test]
    fn z_wall_uses_z_span() {
        let layout = WallLayout {
            axis: WallAxis::Z,
            mass: 20.0,
            start: -8.25,
            end: 8.25,
            height: 15.0,
            offset: -9.75,
            shift: true,
        };
        let positions = layout.brick_positions();
        // -8.25, -5.25, ..., 6.75 fits six bricks per layer.
        assert_eq!(positions.len(), 66);
        assert!(positions.iter().all(|p| p.x == -9.75));
        assert_eq!(positions[0].z, -6.75);

        let long_axis = layout.brick_rotation() * Vec3::X;
        assert!(long_axis.x.abs() < 1e-6);
        assert!((long_axis.z.abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wall_registers_dynamic_bricks() {
        let mut e = engine();
        let mut factory = ShapeFactory::with_seed(7);
        let palette = [MaterialId(0), MaterialId(1), MaterialId(2)];
        let bricks = factory.create_wall(&mut e, &x_wall(), &palette).unwrap();

        assert_eq!(bricks.len(), 77);
        assert_eq!(e.dynamic_bodies().len(), 77);
        for id in &bricks {
            let o = e.scene().object(*id).unwrap();
            assert!(o.cast_shadow && o.receive_shadow);
            assert!(palette.contains(&o.material));
        }
        let used: BTreeSet<MaterialId> = bricks
            .iter()
            .map(|id| e.scene().object(*id).unwrap().material)
            .collect();
        assert!(used.len() > 1);
    }

    #[test]
    fn seeded_factories_agree() {
        let palette = [MaterialId(0), MaterialId(1), MaterialId(2), MaterialId(3)];
        let pick = |seed| {
            let mut e = engine();
            let bricks = ShapeFactory::with_seed(seed)
                .create_wall(&mut e, &x_wall(), &palette)
                .unwrap();
            bricks
                .iter()
                .map(|id| e.scene().object(*id).unwrap().material)
                .collect::<Vec<_>>()
        };
        assert_eq!(pick(11), pick(11));
    }

    #[test]
    fn empty_palette_is_rejected() {
        let mut e = engine();
        let result = ShapeFactory::with_seed(0).create_wall(&mut e, &x_wall(), &[]);
        assert!(matches!(result, Err(EngineError::EmptyPalette)));
        assert_eq!(e.scene().object_count(), 0);
    }

    #[test]
    fn zero_mass_box_is_static() {
        let mut e = engine();
        let id = ShapeFactory::with_seed(0).create_box(
            &mut e,
            Vec3::new(50.0, 0.5, 50.0),
            0.0,
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            MaterialId(0),
        );
        assert!(e.dynamic_bodies().is_empty());
        let h = e.body_of(id).unwrap();
        assert_eq!(e.physics().is_dynamic(h), Some(false));
    }

    #[test]
    fn sphere_gets_mass() {
        let mut e = engine();
        let id = ShapeFactory::with_seed(0).create_sphere(
            &mut e,
            1.2,
            10.0,
            Transform::from_position(Vec3::Y * 5.0),
            MaterialId(0),
        );
        let h = e.body_of(id).unwrap();
        let mass = e.physics().mass(h).unwrap();
        assert!((mass - 10.0).abs() < 1e-3);
    }
}
