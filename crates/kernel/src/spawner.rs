use crate::config::ProjectileConfig;
use crate::engine::{EngineError, SimulationEngine};
use crate::factory::ShapeFactory;
use brickyard_common::{ObjectId, Transform};
use brickyard_render::{Material, MaterialId, RenderView};
use glam::Vec2;

/// Fires spheres from the camera through the viewport centre.
///
/// Spheres are never despawned; every trigger adds one body for good.
pub struct ProjectileSpawner {
    config: ProjectileConfig,
    material: MaterialId,
    fired: u64,
}

impl ProjectileSpawner {
    /// Create a spawner, registering its material with the engine.
    pub fn new(config: ProjectileConfig, engine: &mut SimulationEngine) -> Self {
        let material = engine.add_material(Material::from_hex(config.color));
        Self {
            config,
            material,
            fired: 0,
        }
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Projectiles fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Spawn a sphere one unit ahead of the eye and launch it along the
    /// centre ray at the configured speed.
    pub fn trigger(
        &mut self,
        factory: &mut ShapeFactory,
        engine: &mut SimulationEngine,
        view: &RenderView,
    ) -> Result<ObjectId, EngineError> {
        let ray = view.ray_from_ndc(Vec2::ZERO);
        let spawn = ray.at(1.0);
        let id = factory.create_sphere(
            engine,
            self.config.radius,
            self.config.mass,
            Transform::from_position(spawn),
            self.material,
        );
        engine.set_shadow_flags(id, true, true)?;
        engine.set_linear_velocity(id, ray.direction * self.config.speed)?;
        self.fired += 1;
        tracing::debug!(%id, ?spawn, "projectile fired");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brickyard_physics::PhysicsConfig;
    use brickyard_render::PerspectiveCamera;
    use glam::{Quat, Vec3};

    fn setup() -> (SimulationEngine, ShapeFactory, ProjectileSpawner) {
        let mut engine = SimulationEngine::new(PhysicsConfig::default(), Vec3::ZERO);
        let spawner = ProjectileSpawner::new(ProjectileConfig::default(), &mut engine);
        (engine, ShapeFactory::with_seed(1), spawner)
    }

    fn view() -> RenderView {
        let rotation = Quat::from_rotation_y(0.75) * Quat::from_rotation_x(-0.25);
        RenderView::new(
            PerspectiveCamera::default(),
            Transform::new(Vec3::new(40.0, 25.0, 40.0), rotation),
        )
    }

    #[test]
    fn each_trigger_adds_one_dynamic_body() {
        let (mut engine, mut factory, mut spawner) = setup();
        let view = view();
        let forward = view.forward();
        for n in 1..=5 {
            let id = spawner.trigger(&mut factory, &mut engine, &view).unwrap();
            assert_eq!(engine.dynamic_bodies().len(), n);
            let v = engine.linear_velocity(id).unwrap();
            assert_relative_eq!(v.length(), 80.0, epsilon = 1e-3);
            assert!(v.normalize().dot(forward) > 0.9999);
        }
        assert_eq!(spawner.fired(), 5);
    }

    #[test]
    fn spawns_one_unit_ahead() {
        let (mut engine, mut factory, mut spawner) = setup();
        let view = view();
        let id = spawner.trigger(&mut factory, &mut engine, &view).unwrap();
        let p = engine.object_transform(id).unwrap().position;
        assert_relative_eq!(p.distance(view.eye()), 1.0, epsilon = 1e-4);

        let o = engine.scene().object(id).unwrap();
        assert!(o.cast_shadow && o.receive_shadow);
        assert_eq!(o.material, spawner.material());
    }

    #[test]
    fn follows_current_view() {
        let (mut engine, mut factory, mut spawner) = setup();
        let level = RenderView::new(PerspectiveCamera::default(), Transform::default());
        let id = spawner.trigger(&mut factory, &mut engine, &level).unwrap();
        let v = engine.linear_velocity(id).unwrap();
        assert_relative_eq!(v.z, -80.0, epsilon = 1e-3);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-3);
    }
}
