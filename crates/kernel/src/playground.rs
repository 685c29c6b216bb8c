use crate::config::PlaygroundConfig;
use crate::engine::{EngineError, SimulationEngine};
use crate::factory::ShapeFactory;
use brickyard_common::{ObjectId, Transform};
use brickyard_render::{
    AmbientLight, DirectionalLight, Light, Material, MaterialId, ShadowCamera, color_from_hex,
};

/// The demo scene built on top of the engine's public operations.
#[derive(Debug, Clone)]
pub struct Playground {
    pub ground: ObjectId,
    pub bricks: Vec<ObjectId>,
    pub brick_materials: Vec<MaterialId>,
}

impl Playground {
    /// Add lights, a static ground slab and the configured brick walls.
    ///
    /// Texture names are recorded on the materials; a renderer that cannot
    /// resolve them draws the base colour.
    pub fn build(
        engine: &mut SimulationEngine,
        factory: &mut ShapeFactory,
        config: &PlaygroundConfig,
    ) -> Result<Self, EngineError> {
        engine.add_light(Light::Directional(DirectionalLight {
            color: color_from_hex(config.light_color),
            intensity: config.light_intensity,
            position: config.light_position,
            cast_shadow: true,
            shadow: ShadowCamera::default(),
        }));
        engine.add_light(Light::Ambient(AmbientLight {
            color: color_from_hex(config.ambient_color),
        }));
        engine.enable_shadows();

        let ground_material = engine.add_material(Material {
            texture: config.ground_texture.clone(),
            ..Material::from_hex(config.ground_color)
        });
        let half = config.ground_half_extents;
        let ground = factory.create_box(
            engine,
            half,
            0.0,
            Transform::from_position(glam::Vec3::new(0.0, -half.y, 0.0)),
            ground_material,
        );
        engine.set_shadow_flags(ground, true, true)?;

        let brick_materials: Vec<MaterialId> = config
            .brick_palette
            .iter()
            .map(|hex| {
                engine.add_material(Material {
                    texture: config.brick_texture.clone(),
                    ..Material::from_hex(*hex)
                })
            })
            .collect();

        let mut bricks = Vec::new();
        for wall in &config.walls {
            bricks.extend(factory.create_wall(engine, wall, &brick_materials)?);
        }
        tracing::info!(
            bricks = bricks.len(),
            walls = config.walls.len(),
            "playground built"
        );

        Ok(Self {
            ground,
            bricks,
            brick_materials,
        })
    }
}
