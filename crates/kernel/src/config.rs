use crate::factory::{WallAxis, WallLayout};
use brickyard_input::ControllerConfig;
use brickyard_physics::PhysicsConfig;
use brickyard_render::PerspectiveCamera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Launch parameters for fired spheres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f32,
    pub mass: f32,
    /// Launch speed in units per second.
    pub speed: f32,
    pub color: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 1.2,
            mass: 10.0,
            speed: 80.0,
            color: 0x202020,
        }
    }
}

/// The demo scene: ground slab, brick walls and lighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub clear_color: u32,
    pub ground_half_extents: Vec3,
    pub ground_color: u32,
    pub ground_texture: Option<String>,
    pub brick_palette: Vec<u32>,
    pub brick_texture: Option<String>,
    /// Seed for brick material choice; `None` draws from entropy.
    pub material_seed: Option<u64>,
    pub walls: Vec<WallLayout>,
    pub light_position: Vec3,
    pub light_color: u32,
    pub light_intensity: f32,
    pub ambient_color: u32,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        let wall = |axis, start, end, offset, shift| WallLayout {
            axis,
            mass: 20.0,
            start,
            end,
            height: 15.0,
            offset,
            shift,
        };
        Self {
            clear_color: 0xBFD1E5,
            ground_half_extents: Vec3::new(50.0, 0.5, 50.0),
            ground_color: 0xFFFFFF,
            ground_texture: Some("img/cement.jpg".into()),
            brick_palette: vec![0xB7B7B7, 0xAAAAAA, 0xA4A4A4, 0x979797, 0x949494, 0x909090],
            brick_texture: Some("img/brick.jpg".into()),
            material_seed: None,
            walls: vec![
                wall(WallAxis::X, -9.0, 9.0, -9.0, false),
                wall(WallAxis::X, -9.0, 9.0, 9.0, true),
                wall(WallAxis::Z, -8.25, 8.25, -9.75, true),
                wall(WallAxis::Z, -8.25, 8.25, 11.25, false),
            ],
            light_position: Vec3::new(50.0, 100.0, 50.0),
            light_color: 0xFFFFFF,
            light_intensity: 1.0,
            ambient_color: 0x606060,
        }
    }
}

/// Everything an application needs to assemble a session.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub physics: PhysicsConfig,
    pub camera: PerspectiveCamera,
    pub controller: ControllerConfig,
    pub projectile: ProjectileConfig,
    pub playground: PlaygroundConfig,
}

impl AppConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.playground.walls.len(), 4);
        assert_eq!(config.physics.max_substeps, 10);
    }

    #[test]
    fn partial_override() {
        let config = AppConfig::from_json_str(
            r#"{ "projectile": { "speed": 40.0 }, "playground": { "material_seed": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.projectile.speed, 40.0);
        assert_eq!(config.projectile.radius, 1.2);
        assert_eq!(config.playground.material_seed, Some(3));
        assert_eq!(config.playground.brick_palette.len(), 6);
    }

    #[test]
    fn round_trips_through_json() {
        let config = AppConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(AppConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            AppConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = AppConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
