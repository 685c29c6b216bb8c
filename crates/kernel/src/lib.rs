//! Simulation kernel: couples the physics world to the render scene.
//!
//! # Invariants
//! - Every object whose body has mass > 0 is in the dynamic-body registry
//!   exactly once; fixed bodies never are.
//! - Poses flow one way, physics → render, in registration order.
//! - Objects and bodies enter the simulation only through
//!   [`SimulationEngine::register_object`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod factory;
pub mod playground;
pub mod session;
pub mod spawner;

pub use clock::FrameClock;
pub use config::{AppConfig, ConfigError, PlaygroundConfig, ProjectileConfig};
pub use engine::{DynamicBody, EngineError, Frame, SimulationEngine};
pub use factory::{BRICK_HALF_EXTENTS, ShapeFactory, WallAxis, WallLayout};
pub use playground::Playground;
pub use session::{FrameReport, Session};
pub use spawner::ProjectileSpawner;

pub fn crate_info() -> &'static str {
    "brickyard-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
