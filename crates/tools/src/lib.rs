//! Developer tooling: simulation inspector and frame statistics.
//!
//! # Invariants
//! - Tools only read simulation state; nothing here feeds back into a frame.

pub mod inspector;
pub mod stats;

pub use inspector::{EngineInspector, EngineSummary, ObjectInfo};
pub use stats::FrameStats;

pub fn crate_info() -> &'static str {
    "brickyard-tools v0.1.0"
}
