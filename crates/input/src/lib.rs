//! Input layer: host events, pointer capture, first-person controller.
//!
//! # Invariants
//! - Hosts only enqueue [`InputEvent`]s; consumers drain the queue once per
//!   frame on the simulation thread.
//! - The controller only observes key edges, and only while enabled.
//! - Capture negotiation goes through [`PointerCapture`]; nothing here knows
//!   about a particular windowing system.

pub mod capture;
pub mod controller;
pub mod event;

pub use capture::{CaptureError, HeadlessCapture, PointerCapture};
pub use controller::{CameraRig, ControllerConfig, FirstPersonController, MovementState};
pub use event::{InputEvent, InputQueue, MovementKey};

pub fn crate_info() -> &'static str {
    "brickyard-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
