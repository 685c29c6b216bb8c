use crate::event::{InputEvent, MovementKey};
use brickyard_common::Transform;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Tuning and start pose for the first-person controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Radians of rotation per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Exponential velocity damping rate, per second.
    pub damping: f32,
    /// Velocity gained per second while a movement key is held.
    pub acceleration: f32,
    pub start_position: Vec3,
    pub start_yaw: f32,
    pub start_pitch: f32,
    pub initial_velocity: Vec3,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: 0.002,
            damping: 10.0,
            acceleration: 400.0,
            start_position: Vec3::new(40.0, 25.0, 40.0),
            start_yaw: 0.75,
            start_pitch: -0.25,
            initial_velocity: Vec3::ONE,
        }
    }
}

/// Two-node look rig: the yaw node carries position and horizontal look,
/// the pitch node (child of yaw) carries vertical look, and the camera sits
/// at the pitch node's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub yaw: f32,
    pitch: f32,
}

impl CameraRig {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set pitch, clamped to straight up / straight down.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// World pose of the camera at the end of the rig.
    pub fn camera_transform(&self) -> Transform {
        Transform::new(
            self.position,
            self.yaw_rotation() * Quat::from_rotation_x(self.pitch),
        )
    }

    /// Move along the yaw node's own axes; pitch does not tilt movement.
    pub fn translate_local(&mut self, offset: Vec3) {
        self.position += self.yaw_rotation() * offset;
    }
}

/// Held movement keys plus the rig's velocity in yaw-local space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub velocity: Vec3,
}

impl MovementState {
    fn set(&mut self, key: MovementKey, pressed: bool) {
        match key {
            MovementKey::Forward => self.forward = pressed,
            MovementKey::Backward => self.backward = pressed,
            MovementKey::Left => self.left = pressed,
            MovementKey::Right => self.right = pressed,
        }
    }

    fn clear_keys(&mut self) {
        self.forward = false;
        self.backward = false;
        self.left = false;
        self.right = false;
    }
}

/// Mouse-look and WASD movement for a first-person camera.
///
/// Look and movement are independent; both only respond while the
/// controller is enabled, which the host ties to pointer capture.
#[derive(Debug, Clone)]
pub struct FirstPersonController {
    config: ControllerConfig,
    rig: CameraRig,
    movement: MovementState,
    enabled: bool,
}

impl FirstPersonController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            rig: CameraRig::new(config.start_position, config.start_yaw, config.start_pitch),
            movement: MovementState {
                velocity: config.initial_velocity,
                ..MovementState::default()
            },
            enabled: false,
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn movement(&self) -> &MovementState {
        &self.movement
    }

    pub fn velocity(&self) -> Vec3 {
        self.movement.velocity
    }

    pub fn camera_transform(&self) -> Transform {
        self.rig.camera_transform()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable look, movement and key handling together.
    ///
    /// Disabling forgets held keys: a key still down when the controller is
    /// re-enabled does nothing until it is released and pressed again.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::debug!(enabled, "controller toggled");
        }
        self.enabled = enabled;
        if !enabled {
            self.movement.clear_keys();
        }
    }

    pub fn on_pointer_motion(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let k = self.config.look_sensitivity;
        self.rig.yaw -= dx * k;
        self.rig.set_pitch(self.rig.pitch - dy * k);
    }

    pub fn on_key(&mut self, key: MovementKey, pressed: bool) {
        if !self.enabled {
            return;
        }
        self.movement.set(key, pressed);
    }

    /// Route a look, key or capture event. Returns false for events the
    /// controller does not consume.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Key { key, pressed } => self.on_key(key, pressed),
            InputEvent::PointerMotion { dx, dy } => self.on_pointer_motion(dx, dy),
            InputEvent::CaptureChanged(active) => self.set_enabled(active),
            InputEvent::PrimaryAction => return false,
        }
        true
    }

    /// Integrate velocity and move the rig by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        let m = &mut self.movement;
        let drag = self.config.damping * dt;
        m.velocity -= m.velocity * drag;

        let impulse = self.config.acceleration * dt;
        if m.forward {
            m.velocity.z -= impulse;
        }
        if m.backward {
            m.velocity.z += impulse;
        }
        if m.left {
            m.velocity.x -= impulse;
        }
        if m.right {
            m.velocity.x += impulse;
        }

        let v = m.velocity;
        self.rig.translate_local(Vec3::new(v.x * dt, 0.0, 0.0));
        self.rig.translate_local(Vec3::new(0.0, 0.0, v.z * dt));
    }
}
