//! Application assembly and the per-frame loop body.
//!
//! A [`Session`] owns every simulation part and is the only thing a host
//! needs to drive. Hosts push [`InputEvent`]s as they arrive and call
//! [`Session::frame`] once per display refresh.
//!
//! # Invariants
//! - Queued input is consumed once, at the start of the next frame.
//! - Physics only advances while the controller is enabled.
//! - Frame order: input, physics step, pose copy, present, controller update.

use crate::config::AppConfig;
use crate::engine::{EngineError, SimulationEngine};
use crate::factory::ShapeFactory;
use crate::playground::Playground;
use crate::spawner::ProjectileSpawner;
use brickyard_common::ObjectId;
use brickyard_input::{FirstPersonController, InputEvent, InputQueue, PointerCapture};
use brickyard_render::{PerspectiveCamera, RenderView, Renderer, color_from_hex};

/// Summary of one [`Session::frame`].
#[derive(Debug)]
pub struct FrameReport<O> {
    pub delta: f32,
    pub substeps: u32,
    /// Projectiles fired while draining this frame's input.
    pub fired: Vec<ObjectId>,
    pub output: O,
}

pub struct Session {
    engine: SimulationEngine,
    factory: ShapeFactory,
    spawner: ProjectileSpawner,
    controller: FirstPersonController,
    camera: PerspectiveCamera,
    playground: Playground,
    inputs: InputQueue,
}

impl Session {
    /// Build the engine, factory, playground, spawner and controller in
    /// dependency order.
    pub fn assemble(config: &AppConfig) -> Result<Self, EngineError> {
        let mut engine = SimulationEngine::new(
            config.physics,
            color_from_hex(config.playground.clear_color),
        );
        let mut factory = match config.playground.material_seed {
            Some(seed) => ShapeFactory::with_seed(seed),
            None => ShapeFactory::new(),
        };
        let playground = Playground::build(&mut engine, &mut factory, &config.playground)?;
        let spawner = ProjectileSpawner::new(config.projectile, &mut engine);
        let controller = FirstPersonController::new(config.controller);
        tracing::info!(
            objects = engine.scene().object_count(),
            "session assembled"
        );
        Ok(Self {
            engine,
            factory,
            spawner,
            controller,
            camera: config.camera,
            playground,
            inputs: InputQueue::new(),
        })
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn controller(&self) -> &FirstPersonController {
        &self.controller
    }

    pub fn spawner(&self) -> &ProjectileSpawner {
        &self.spawner
    }

    pub fn playground(&self) -> &Playground {
        &self.playground
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Whether the pointer is captured and the simulation is live.
    pub fn is_active(&self) -> bool {
        self.controller.enabled()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.inputs.push(event);
    }

    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Track a new output surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        tracing::debug!(width, height, aspect = self.camera.aspect, "viewport resized");
    }

    /// The camera as currently placed by the controller.
    pub fn view(&self) -> RenderView {
        RenderView::new(self.camera, self.controller.camera_transform())
    }

    /// Drain queued input. A primary action fires while captured and asks
    /// the host for capture otherwise.
    pub fn process_inputs(
        &mut self,
        capture: &mut dyn PointerCapture,
    ) -> Result<Vec<ObjectId>, EngineError> {
        let mut fired = Vec::new();
        let events: Vec<InputEvent> = self.inputs.drain().collect();
        for event in events {
            match event {
                InputEvent::PrimaryAction if self.controller.enabled() => {
                    let view = self.view();
                    fired.push(
                        self.spawner
                            .trigger(&mut self.factory, &mut self.engine, &view)?,
                    );
                }
                InputEvent::PrimaryAction => match capture.request_capture() {
                    Ok(()) => self.controller.set_enabled(true),
                    Err(e) => tracing::warn!("pointer capture unavailable: {e}"),
                },
                InputEvent::CaptureChanged(false) => {
                    capture.release_capture();
                    self.controller.set_enabled(false);
                }
                other => {
                    self.controller.handle(&other);
                }
            }
        }
        Ok(fired)
    }

    /// Run one frame with the elapsed time measured by the engine clock.
    pub fn frame<R: Renderer>(
        &mut self,
        renderer: &mut R,
        capture: &mut dyn PointerCapture,
    ) -> Result<FrameReport<R::Output>, EngineError> {
        let fired = self.process_inputs(capture)?;
        let view = self.view();
        let active = self.controller.enabled();
        let frame = self.engine.advance_frame(renderer, &view, active);
        self.controller.update(frame.delta);
        Ok(FrameReport {
            delta: frame.delta,
            substeps: frame.substeps,
            fired,
            output: frame.output,
        })
    }

    /// [`frame`](Self::frame) with a fixed elapsed time, for headless runs.
    pub fn frame_by<R: Renderer>(
        &mut self,
        delta: f32,
        renderer: &mut R,
        capture: &mut dyn PointerCapture,
    ) -> Result<FrameReport<R::Output>, EngineError> {
        let fired = self.process_inputs(capture)?;
        let view = self.view();
        let active = self.controller.enabled();
        let frame = self.engine.advance_frame_by(delta, renderer, &view, active);
        self.controller.update(frame.delta);
        Ok(FrameReport {
            delta: frame.delta,
            substeps: frame.substeps,
            fired,
            output: frame.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaygroundConfig;
    use brickyard_input::{CaptureError, HeadlessCapture, MovementKey};
    use brickyard_render::DebugTextRenderer;

    const DT: f32 = 1.0 / 60.0;

    fn small_config() -> AppConfig {
        AppConfig {
            playground: PlaygroundConfig {
                walls: Vec::new(),
                material_seed: Some(1),
                ..PlaygroundConfig::default()
            },
            ..AppConfig::default()
        }
    }

    struct DenyingCapture;

    impl PointerCapture for DenyingCapture {
        fn request_capture(&mut self) -> Result<(), CaptureError> {
            Err(CaptureError::Denied("test".into()))
        }

        fn release_capture(&mut self) {}
    }

    #[test]
    fn first_click_captures_instead_of_firing() {
        let mut session = Session::assemble(&small_config()).unwrap();
        let mut capture = HeadlessCapture::new();
        let mut renderer = DebugTextRenderer::new();

        session.push_input(InputEvent::PrimaryAction);
        let report = session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        assert!(report.fired.is_empty());
        assert!(capture.is_captured());
        assert!(session.is_active());

        session.push_input(InputEvent::PrimaryAction);
        session.push_input(InputEvent::PrimaryAction);
        let report = session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        assert_eq!(report.fired.len(), 2);
        assert_eq!(session.engine().dynamic_bodies().len(), 2);
        assert_eq!(session.pending_inputs(), 0);
    }

    #[test]
    fn inactive_session_is_frozen() {
        let mut session = Session::assemble(&small_config()).unwrap();
        let mut capture = HeadlessCapture::new();
        let mut renderer = DebugTextRenderer::new();
        let start = session.view().eye();

        session.push_input(InputEvent::Key {
            key: MovementKey::Forward,
            pressed: true,
        });
        for _ in 0..10 {
            let report = session.frame_by(DT, &mut renderer, &mut capture).unwrap();
            assert_eq!(report.substeps, 0);
        }
        assert_eq!(session.view().eye(), start);
        assert_eq!(renderer.frames(), 10);
    }

    #[test]
    fn denied_capture_keeps_session_inactive() {
        let mut session = Session::assemble(&small_config()).unwrap();
        let mut renderer = DebugTextRenderer::new();
        session.push_input(InputEvent::PrimaryAction);
        let report = session
            .frame_by(DT, &mut renderer, &mut DenyingCapture)
            .unwrap();
        assert!(report.fired.is_empty());
        assert!(!session.is_active());
    }

    #[test]
    fn losing_capture_pauses_physics() {
        let mut session = Session::assemble(&small_config()).unwrap();
        let mut capture = HeadlessCapture::new();
        let mut renderer = DebugTextRenderer::new();

        session.push_input(InputEvent::PrimaryAction);
        session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        session.push_input(InputEvent::PrimaryAction);
        let fired = session
            .frame_by(DT, &mut renderer, &mut capture)
            .unwrap()
            .fired[0];
        let report = session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        assert_eq!(report.substeps, 1);

        session.push_input(InputEvent::CaptureChanged(false));
        let before = session.engine().object_transform(fired);
        let report = session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        assert_eq!(report.substeps, 0);
        assert!(!capture.is_captured());
        assert_eq!(session.engine().object_transform(fired), before);
    }

    #[test]
    fn captured_movement_moves_camera() {
        let mut session = Session::assemble(&small_config()).unwrap();
        let mut capture = HeadlessCapture::new();
        let mut renderer = DebugTextRenderer::new();
        session.push_input(InputEvent::PrimaryAction);
        session.push_input(InputEvent::Key {
            key: MovementKey::Forward,
            pressed: true,
        });
        session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        let start = session.view().eye();
        for _ in 0..30 {
            session.frame_by(DT, &mut renderer, &mut capture).unwrap();
        }
        let moved = session.view().eye() - start;
        assert!(moved.length() > 1.0);
        assert!(moved.dot(session.view().forward()) > 0.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut session = Session::assemble(&small_config()).unwrap();
        session.resize(800, 400);
        assert_eq!(session.view().camera.aspect, 2.0);
    }

    #[test]
    fn default_config_builds_full_scene() {
        let config = AppConfig {
            playground: PlaygroundConfig {
                material_seed: Some(9),
                ..PlaygroundConfig::default()
            },
            ..AppConfig::default()
        };
        let session = Session::assemble(&config).unwrap();
        assert_eq!(session.playground().bricks.len(), 286);
        assert_eq!(session.engine().scene().materials().len(), 8);
    }
}
