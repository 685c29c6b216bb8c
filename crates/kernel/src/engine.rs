use crate::clock::FrameClock;
use brickyard_common::{ObjectId, Transform};
use brickyard_physics::{BodyHandle, PhysicsConfig, PhysicsWorld, RigidBodyDesc};
use brickyard_render::{
    Light, Material, MaterialId, RenderScene, RenderView, RenderableObject, Renderer,
};
use glam::Vec3;
use std::collections::BTreeMap;

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("object {0} is not registered")]
    UnknownObject(ObjectId),
    #[error("wall layout needs at least one material")]
    EmptyPalette,
}

/// One entry of the dynamic-body registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicBody {
    pub object: ObjectId,
    pub body: BodyHandle,
}

/// What one call to [`SimulationEngine::advance_frame`] did.
#[derive(Debug)]
pub struct Frame<O> {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Physics substeps integrated this frame (0 when physics was gated off).
    pub substeps: u32,
    /// Whatever the renderer produced.
    pub output: O,
}

/// Physics world + render scene, kept in sync.
///
/// The engine owns both halves and the mapping between them. Each frame it
/// steps the physics world and copies the pose of every dynamic body into its
/// renderable, in the order the bodies were registered.
pub struct SimulationEngine {
    physics: PhysicsWorld,
    scene: RenderScene,
    /// Bodies with mass > 0, in registration order.
    dynamic_bodies: Vec<DynamicBody>,
    /// Physics back-reference for every registered object.
    bodies: BTreeMap<ObjectId, BodyHandle>,
    clock: FrameClock,
    frames: u64,
}

impl SimulationEngine {
    pub fn new(physics: PhysicsConfig, clear_color: Vec3) -> Self {
        Self {
            physics: PhysicsWorld::new(physics),
            scene: RenderScene::new(clear_color),
            dynamic_bodies: Vec::new(),
            bodies: BTreeMap::new(),
            clock: FrameClock::new(),
            frames: 0,
        }
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Registered dynamic bodies in pose-copy order.
    pub fn dynamic_bodies(&self) -> &[DynamicBody] {
        &self.dynamic_bodies
    }

    /// Frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The physics body backing `object`, if any.
    pub fn body_of(&self, object: ObjectId) -> Option<BodyHandle> {
        self.bodies.get(&object).copied()
    }

    /// Add a renderable together with its physics body.
    ///
    /// Bodies with positive mass are marked non-deactivating and appended to
    /// the dynamic-body registry. The object always joins the scene and the
    /// body always joins the physics world.
    pub fn register_object(
        &mut self,
        object: RenderableObject,
        mut body: RigidBodyDesc,
    ) -> ObjectId {
        let dynamic = body.is_dynamic();
        if dynamic {
            body.can_sleep = false;
        }
        let handle = self.physics.add_body(&body);
        let id = self.scene.add_object(object);
        self.bodies.insert(id, handle);
        if dynamic {
            self.dynamic_bodies.push(DynamicBody {
                object: id,
                body: handle,
            });
        }
        tracing::debug!(%id, mass = body.mass, dynamic, "object registered");
        id
    }

    /// Remove an object from the scene, the physics world and the registry.
    pub fn deregister(&mut self, object: ObjectId) -> Result<(), EngineError> {
        let handle = self
            .bodies
            .remove(&object)
            .ok_or(EngineError::UnknownObject(object))?;
        self.physics.remove_body(handle);
        self.scene.remove_object(object);
        self.dynamic_bodies.retain(|entry| entry.object != object);
        tracing::debug!(%object, "object deregistered");
        Ok(())
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.scene.add_material(material)
    }

    /// Mutable access for the asset collaborator to attach textures.
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.scene.material_mut(id)
    }

    pub fn add_light(&mut self, light: Light) {
        self.scene.add_light(light);
    }

    pub fn enable_shadows(&mut self) {
        self.scene.enable_shadows();
    }

    pub fn set_shadow_flags(
        &mut self,
        object: ObjectId,
        cast: bool,
        receive: bool,
    ) -> Result<(), EngineError> {
        let o = self
            .scene
            .object_mut(object)
            .ok_or(EngineError::UnknownObject(object))?;
        o.cast_shadow = cast;
        o.receive_shadow = receive;
        Ok(())
    }

    pub fn set_linear_velocity(
        &mut self,
        object: ObjectId,
        velocity: Vec3,
    ) -> Result<(), EngineError> {
        let handle = self
            .body_of(object)
            .ok_or(EngineError::UnknownObject(object))?;
        if self.physics.set_linear_velocity(handle, velocity) {
            Ok(())
        } else {
            Err(EngineError::UnknownObject(object))
        }
    }

    pub fn linear_velocity(&self, object: ObjectId) -> Option<Vec3> {
        self.body_of(object)
            .and_then(|h| self.physics.linear_velocity(h))
    }

    /// Pose of an object as currently shown by the scene.
    pub fn object_transform(&self, object: ObjectId) -> Option<Transform> {
        self.scene.object(object).map(|o| o.transform)
    }

    /// Pose of an object's body as currently held by the physics world.
    pub fn body_transform(&self, object: ObjectId) -> Option<Transform> {
        self.body_of(object)
            .and_then(|h| self.physics.world_transform(h))
    }

    /// Step physics by `dt` seconds, then copy dynamic poses into the scene.
    ///
    /// Entries whose body has no pose are skipped for this frame.
    pub fn step(&mut self, dt: f32) -> u32 {
        let substeps = self.physics.step(dt);
        for entry in &self.dynamic_bodies {
            match self.physics.world_transform(entry.body) {
                Some(pose) => {
                    self.scene.set_transform(entry.object, pose);
                }
                None => {
                    tracing::trace!(object = %entry.object, "body has no pose yet, skipped");
                }
            }
        }
        substeps
    }

    /// Render the scene once from `view`.
    pub fn present<R: Renderer>(&self, renderer: &mut R, view: &RenderView) -> R::Output {
        renderer.render(&self.scene, view)
    }

    /// Measure the time since the previous frame, step physics when
    /// `physics_enabled`, and present.
    pub fn advance_frame<R: Renderer>(
        &mut self,
        renderer: &mut R,
        view: &RenderView,
        physics_enabled: bool,
    ) -> Frame<R::Output> {
        let delta = self.clock.tick();
        self.advance_frame_by(delta, renderer, view, physics_enabled)
    }

    /// [`advance_frame`](Self::advance_frame) with a caller-supplied delta.
    pub fn advance_frame_by<R: Renderer>(
        &mut self,
        delta: f32,
        renderer: &mut R,
        view: &RenderView,
        physics_enabled: bool,
    ) -> Frame<R::Output> {
        let _span = tracing::trace_span!("frame", n = self.frames).entered();
        let substeps = if physics_enabled { self.step(delta) } else { 0 };
        let output = self.present(renderer, view);
        self.frames += 1;
        Frame {
            delta,
            substeps,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickyard_physics::CollisionShape;
    use brickyard_render::{DebugTextRenderer, Mesh, PerspectiveCamera};
    use glam::Quat;

    fn engine() -> SimulationEngine {
        SimulationEngine::new(PhysicsConfig::default(), Vec3::ZERO)
    }

    fn view() -> RenderView {
        RenderView::new(PerspectiveCamera::default(), Transform::default())
    }

    fn add_box(engine: &mut SimulationEngine, mass: f32, at: Vec3) -> ObjectId {
        let half_extents = Vec3::splat(0.5);
        let transform = Transform::from_position(at);
        engine.register_object(
            RenderableObject::new(Mesh::Box { half_extents }, MaterialId(0), transform),
            RigidBodyDesc::new(CollisionShape::Box { half_extents }, mass, transform),
        )
    }

    fn add_ground(engine: &mut SimulationEngine) -> ObjectId {
        let half_extents = Vec3::new(50.0, 0.5, 50.0);
        let transform = Transform::from_position(Vec3::new(0.0, -0.5, 0.0));
        engine.register_object(
            RenderableObject::new(Mesh::Box { half_extents }, MaterialId(0), transform),
            RigidBodyDesc::new(CollisionShape::Box { half_extents }, 0.0, transform),
        )
    }

    #[test]
    fn only_positive_mass_enters_registry() {
        let mut e = engine();
        let ground = add_ground(&mut e);
        let a = add_box(&mut e, 1.0, Vec3::new(0.0, 2.0, 0.0));
        let b = add_box(&mut e, 2.0, Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(e.scene().object_count(), 3);
        assert_eq!(e.physics().body_count(), 3);
        let order: Vec<ObjectId> = e.dynamic_bodies().iter().map(|d| d.object).collect();
        assert_eq!(order, vec![a, b]);
        assert!(e.body_of(ground).is_some());
        assert!(!order.contains(&ground));
    }

    #[test]
    fn dynamic_bodies_never_sleep() {
        let mut e = engine();
        add_ground(&mut e);
        let a = add_box(&mut e, 1.0, Vec3::new(0.0, 0.5, 0.0));
        for _ in 0..300 {
            e.step(1.0 / 60.0);
        }
        let h = e.body_of(a).unwrap();
        assert_eq!(e.physics().is_sleeping(h), Some(false));
    }

    #[test]
    fn render_matches_physics_after_every_step() {
        let mut e = engine();
        add_ground(&mut e);
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(add_box(&mut e, 1.0, Vec3::new(i as f32 * 0.3, 2.0 + i as f32 * 1.1, 0.0)));
        }
        for frame in 0..60 {
            let dt = if frame % 7 == 0 { 0.05 } else { 1.0 / 60.0 };
            e.step(dt);
            for id in &ids {
                assert_eq!(e.object_transform(*id), e.body_transform(*id));
            }
        }
    }

    #[test]
    fn static_objects_keep_their_placement() {
        let mut e = engine();
        let ground = add_ground(&mut e);
        add_box(&mut e, 1.0, Vec3::new(0.0, 3.0, 0.0));
        let placed = e.object_transform(ground).unwrap();
        for _ in 0..120 {
            e.step(1.0 / 60.0);
        }
        assert_eq!(e.object_transform(ground), Some(placed));
    }

    #[test]
    fn falling_box_moves_in_scene() {
        let mut e = engine();
        let a = add_box(&mut e, 1.0, Vec3::new(0.0, 10.0, 0.0));
        e.step(0.1);
        assert!(e.object_transform(a).unwrap().position.y < 10.0);
    }

    #[test]
    fn orientation_is_copied() {
        let mut e = engine();
        let half_extents = Vec3::new(1.5, 0.75, 0.75);
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let transform = Transform::new(Vec3::new(0.0, 5.0, 0.0), rotation);
        let id = e.register_object(
            RenderableObject::new(Mesh::Box { half_extents }, MaterialId(0), transform),
            RigidBodyDesc::new(CollisionShape::Box { half_extents }, 20.0, transform),
        );
        e.step(1.0 / 60.0);
        let shown = e.object_transform(id).unwrap();
        assert!(shown.rotation.is_normalized());
        assert_eq!(Some(shown), e.body_transform(id));
    }

    #[test]
    fn gated_physics_freezes_but_still_presents() {
        let mut e = engine();
        let a = add_box(&mut e, 1.0, Vec3::new(0.0, 10.0, 0.0));
        let mut renderer = DebugTextRenderer::new();
        let frame = e.advance_frame_by(0.1, &mut renderer, &view(), false);
        assert_eq!(frame.substeps, 0);
        assert_eq!(frame.delta, 0.1);
        assert_eq!(renderer.frames(), 1);
        assert_eq!(e.object_transform(a).unwrap().position.y, 10.0);

        let frame = e.advance_frame_by(0.1, &mut renderer, &view(), true);
        assert!(frame.substeps > 0);
        assert!(e.object_transform(a).unwrap().position.y < 10.0);
        assert_eq!(e.frames(), 2);
    }

    #[test]
    fn measured_frame_starts_at_zero() {
        let mut e = engine();
        let mut renderer = DebugTextRenderer::new();
        let frame = e.advance_frame(&mut renderer, &view(), true);
        assert_eq!(frame.delta, 0.0);
        assert!(frame.output.contains("frame=1"));
    }

    #[test]
    fn deregister_is_symmetric() {
        let mut e = engine();
        let a = add_box(&mut e, 1.0, Vec3::ZERO);
        let b = add_box(&mut e, 1.0, Vec3::Y * 3.0);
        e.deregister(a).unwrap();
        assert_eq!(e.scene().object_count(), 1);
        assert_eq!(e.physics().body_count(), 1);
        assert_eq!(e.dynamic_bodies().len(), 1);
        assert_eq!(e.dynamic_bodies()[0].object, b);
        assert!(matches!(e.deregister(a), Err(EngineError::UnknownObject(_))));
    }

    #[test]
    fn velocity_through_back_reference() {
        let mut e = engine();
        let a = add_box(&mut e, 1.0, Vec3::ZERO);
        e.set_linear_velocity(a, Vec3::X * 5.0).unwrap();
        assert_eq!(e.linear_velocity(a), Some(Vec3::X * 5.0));
        assert!(e.set_linear_velocity(ObjectId(99), Vec3::X).is_err());
    }

    #[test]
    fn shadow_flags() {
        let mut e = engine();
        let a = add_box(&mut e, 0.0, Vec3::ZERO);
        e.set_shadow_flags(a, true, false).unwrap();
        let o = e.scene().object(a).unwrap();
        assert!(o.cast_shadow);
        assert!(!o.receive_shadow);
    }
}
