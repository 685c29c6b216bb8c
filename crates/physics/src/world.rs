use crate::body::{CollisionShape, RigidBodyDesc};
use brickyard_common::Transform;
use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Physics world parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Half extent of the cubic broadphase volume centred on the origin.
    pub world_half_extent: f32,
    /// Duration of one internal integration substep, in seconds.
    pub fixed_timestep: f32,
    /// Upper bound on substeps per `step` call. Time beyond it is dropped.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            world_half_extent: 1000.0,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
        }
    }
}

/// Axis-aligned volume the broadphase covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBounds {
    pub fn cube(half_extent: f32) -> Self {
        Self {
            min: Vec3::splat(-half_extent),
            max: Vec3::splat(half_extent),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Opaque handle to a body living in a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Rigid-body simulation: collision pipeline, broadphase, solver and gravity.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bounds: WorldBounds,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Real time accumulated but not yet covered by a substep.
    local_time: f32,
    substeps_run: u64,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: config.fixed_timestep,
            ..IntegrationParameters::default()
        };
        tracing::info!(
            gravity = ?config.gravity,
            half_extent = config.world_half_extent,
            "physics world created"
        );
        Self {
            config,
            bounds: WorldBounds::cube(config.world_half_extent),
            gravity: vector![config.gravity.x, config.gravity.y, config.gravity.z],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            local_time: 0.0,
            substeps_run: 0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Number of bodies in the world, fixed and dynamic.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Total substeps integrated since creation.
    pub fn substeps_run(&self) -> u64 {
        self.substeps_run
    }

    /// Insert a body and its collider.
    pub fn add_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle {
        let builder = if desc.is_dynamic() {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .position(to_isometry(&desc.transform))
            .can_sleep(desc.can_sleep)
            .build();
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(build_collider(desc), handle, &mut self.bodies);
        BodyHandle(handle)
    }

    /// Remove a body and its collider. Returns false if it was already gone.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Advance the simulation by `dt` seconds of real time.
    ///
    /// Time is consumed in fixed substeps; at most `max_substeps` run per call
    /// and any remaining whole substeps are discarded. Returns the number of
    /// substeps integrated. Negative or non-finite `dt` is ignored.
    pub fn step(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt < 0.0 {
            tracing::debug!(dt, "ignoring invalid frame time");
            return 0;
        }
        let fixed = self.config.fixed_timestep;
        self.local_time += dt;
        let mut wanted = 0u32;
        if self.local_time >= fixed {
            wanted = (self.local_time / fixed) as u32;
            self.local_time -= wanted as f32 * fixed;
        }
        let substeps = wanted.min(self.config.max_substeps);
        if substeps < wanted {
            tracing::debug!(wanted, substeps, "physics substeps clamped");
        }

        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        }
        self.substeps_run += u64::from(substeps);
        substeps
    }

    /// Current world pose of a body, or `None` if the body is not in the world.
    pub fn world_transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.bodies
            .get(handle.0)
            .map(|body| from_isometry(body.position()))
    }

    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    /// Set a body's linear velocity and wake it. Returns false for unknown handles.
    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) -> bool {
        match self.bodies.get_mut(handle.0) {
            Some(body) => {
                body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
                true
            }
            None => false,
        }
    }

    pub fn mass(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(handle.0).map(|body| body.mass())
    }

    pub fn is_dynamic(&self, handle: BodyHandle) -> Option<bool> {
        self.bodies.get(handle.0).map(|body| body.is_dynamic())
    }

    pub fn is_sleeping(&self, handle: BodyHandle) -> Option<bool> {
        self.bodies.get(handle.0).map(|body| body.is_sleeping())
    }

    /// Dynamic bodies whose origin has left the broadphase volume.
    pub fn escaped_bodies(&self) -> usize {
        self.bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .filter(|(_, body)| {
                let t = body.translation();
                !self.bounds.contains(Vec3::new(t.x, t.y, t.z))
            })
            .count()
    }
}

fn build_collider(desc: &RigidBodyDesc) -> Collider {
    let builder = match desc.shape {
        // The margin is carried inside the box: the core shrinks by the
        // margin and a rounded border of the same width restores the extents.
        CollisionShape::Box { half_extents } => {
            let m = desc.margin;
            ColliderBuilder::round_cuboid(
                (half_extents.x - m).max(0.0),
                (half_extents.y - m).max(0.0),
                (half_extents.z - m).max(0.0),
                m,
            )
        }
        CollisionShape::Sphere { radius } => ColliderBuilder::ball(radius),
    };
    let i = desc.local_inertia;
    builder
        .mass_properties(MassProperties::new(
            point![0.0, 0.0, 0.0],
            desc.mass,
            vector![i.x, i.y, i.z],
        ))
        .build()
}

fn to_isometry(t: &Transform) -> Isometry<Real> {
    let r = t.rotation;
    Isometry::from_parts(
        Translation3::new(t.position.x, t.position.y, t.position.z),
        UnitQuaternion::new_normalize(Quaternion::new(r.w, r.x, r.y, r.z)),
    )
}

fn from_isometry(iso: &Isometry<Real>) -> Transform {
    let p = iso.translation.vector;
    let q = iso.rotation.coords;
    Transform {
        position: Vec3::new(p.x, p.y, p.z),
        rotation: Quat::from_xyzw(q.x, q.y, q.z, q.w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ground(world: &mut PhysicsWorld) -> BodyHandle {
        let desc = RigidBodyDesc::new(
            CollisionShape::Box {
                half_extents: Vec3::new(50.0, 0.5, 50.0),
            },
            0.0,
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
        );
        world.add_body(&desc)
    }

    fn ball(world: &mut PhysicsWorld, at: Vec3, can_sleep: bool) -> BodyHandle {
        let mut desc = RigidBodyDesc::new(
            CollisionShape::Sphere { radius: 0.5 },
            1.0,
            Transform::from_position(at),
        );
        desc.can_sleep = can_sleep;
        world.add_body(&desc)
    }

    #[test]
    fn default_config_values() {
        let c = PhysicsConfig::default();
        assert_eq!(c.gravity, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(c.world_half_extent, 1000.0);
        assert_eq!(c.max_substeps, 10);
    }

    #[test]
    fn add_and_remove_body() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let h = ball(&mut world, Vec3::Y, true);
        assert_eq!(world.body_count(), 1);
        assert!(world.world_transform(h).is_some());
        assert!(world.remove_body(h));
        assert!(world.world_transform(h).is_none());
        assert!(!world.remove_body(h));
    }

    #[test]
    fn initial_pose_round_trips() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let desc = RigidBodyDesc::new(
            CollisionShape::Box {
                half_extents: Vec3::new(1.5, 0.75, 0.75),
            },
            20.0,
            Transform::new(Vec3::new(3.0, 0.75, -9.0), rotation),
        );
        let h = world.add_body(&desc);
        let t = world.world_transform(h).unwrap();
        assert_relative_eq!(t.position.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(t.position.z, -9.0, epsilon = 1e-6);
        assert!(t.rotation.dot(rotation).abs() > 0.99999);
        assert_relative_eq!(world.mass(h).unwrap(), 20.0, epsilon = 1e-4);
    }

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let h = ball(&mut world, Vec3::new(0.0, 10.0, 0.0), true);
        world.step(0.5);
        assert!(world.world_transform(h).unwrap().position.y < 10.0);
    }

    #[test]
    fn fixed_body_never_moves() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let g = ground(&mut world);
        let before = world.world_transform(g).unwrap();
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.world_transform(g).unwrap(), before);
        assert_eq!(world.is_dynamic(g), Some(false));
    }

    #[test]
    fn substeps_are_capped() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        // one second of frame time would need 60 substeps
        assert_eq!(world.step(1.0), 10);
        assert_eq!(world.substeps_run(), 10);
    }

    #[test]
    fn invalid_frame_time_does_not_stall_the_world() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        assert_eq!(world.step(-1.0), 0);
        assert_eq!(world.step(f32::NAN), 0);
        assert_eq!(world.step(f32::INFINITY), 0);
        let mut total = 0;
        for _ in 0..30 {
            total += world.step(1.0 / 60.0);
        }
        assert!(total >= 29);
    }

    #[test]
    fn sub_frame_time_accumulates() {
        let config = PhysicsConfig {
            fixed_timestep: 0.25,
            ..PhysicsConfig::default()
        };
        let mut world = PhysicsWorld::new(config);
        let mut total = 0;
        for _ in 0..8 {
            total += world.step(0.125);
        }
        assert_eq!(total, 4);
    }

    #[test]
    fn set_linear_velocity_is_visible() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let h = ball(&mut world, Vec3::ZERO, true);
        assert!(world.set_linear_velocity(h, Vec3::new(0.0, 0.0, -80.0)));
        assert_eq!(world.linear_velocity(h), Some(Vec3::new(0.0, 0.0, -80.0)));
    }

    #[test]
    fn resting_body_without_sleep_stays_awake() {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        ground(&mut world);
        let h = ball(&mut world, Vec3::new(0.0, 0.5, 0.0), false);
        for _ in 0..300 {
            world.step(1.0 / 60.0);
        }
        assert_eq!(world.is_sleeping(h), Some(false));
    }

    #[test]
    fn escaped_bodies_are_counted() {
        let config = PhysicsConfig {
            world_half_extent: 5.0,
            ..PhysicsConfig::default()
        };
        let mut world = PhysicsWorld::new(config);
        ball(&mut world, Vec3::new(0.0, 1.0, 0.0), true);
        ball(&mut world, Vec3::new(0.0, 1.0, 50.0), true);
        assert_eq!(world.escaped_bodies(), 1);
        assert!(world.bounds().contains(Vec3::new(0.0, 5.0, 0.0)));
    }
}
