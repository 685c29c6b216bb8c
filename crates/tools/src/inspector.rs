use brickyard_common::ObjectId;
use brickyard_kernel::SimulationEngine;
use brickyard_render::Mesh;

/// Simulation inspector for developer tooling.
///
/// Provides read-only queries against the engine for debugging and
/// development UI.
pub struct EngineInspector;

impl EngineInspector {
    /// Produce a summary of the engine state.
    pub fn summary(engine: &SimulationEngine) -> EngineSummary {
        let physics = engine.physics();
        EngineSummary {
            frames: engine.frames(),
            objects: engine.scene().object_count(),
            dynamic_bodies: engine.dynamic_bodies().len(),
            physics_bodies: physics.body_count(),
            substeps: physics.substeps_run(),
            escaped: physics.escaped_bodies(),
        }
    }

    /// Pose, shape and velocity of one object.
    pub fn inspect_object(engine: &SimulationEngine, id: ObjectId) -> Option<ObjectInfo> {
        let object = engine.scene().object(id)?;
        let p = object.transform.position;
        let r = object.transform.rotation;
        Some(ObjectInfo {
            id,
            shape: match object.mesh {
                Mesh::Box { .. } => "box",
                Mesh::Sphere { .. } => "sphere",
            },
            position: [p.x, p.y, p.z],
            rotation: [r.x, r.y, r.z, r.w],
            speed: engine.linear_velocity(id).map(|v| v.length()),
        })
    }

    /// Objects whose poses are driven by physics, in registration order.
    pub fn list_dynamic(engine: &SimulationEngine) -> Vec<ObjectId> {
        engine.dynamic_bodies().iter().map(|d| d.object).collect()
    }
}

/// Summary of engine state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSummary {
    pub frames: u64,
    pub objects: usize,
    pub dynamic_bodies: usize,
    pub physics_bodies: usize,
    pub substeps: u64,
    /// Bodies outside the broadphase volume.
    pub escaped: usize,
}

impl std::fmt::Display for EngineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Engine: frames={} objects={} dynamic={} bodies={} substeps={} escaped={}",
            self.frames,
            self.objects,
            self.dynamic_bodies,
            self.physics_bodies,
            self.substeps,
            self.escaped
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub shape: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    /// `None` for objects without a physics body.
    pub speed: Option<f32>,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Object [{}] {} pos=({:.2}, {:.2}, {:.2})",
            self.id, self.shape, self.position[0], self.position[1], self.position[2],
        )?;
        if let Some(speed) = self.speed {
            write!(f, " speed={speed:.2}")?;
        }
        Ok(())
    }
}
