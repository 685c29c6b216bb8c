use brickyard_common::{ObjectId, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Convert a `0xRRGGBB` colour into normalized RGB.
pub fn color_from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Index into the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Surface description: a base colour plus an optional texture name.
///
/// Textures are resolved by the asset collaborator; until one arrives the
/// material renders with its base colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Vec3,
    pub texture: Option<String>,
}

impl Material {
    pub fn from_hex(hex: u32) -> Self {
        Self {
            color: color_from_hex(hex),
            texture: None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_hex(0xffffff)
    }
}

/// Visual geometry of a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mesh {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Mesh {
    /// Scale applied to the unit mesh (unit cube or unit-radius sphere).
    pub fn scale(&self) -> Vec3 {
        match *self {
            Self::Box { half_extents } => half_extents * 2.0,
            Self::Sphere { radius } => Vec3::splat(radius),
        }
    }
}

/// A visual object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableObject {
    pub mesh: Mesh,
    pub material: MaterialId,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl RenderableObject {
    pub fn new(mesh: Mesh, material: MaterialId, transform: Transform) -> Self {
        Self {
            mesh,
            material,
            transform,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// Orthographic frustum used to render a directional light's shadow map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowCamera {
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    pub map_size: u32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            half_extent: 100.0,
            near: 2.0,
            far: 500.0,
            map_size: 4096,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    /// The light shines from `position` towards the origin.
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowCamera,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface towards the light.
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Directional(DirectionalLight),
    Ambient(AmbientLight),
}

/// The render graph: objects, materials, lights.
#[derive(Debug, Clone)]
pub struct RenderScene {
    objects: BTreeMap<ObjectId, RenderableObject>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    clear_color: Vec3,
    shadows_enabled: bool,
    next_id: u64,
}

impl Default for RenderScene {
    fn default() -> Self {
        Self::new(color_from_hex(0x000000))
    }
}

impl RenderScene {
    pub fn new(clear_color: Vec3) -> Self {
        Self {
            objects: BTreeMap::new(),
            materials: Vec::new(),
            lights: Vec::new(),
            clear_color,
            shadows_enabled: false,
            next_id: 0,
        }
    }

    pub fn clear_color(&self) -> Vec3 {
        self.clear_color
    }

    pub fn enable_shadows(&mut self) {
        self.shadows_enabled = true;
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    /// Add an object and return its id.
    pub fn add_object(&mut self, object: RenderableObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<RenderableObject> {
        self.objects.remove(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&RenderableObject> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut RenderableObject> {
        self.objects.get_mut(&id)
    }

    /// Objects in id (creation) order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &RenderableObject)> {
        self.objects.iter().map(|(id, o)| (*id, o))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Overwrite an object's pose. Returns false for unknown ids.
    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// The first directional light, which is the one that casts shadows.
    pub fn directional_light(&self) -> Option<&DirectionalLight> {
        self.lights.iter().find_map(|l| match l {
            Light::Directional(d) => Some(d),
            Light::Ambient(_) => None,
        })
    }

    /// Sum of all ambient light colours.
    pub fn ambient(&self) -> Vec3 {
        self.lights
            .iter()
            .filter_map(|l| match l {
                Light::Ambient(a) => Some(a.color),
                Light::Directional(_) => None,
            })
            .sum()
    }
}
