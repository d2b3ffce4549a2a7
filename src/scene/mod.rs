//! Host scene model consumed by the exporter.
//!
//! The exporter only needs a list of objects with world transforms and
//! mesh data, and a way to look materials up by identity. Hosts implement
//! [`SceneSource`] or build a [`Scene`] directly (it also loads from JSON).

mod material;
mod mesh;

pub use material::{ColorChannel, Material, MaterialId, TextureRef, SHININESS};
pub use mesh::{MeshData, SubmeshRange};

use crate::error::Result;
use crate::export::ExportScope;
use crate::types::WorldTransform;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An object in the host scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub transform: WorldTransform,
    /// Direct mesh reference.
    #[serde(default)]
    pub mesh: Option<MeshData>,
    /// Skin-deformed mesh, used when there is no direct mesh.
    #[serde(default)]
    pub skinned_mesh: Option<MeshData>,
    /// Material per submesh slot. `None` marks an empty slot.
    #[serde(default)]
    pub materials: Vec<Option<MaterialId>>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: WorldTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_skinned_mesh(mut self, mesh: MeshData) -> Self {
        self.skinned_mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.materials.push(material);
        self
    }

    /// The mesh to export: the direct mesh if present, else the skinned one.
    pub fn resolve_mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref().or(self.skinned_mesh.as_ref())
    }
}

/// Trait for host scene sources.
pub trait SceneSource {
    /// Iterate over every object in the scene.
    fn objects(&self) -> Box<dyn Iterator<Item = &SceneObject> + '_>;

    /// The currently selected object, if any.
    fn active_object(&self) -> Option<&SceneObject>;

    /// Look up a material by identity.
    fn material(&self, id: MaterialId) -> Option<&Material>;

    /// Whether the host is running live (e.g. play mode). Export is refused while live.
    fn is_live(&self) -> bool {
        false
    }

    /// Objects selected by an export scope, in scene order.
    fn objects_in_scope(&self, scope: ExportScope) -> Vec<&SceneObject> {
        match scope {
            ExportScope::ActiveObject => self.active_object().into_iter().collect(),
            ExportScope::AllObjects => self.objects().collect(),
        }
    }
}

/// A self-contained scene: a material arena plus objects referring into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Index of the active object in `objects`.
    #[serde(default)]
    pub active: Option<usize>,
    #[serde(default)]
    pub live: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material and return its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    /// Add an object and return its index.
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Add an object and make it the active one.
    pub fn add_active_object(&mut self, object: SceneObject) -> usize {
        let index = self.add_object(object);
        self.active = Some(index);
        index
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl SceneSource for Scene {
    fn objects(&self) -> Box<dyn Iterator<Item = &SceneObject> + '_> {
        Box::new(self.objects.iter())
    }

    fn active_object(&self) -> Option<&SceneObject> {
        self.active.and_then(|i| self.objects.get(i))
    }

    fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
