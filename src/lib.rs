//! # DCM Export
//!
//! A Rust library for writing 3D meshes and materials as DCM (Dreamcast Mesh)
//! files.
//!
//! ## Overview
//!
//! DCM is a fixed-layout, little-endian binary format: a file header, a
//! material table, then each mesh followed by its vertices and submeshes.
//! This library takes mesh and material data extracted from a host scene,
//! converts it to DCM space, de-indexes it into one vertex per triangle
//! corner, and produces the file bytes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dcm_export::{export_dcm, ExportConfig, Material, MeshData, Scene, SceneObject};
//!
//! let mut scene = Scene::new();
//! let material = scene.add_material(Material::new("stone").with_texture("stone"));
//! scene.add_active_object(
//!     SceneObject::new("rock")
//!         .with_mesh(MeshData::new(positions, triangles))
//!         .with_material(Some(material)),
//! );
//!
//! let export = export_dcm(&scene, &ExportConfig::default())?;
//! std::fs::write("rock.dcm", &export.bytes)?;
//! ```
//!
//! ## Host Integration
//!
//! Hosts with their own scene graph implement the [`SceneSource`] trait
//! instead of building a [`Scene`].

pub mod error;
pub mod types;
pub mod scene;
pub mod format;
pub mod export;

// Re-export main types for convenience
pub use error::{DcmError, Result};
pub use types::{Axis, Color, CoordinateConversion, WorldTransform};
pub use scene::{
    ColorChannel, Material, MaterialId, MeshData, Scene, SceneObject, SceneSource, SubmeshRange,
    TextureRef,
};
pub use format::{FieldWidths, FileHeader};
pub use export::{
    export_dcm, export_dcm_to_path, DcmExport, ExportConfig, ExportScope, ExportSummary,
    SubmeshPartitioning, TextureExtension,
};

/// Load a scene description from a JSON file.
pub fn load_scene<P: AsRef<std::path::Path>>(path: P) -> Result<Scene> {
    Scene::load(path)
}

#[cfg(feature = "wasm")]
pub mod wasm;
