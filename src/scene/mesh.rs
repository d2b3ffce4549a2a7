//! Indexed triangle mesh data handed over by the host scene.

use crate::error::{DcmError, Result};
use crate::types::Color;
use serde::{Deserialize, Serialize};

/// A contiguous range of triangle corners belonging to one submesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmeshRange {
    /// First triangle corner (index into `MeshData::triangles`).
    pub start: u32,
    /// Number of triangle corners.
    pub count: u32,
}

impl SubmeshRange {
    pub fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    /// One past the last corner, or `None` if that does not fit in a u32.
    pub fn end(&self) -> Option<u32> {
        self.start.checked_add(self.count)
    }
}

/// An indexed triangle mesh in object-local space.
///
/// Attribute arrays are keyed by the values in `triangles`. `normals` may be
/// shorter than `positions` (or empty); `uvs` and `colors` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Triangle corner indices, three per triangle.
    pub triangles: Vec<u32>,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub uvs: Option<Vec<[f32; 2]>>,
    #[serde(default)]
    pub colors: Option<Vec<Color>>,
    /// Number of submeshes the host declares for this mesh.
    #[serde(default = "default_submesh_count")]
    pub submesh_count: u32,
    /// Corner ranges per submesh. Only consulted when partitioning submeshes.
    #[serde(default)]
    pub submeshes: Vec<SubmeshRange>,
}

fn default_submesh_count() -> u32 {
    1
}

impl MeshData {
    pub fn new(positions: Vec<[f32; 3]>, triangles: Vec<u32>) -> Self {
        Self {
            triangles,
            positions,
            normals: Vec::new(),
            uvs: None,
            colors: None,
            submesh_count: 1,
            submeshes: Vec::new(),
        }
    }

    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Declare submeshes by corner ranges. Also sets `submesh_count`.
    pub fn with_submeshes(mut self, submeshes: Vec<SubmeshRange>) -> Self {
        self.submesh_count = submeshes.len() as u32;
        self.submeshes = submeshes;
        self
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of vertices after de-indexing (one per triangle corner).
    pub fn expanded_vertex_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check that the triangle stream is whole triangles and every
    /// corner refers to an existing position.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.triangles.len() % 3 != 0 {
            return Err(DcmError::InvalidMesh(format!(
                "'{}' has {} triangle indices, not a multiple of 3",
                name,
                self.triangles.len()
            )));
        }
        if let Some(&bad) = self
            .triangles
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(DcmError::InvalidMesh(format!(
                "'{}' references vertex {} but has {} positions",
                name,
                bad,
                self.positions.len()
            )));
        }
        Ok(())
    }
}
