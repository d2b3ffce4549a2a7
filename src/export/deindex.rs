//! Indexed mesh to per-corner vertex stream.
//!
//! Every triangle corner becomes its own vertex; nothing is shared. Each
//! triangle `(i0, i1, i2)` is emitted as `(i0, i2, i1)` to flip the winding
//! for the target renderer's front-face convention.

use super::transform::ObjectTransformer;
use crate::scene::MeshData;
use crate::types::{Color, UP, WHITE};

/// A fully expanded vertex in DCM space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    /// Vertex color (RGBA, float).
    pub color: Color,
    pub normal: [f32; 3],
}

impl Default for ExpandedVertex {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            uv: [0.0, 0.0],
            color: WHITE,
            normal: UP,
        }
    }
}

/// Source index order of the emitted corners, with winding reversed.
pub fn rewound_corners(triangles: &[u32]) -> impl Iterator<Item = u32> + '_ {
    triangles
        .chunks_exact(3)
        .flat_map(|tri| [tri[0], tri[2], tri[1]])
}

/// Expand `mesh` into one vertex per triangle corner.
///
/// Missing attributes fall back per corner: uv `(0, 0)`, color opaque white,
/// normal up (still transformed).
pub fn deindex(mesh: &MeshData, transformer: &ObjectTransformer) -> Vec<ExpandedVertex> {
    let uvs = mesh.uvs.as_deref();
    let colors = mesh.colors.as_deref();

    let mut vertices = Vec::with_capacity(mesh.expanded_vertex_count());
    for index in rewound_corners(&mesh.triangles) {
        let i = index as usize;
        let position = mesh.positions.get(i).copied().unwrap_or_default();
        let normal = mesh.normals.get(i).copied().unwrap_or(UP);
        let uv = uvs.and_then(|u| u.get(i)).copied().unwrap_or_default();
        let color = colors.and_then(|c| c.get(i)).copied().unwrap_or(WHITE);

        vertices.push(ExpandedVertex {
            position: transformer.point(position),
            uv,
            color,
            normal: transformer.vector(normal),
        });
    }
    vertices
}
