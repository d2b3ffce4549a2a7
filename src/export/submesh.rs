//! Submesh record encoding.
//!
//! The vertex stream is already de-indexed, so submesh indices are plain
//! sequential runs into it. Which run each submesh gets is decided by
//! [`SubmeshPartitioning`].

use super::config::SubmeshPartitioning;
use crate::error::{DcmError, Result};
use crate::format::{DataHeader, SubMeshRecord};
use crate::scene::{MeshData, SubmeshRange};

/// Vertex ranges for each declared submesh of `mesh`.
pub fn partition(
    name: &str,
    mesh: &MeshData,
    policy: SubmeshPartitioning,
) -> Result<Vec<SubmeshRange>> {
    let vertex_count = mesh.expanded_vertex_count() as u32;
    let submesh_count = mesh.submesh_count as usize;
    if submesh_count > u8::MAX as usize {
        return Err(DcmError::CountOverflow {
            what: "submeshes",
            count: submesh_count,
        });
    }

    match policy {
        SubmeshPartitioning::RepeatFullStream => {
            Ok(vec![SubmeshRange::new(0, vertex_count); submesh_count])
        }
        SubmeshPartitioning::PerSubmesh => {
            if mesh.submeshes.len() != submesh_count {
                return Err(DcmError::InvalidMesh(format!(
                    "'{}' declares {} submeshes but has {} submesh ranges",
                    name,
                    submesh_count,
                    mesh.submeshes.len()
                )));
            }
            for range in &mesh.submeshes {
                // Rewinding stays inside a triangle, so whole-triangle
                // ranges map onto the same vertex range.
                let in_bounds = range.end().is_some_and(|end| end <= vertex_count);
                if range.start % 3 != 0 || range.count % 3 != 0 || !in_bounds {
                    return Err(DcmError::InvalidMesh(format!(
                        "'{}' has submesh range of {} corners at {} not aligned to triangles within {} corners",
                        name, range.count, range.start, vertex_count
                    )));
                }
            }
            Ok(mesh.submeshes.clone())
        }
    }
}

/// Build an indexed submesh covering `range` of the vertex stream.
pub fn submesh_record(
    name: &str,
    local_id: u8,
    material_id: u8,
    range: SubmeshRange,
) -> Result<SubMeshRecord> {
    let end = range.end().ok_or_else(|| {
        DcmError::InvalidMesh(format!(
            "'{}' has submesh range past the end of the index space",
            name
        ))
    })?;
    let indices: Vec<u32> = (range.start..end).collect();
    let count = indices.len();
    SubMeshRecord::indexed(DataHeader::internal(local_id, ""), material_id, indices).ok_or_else(
        || DcmError::IndexOverflow {
            mesh: name.to_string(),
            count,
        },
    )
}
