//! DCM binary format: record layouts and the byte writer they serialize into.

pub mod records;
pub mod writer;

pub use records::{
    Arrangement, BoneWeightFormat, ColorFormat, DataHeader, FileHeader, MaterialRecord,
    MeshRecord, NormalFormat, PositionFormat, SubMeshRecord, SubMeshType, SubMeshVertexRange,
    TexCoordFormat, TextureMaps, DATA_FLAG_EXTERNAL_LINK, MAGIC, VERSION,
};
pub use writer::ByteWriter;

use serde::{Deserialize, Serialize};

/// Widths of the fixed-length string fields, per record kind.
///
/// Consumers disagree on the mesh name width: the record declares 32 bytes
/// but existing files carry 128, which is the default here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWidths {
    /// DataHeader path field.
    pub data_path: usize,
    /// MeshRecord name field.
    pub mesh_name: usize,
    /// MaterialRecord texture name/path field.
    pub material_name: usize,
    /// Each of the four MaterialRecord texture map names.
    pub map_name: usize,
}

impl Default for FieldWidths {
    fn default() -> Self {
        Self {
            data_path: 128,
            mesh_name: 128,
            material_name: 128,
            map_name: 32,
        }
    }
}

impl FieldWidths {
    /// Widths as declared by the record definitions (32-byte mesh name).
    pub fn declared() -> Self {
        Self {
            mesh_name: 32,
            ..Self::default()
        }
    }
}
