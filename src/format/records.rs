//! DCM record layouts.
//!
//! # File layout
//! ```text
//! FileHeader
//! MaterialRecord * material_count (DataHeader + name + colors + shininess + maps)
//! for each mesh:
//!     MeshRecord (DataHeader + name + submesh_count + vertex_count)
//!     Vertex * vertex_count
//!     for each submesh:
//!         SubMeshRecord (DataHeader + material_id + arrangement + type + index_count)
//!         u32 index * index_count
//! ```
//!
//! All scalars are little-endian. Strings are fixed-width, NUL-padded ASCII.

use super::writer::ByteWriter;
use super::FieldWidths;
use crate::types::Color;

/// File magic.
pub const MAGIC: [u8; 3] = *b"DCM";

/// Format version written by this encoder.
pub const VERSION: u8 = 1;

/// DataHeader flag bit: the record is addressed by an external path.
pub const DATA_FLAG_EXTERNAL_LINK: u8 = 0x01;

macro_rules! format_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

format_enum!(
    /// Vertex position encoding.
    PositionFormat { None = 0, Xyz = 1 }
);

format_enum!(
    /// Texture coordinate encoding.
    TexCoordFormat { None = 0, Uv = 1 }
);

format_enum!(
    /// Vertex color encoding.
    ColorFormat { None = 0, Rgba8888 = 1 }
);

format_enum!(
    /// Vertex normal encoding.
    NormalFormat { None = 0, Xyz = 1 }
);

format_enum!(
    /// Bone weight encoding. Skinning is never exported.
    BoneWeightFormat { None = 0 }
);

format_enum!(
    /// Primitive arrangement of a submesh.
    Arrangement { Strip = 0, Triangles = 1 }
);

format_enum!(
    /// How a submesh addresses its vertices.
    SubMeshType { Ranged = 0, Indexed = 1 }
);

/// File header (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u8,
    pub material_count: u8,
    pub mesh_count: u8,
    pub armature_count: u8,
    pub animation_count: u8,
    pub position_format: PositionFormat,
    pub tex0_format: TexCoordFormat,
    pub tex1_format: TexCoordFormat,
    pub color_format: ColorFormat,
    pub offset_colour_format: ColorFormat,
    pub normal_format: NormalFormat,
    pub bone_weight_format: BoneWeightFormat,
    /// Bytes per submesh index.
    pub index_size: u8,
}

impl FileHeader {
    pub const SIZE: usize = 16;

    /// Header for the vertex layout this encoder emits: float xyz position,
    /// one float uv layer, 8-bit RGBA color, float xyz normal, u32 indices,
    /// no skinning, armatures or animations.
    pub fn new(material_count: u8, mesh_count: u8) -> Self {
        Self {
            version: VERSION,
            material_count,
            mesh_count,
            armature_count: 0,
            animation_count: 0,
            position_format: PositionFormat::Xyz,
            tex0_format: TexCoordFormat::Uv,
            tex1_format: TexCoordFormat::None,
            color_format: ColorFormat::Rgba8888,
            offset_colour_format: ColorFormat::None,
            normal_format: NormalFormat::Xyz,
            bone_weight_format: BoneWeightFormat::None,
            index_size: 4,
        }
    }

    pub fn write_to(&self, w: &mut ByteWriter) {
        w.write_bytes(&self.to_bytes());
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..3].copy_from_slice(&MAGIC);
        bytes[3] = self.version;
        bytes[4] = self.material_count;
        bytes[5] = self.mesh_count;
        bytes[6] = self.armature_count;
        bytes[7] = self.animation_count;
        bytes[8] = self.position_format.code();
        bytes[9] = self.tex0_format.code();
        bytes[10] = self.tex1_format.code();
        bytes[11] = self.color_format.code();
        bytes[12] = self.offset_colour_format.code();
        bytes[13] = self.normal_format.code();
        bytes[14] = self.bone_weight_format.code();
        bytes[15] = self.index_size;
        bytes
    }

    /// Read a header back, e.g. to inspect an exported file.
    /// Returns `None` on short input, bad magic or unknown format codes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..3] != MAGIC {
            return None;
        }
        Some(Self {
            version: bytes[3],
            material_count: bytes[4],
            mesh_count: bytes[5],
            armature_count: bytes[6],
            animation_count: bytes[7],
            position_format: PositionFormat::from_code(bytes[8])?,
            tex0_format: TexCoordFormat::from_code(bytes[9])?,
            tex1_format: TexCoordFormat::from_code(bytes[10])?,
            color_format: ColorFormat::from_code(bytes[11])?,
            offset_colour_format: ColorFormat::from_code(bytes[12])?,
            normal_format: NormalFormat::from_code(bytes[13])?,
            bone_weight_format: BoneWeightFormat::from_code(bytes[14])?,
            index_size: bytes[15],
        })
    }
}

/// Prefix of every material, mesh and submesh record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataHeader {
    pub flags: u8,
    pub local_id: u8,
    /// Opaque identifier, not a filesystem path.
    pub path: String,
}

impl DataHeader {
    pub fn internal(local_id: u8, path: impl Into<String>) -> Self {
        Self {
            flags: 0,
            local_id,
            path: path.into(),
        }
    }

    pub fn external(local_id: u8, path: impl Into<String>) -> Self {
        Self {
            flags: DATA_FLAG_EXTERNAL_LINK,
            local_id,
            path: path.into(),
        }
    }

    pub fn is_external(&self) -> bool {
        self.flags & DATA_FLAG_EXTERNAL_LINK != 0
    }

    pub fn size(widths: &FieldWidths) -> usize {
        2 + widths.data_path
    }

    pub fn write_to(&self, w: &mut ByteWriter, widths: &FieldWidths) {
        w.write_u8(self.flags);
        w.write_u8(self.local_id);
        w.write_fixed_str(&self.path, widths.data_path);
    }
}

/// Texture map names of a material. Empty means no map of that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureMaps {
    pub diffuse: String,
    pub light: String,
    pub normal: String,
    pub specular: String,
}

/// Material record.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub header: DataHeader,
    /// Texture name/path.
    pub name: String,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emission: Color,
    pub shininess: f32,
    pub maps: TextureMaps,
}

impl MaterialRecord {
    pub fn size(widths: &FieldWidths) -> usize {
        DataHeader::size(widths) + widths.material_name + 4 * 16 + 4 + 4 * widths.map_name
    }

    pub fn write_to(&self, w: &mut ByteWriter, widths: &FieldWidths) {
        self.header.write_to(w, widths);
        w.write_fixed_str(&self.name, widths.material_name);
        for color in [&self.ambient, &self.diffuse, &self.specular, &self.emission] {
            w.write_f32s(color);
        }
        w.write_f32(self.shininess);
        for map in [
            &self.maps.diffuse,
            &self.maps.light,
            &self.maps.normal,
            &self.maps.specular,
        ] {
            w.write_fixed_str(map, widths.map_name);
        }
    }
}

/// Mesh record, followed in the file by its vertices and submeshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshRecord {
    pub header: DataHeader,
    pub name: String,
    pub submesh_count: u8,
    pub vertex_count: u32,
}

impl MeshRecord {
    pub fn size(widths: &FieldWidths) -> usize {
        DataHeader::size(widths) + widths.mesh_name + 1 + 4
    }

    pub fn write_to(&self, w: &mut ByteWriter, widths: &FieldWidths) {
        self.header.write_to(w, widths);
        w.write_fixed_str(&self.name, widths.mesh_name);
        w.write_u8(self.submesh_count);
        w.write_u32(self.vertex_count);
    }
}

/// Submesh record with its trailing index list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMeshRecord {
    pub header: DataHeader,
    pub material_id: u8,
    pub arrangement: Arrangement,
    pub kind: SubMeshType,
    indices: Vec<u32>,
}

impl SubMeshRecord {
    /// Indexed triangle-list submesh. Returns `None` when the index count
    /// does not fit in the 16-bit count field.
    pub fn indexed(header: DataHeader, material_id: u8, indices: Vec<u32>) -> Option<Self> {
        if indices.len() > u16::MAX as usize {
            return None;
        }
        Some(Self {
            header,
            material_id,
            arrangement: Arrangement::Triangles,
            kind: SubMeshType::Indexed,
            indices,
        })
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u16 {
        // Bounded by the check in `indexed`.
        self.indices.len() as u16
    }

    pub fn size(&self, widths: &FieldWidths) -> usize {
        DataHeader::size(widths) + 3 + 2 + 4 * self.indices.len()
    }

    pub fn write_to(&self, w: &mut ByteWriter, widths: &FieldWidths) {
        self.header.write_to(w, widths);
        w.write_u8(self.material_id);
        w.write_u8(self.arrangement.code());
        w.write_u8(self.kind.code());
        w.write_u16(self.index_count());
        for &index in &self.indices {
            w.write_u32(index);
        }
    }
}

/// Vertex range used by ranged submeshes. Not produced by this encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMeshVertexRange {
    pub start: u32,
    pub count: u32,
}

impl SubMeshVertexRange {
    pub const SIZE: usize = 8;

    pub fn write_to(&self, w: &mut ByteWriter) {
        w.write_u32(self.start);
        w.write_u32(self.count);
    }
}
