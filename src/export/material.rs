//! Material record encoding.

use super::config::{ExportConfig, TextureExtension};
use crate::format::{ByteWriter, DataHeader, MaterialRecord, TextureMaps};
use crate::scene::{ColorChannel, Material};

/// Local id written in every material's DataHeader.
pub const MATERIAL_LOCAL_ID: u8 = 1;

/// Texture reference for a material: base name plus the configured
/// extension, or empty when the material has no texture.
pub fn texture_path(material: &Material, extension: TextureExtension) -> String {
    match &material.texture {
        Some(texture) if !texture.base_name.is_empty() => {
            format!("{}{}", texture.base_name, extension.suffix())
        }
        _ => String::new(),
    }
}

/// Build the record for a material, applying channel defaults.
/// The header carries the material name; the texture reference goes in the
/// record's name field and the diffuse map.
pub fn material_record(material: &Material, extension: TextureExtension) -> MaterialRecord {
    let path = texture_path(material, extension);
    MaterialRecord {
        header: DataHeader::external(MATERIAL_LOCAL_ID, material.name.clone()),
        name: path.clone(),
        ambient: material.color_or_default(ColorChannel::Ambient),
        diffuse: material.color_or_default(ColorChannel::Diffuse),
        specular: material.color_or_default(ColorChannel::Specular),
        emission: material.color_or_default(ColorChannel::Emission),
        shininess: material.shininess(),
        maps: TextureMaps {
            diffuse: path,
            ..TextureMaps::default()
        },
    }
}

/// Write one material. An absent material writes nothing and logs a warning.
/// Returns whether a record was written.
pub fn write_material(w: &mut ByteWriter, material: Option<&Material>, config: &ExportConfig) -> bool {
    let Some(material) = material else {
        tracing::warn!("Skipping null material");
        return false;
    };
    material_record(material, config.texture_extension).write_to(w, &config.field_widths);
    true
}
