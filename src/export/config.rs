//! Export configuration.

use crate::error::{DcmError, Result};
use crate::format::FieldWidths;
use crate::types::CoordinateConversion;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extension appended to texture base names in material records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureExtension {
    /// Dreamcast-native texture (".dtex").
    #[default]
    Dtex,
    /// PNG image (".png").
    Png,
}

impl TextureExtension {
    pub fn suffix(&self) -> &'static str {
        match self {
            TextureExtension::Dtex => ".dtex",
            TextureExtension::Png => ".png",
        }
    }
}

/// Which scene objects are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    /// Only the host's active object.
    #[default]
    ActiveObject,
    /// Every object in the scene, in scene order.
    AllObjects,
}

/// How a mesh's de-indexed vertex stream is split between its submeshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmeshPartitioning {
    /// Every submesh indexes the whole vertex stream. Matches files
    /// produced by existing exporters.
    #[default]
    RepeatFullStream,
    /// Each submesh indexes only the corners in its declared range.
    PerSubmesh,
}

/// Exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub texture_extension: TextureExtension,
    pub export_scope: ExportScope,
    /// Host-to-DCM axis conversion applied after the world transform.
    pub conversion: CoordinateConversion,
    pub field_widths: FieldWidths,
    pub partitioning: SubmeshPartitioning,
}

impl ExportConfig {
    pub fn with_texture_extension(mut self, extension: TextureExtension) -> Self {
        self.texture_extension = extension;
        self
    }

    pub fn with_scope(mut self, scope: ExportScope) -> Self {
        self.export_scope = scope;
        self
    }

    pub fn with_conversion(mut self, conversion: CoordinateConversion) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn with_field_widths(mut self, widths: FieldWidths) -> Self {
        self.field_widths = widths;
        self
    }

    pub fn with_partitioning(mut self, partitioning: SubmeshPartitioning) -> Self {
        self.partitioning = partitioning;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Reject configurations that cannot produce a valid file.
    pub fn validate(&self) -> Result<()> {
        if !self.conversion.is_permutation() {
            return Err(DcmError::Configuration(format!(
                "coordinate conversion axes {:?} are not a permutation",
                self.conversion.axes
            )));
        }
        let widths = &self.field_widths;
        if widths.data_path == 0
            || widths.mesh_name == 0
            || widths.material_name == 0
            || widths.map_name == 0
        {
            return Err(DcmError::Configuration(
                "string field widths must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Axis;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.texture_extension.suffix(), ".dtex");
        assert_eq!(config.export_scope, ExportScope::ActiveObject);
        assert_eq!(config.partitioning, SubmeshPartitioning::RepeatFullStream);
        assert_eq!(config.field_widths.mesh_name, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let config = ExportConfig::from_json_str(
            r#"{"texture_extension": "png", "partitioning": "per_submesh", "field_widths": {"mesh_name": 32}}"#,
        )
        .unwrap();
        assert_eq!(config.texture_extension, TextureExtension::Png);
        assert_eq!(config.partitioning, SubmeshPartitioning::PerSubmesh);
        assert_eq!(config.field_widths, FieldWidths::declared());
        assert_eq!(config.conversion, CoordinateConversion::MIRROR_X);
    }

    #[test]
    fn test_validate_rejects_bad_conversion() {
        let config = ExportConfig::default()
            .with_conversion(CoordinateConversion::new([Axis::Y, Axis::Y, Axis::Z], [false; 3]));
        assert!(matches!(config.validate(), Err(DcmError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let config = ExportConfig::default().with_field_widths(FieldWidths {
            map_name: 0,
            ..FieldWidths::default()
        });
        assert!(matches!(config.validate(), Err(DcmError::Configuration(_))));
    }
}
