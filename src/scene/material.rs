//! Material descriptions as named optional properties.

use crate::types::{Color, BLACK, WHITE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a material within a scene.
///
/// Two materials with equal properties but different ids are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub usize);

/// Well-known color channels of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Ambient,
    Diffuse,
    Specular,
    Emission,
}

impl ColorChannel {
    /// Channels in the order they are written to a material record.
    pub const ALL: [ColorChannel; 4] = [
        ColorChannel::Ambient,
        ColorChannel::Diffuse,
        ColorChannel::Specular,
        ColorChannel::Emission,
    ];

    /// Property name used to look this channel up on a material.
    pub fn property_name(&self) -> &'static str {
        match self {
            ColorChannel::Ambient => "ambient",
            ColorChannel::Diffuse => "diffuse",
            ColorChannel::Specular => "specular",
            ColorChannel::Emission => "emission",
        }
    }

    /// Value written when the material lacks this channel.
    pub fn default_color(&self) -> Color {
        match self {
            ColorChannel::Ambient | ColorChannel::Diffuse => WHITE,
            ColorChannel::Specular | ColorChannel::Emission => BLACK,
        }
    }
}

/// Property name of the specular exponent.
pub const SHININESS: &str = "shininess";

/// Reference to a material's primary texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    /// Texture name without directory or extension, e.g. "brick_wall".
    pub base_name: String,
}

/// A material as exposed by the host's material system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub name: String,
    /// Named RGBA properties ("ambient", "diffuse", ...).
    #[serde(default)]
    pub colors: BTreeMap<String, Color>,
    /// Named scalar properties ("shininess", ...).
    #[serde(default)]
    pub floats: BTreeMap<String, f32>,
    #[serde(default)]
    pub texture: Option<TextureRef>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, channel: ColorChannel, color: Color) -> Self {
        self.colors.insert(channel.property_name().to_string(), color);
        self
    }

    pub fn with_float(mut self, name: impl Into<String>, value: f32) -> Self {
        self.floats.insert(name.into(), value);
        self
    }

    pub fn with_texture(mut self, base_name: impl Into<String>) -> Self {
        self.texture = Some(TextureRef {
            base_name: base_name.into(),
        });
        self
    }

    /// Look up a named color property.
    pub fn property_color(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// Look up a well-known color channel.
    pub fn color(&self, channel: ColorChannel) -> Option<Color> {
        self.property_color(channel.property_name())
    }

    /// Look up a named scalar property.
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    /// Color for a channel, falling back to the channel default.
    pub fn color_or_default(&self, channel: ColorChannel) -> Color {
        self.color(channel).unwrap_or_else(|| channel.default_color())
    }

    pub fn shininess(&self) -> f32 {
        self.float(SHININESS).unwrap_or(0.0)
    }
}
