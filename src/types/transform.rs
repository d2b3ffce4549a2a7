//! World transforms and the host-to-DCM coordinate conversion policy.

use super::Axis;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space transform of a scene object.
///
/// Applied to local-space vertex data in the order scale, rotate, translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    /// Per-axis world scale.
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// World rotation as a unit quaternion (x, y, z, w).
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 4],
    /// World position.
    #[serde(default)]
    pub translation: [f32; 3],
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl WorldTransform {
    pub const IDENTITY: Self = Self {
        scale: [1.0, 1.0, 1.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        translation: [0.0, 0.0, 0.0],
    };

    pub fn new(scale: [f32; 3], rotation: [f32; 4], translation: [f32; 3]) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn scale_vec(&self) -> Vec3 {
        Vec3::from_array(self.scale)
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_array(self.rotation)
    }

    pub fn translation_vec(&self) -> Vec3 {
        Vec3::from_array(self.translation)
    }
}

/// Axis reorder and sign flips applied after the world transform.
///
/// Output component `i` is input component `axes[i]`, negated when `flip[i]` is set.
/// The default keeps the axis order and mirrors X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateConversion {
    pub axes: [Axis; 3],
    pub flip: [bool; 3],
}

impl Default for CoordinateConversion {
    fn default() -> Self {
        Self::MIRROR_X
    }
}

impl CoordinateConversion {
    /// Keep axis order, negate X.
    pub const MIRROR_X: Self = Self {
        axes: [Axis::X, Axis::Y, Axis::Z],
        flip: [true, false, false],
    };

    /// No reorder, no flips.
    pub const IDENTITY: Self = Self {
        axes: [Axis::X, Axis::Y, Axis::Z],
        flip: [false, false, false],
    };

    pub fn new(axes: [Axis; 3], flip: [bool; 3]) -> Self {
        Self { axes, flip }
    }

    /// True when `axes` names each axis exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 3];
        for axis in self.axes {
            seen[axis.index()] = true;
        }
        seen.iter().all(|&s| s)
    }

    /// True when the conversion changes handedness.
    pub fn is_mirroring(&self) -> bool {
        let flips = self.flip.iter().filter(|&&f| f).count();
        // An odd permutation mirrors too.
        let [a, b, c] = self.axes.map(|a| a.index());
        let odd_permutation = !matches!((a, b, c), (0, 1, 2) | (1, 2, 0) | (2, 0, 1));
        (flips % 2 == 1) != odd_permutation
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let src = v.to_array();
        let mut out = [0.0f32; 3];
        for i in 0..3 {
            let value = src[self.axes[i].index()];
            out[i] = if self.flip[i] { -value } else { value };
        }
        Vec3::from_array(out)
    }
}
