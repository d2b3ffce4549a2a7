//! Host scene space to DCM space.
//!
//! Points go scale, rotate, translate, then the axis conversion.
//! Vectors skip the translation.

use crate::types::{CoordinateConversion, WorldTransform};
use glam::{Quat, Vec3};

/// Transform a position into DCM space.
pub fn transform_point(
    p: Vec3,
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
    conversion: &CoordinateConversion,
) -> Vec3 {
    conversion.apply(rotation * (p * scale) + translation)
}

/// Transform a direction (normal) into DCM space. Not renormalized.
pub fn transform_vector(
    v: Vec3,
    scale: Vec3,
    rotation: Quat,
    conversion: &CoordinateConversion,
) -> Vec3 {
    conversion.apply(rotation * (v * scale))
}

/// Per-object transform state, so callers can work with plain arrays.
#[derive(Debug, Clone, Copy)]
pub struct ObjectTransformer {
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
    conversion: CoordinateConversion,
}

impl ObjectTransformer {
    pub fn new(transform: &WorldTransform, conversion: CoordinateConversion) -> Self {
        Self {
            scale: transform.scale_vec(),
            rotation: transform.rotation_quat(),
            translation: transform.translation_vec(),
            conversion,
        }
    }

    pub fn point(&self, p: [f32; 3]) -> [f32; 3] {
        transform_point(
            Vec3::from_array(p),
            self.scale,
            self.rotation,
            self.translation,
            &self.conversion,
        )
        .to_array()
    }

    pub fn vector(&self, v: [f32; 3]) -> [f32; 3] {
        transform_vector(Vec3::from_array(v), self.scale, self.rotation, &self.conversion)
            .to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_translate_then_mirror() {
        let t = ObjectTransformer::new(
            &WorldTransform::from_translation([2.0, 0.0, 0.0]),
            CoordinateConversion::default(),
        );
        assert!(approx(t.point([1.0, 0.0, 0.0]), [-3.0, 0.0, 0.0]));
    }

    #[test]
    fn test_vector_ignores_translation() {
        let t = ObjectTransformer::new(
            &WorldTransform::from_translation([5.0, 5.0, 5.0]),
            CoordinateConversion::default(),
        );
        assert!(approx(t.vector([1.0, 0.0, 0.0]), [-1.0, 0.0, 0.0]));
        assert!(approx(t.vector([0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_scale_before_rotation() {
        // Scale X by 2, then rotate 90 degrees about Z: (1,0,0) -> (2,0,0) -> (0,2,0).
        let rotation = Quat::from_rotation_z(FRAC_PI_2);
        let p = transform_point(
            Vec3::X,
            Vec3::new(2.0, 1.0, 1.0),
            rotation,
            Vec3::ZERO,
            &CoordinateConversion::IDENTITY,
        );
        assert!(approx(p.to_array(), [0.0, 2.0, 0.0]));
    }

    #[test]
    fn test_rotation_before_translation() {
        // Rotate (1,0,0) to (0,1,0), then translate by (1,0,0), then mirror X.
        let rotation = Quat::from_rotation_z(FRAC_PI_2);
        let p = transform_point(
            Vec3::X,
            Vec3::ONE,
            rotation,
            Vec3::X,
            &CoordinateConversion::MIRROR_X,
        );
        assert!(approx(p.to_array(), [-1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_rotated_normal() {
        let rotation = Quat::from_rotation_x(FRAC_PI_2);
        let n = transform_vector(Vec3::Y, Vec3::ONE, rotation, &CoordinateConversion::MIRROR_X);
        assert!(approx(n.to_array(), [0.0, 0.0, 1.0]));
    }
}
