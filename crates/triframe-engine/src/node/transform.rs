use crate::math::Matrix4;

/// Position, Euler rotation (radians) and per-axis scale of a node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: [0.0; 3],
        rotation: [0.0; 3],
        scale: [1.0; 3],
    };

    /// Translate, then rotate around X, Y and Z, then scale.
    pub fn matrix(&self) -> Matrix4 {
        let [px, py, pz] = self.position;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;

        let mut m = Matrix4::identity();
        m.translate(px, py, pz).rotate(rx, ry, rz).scale(sx, sy, sz);
        m
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn identity_transform_is_identity_matrix() {
        assert_eq!(Transform::default().matrix(), Matrix4::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_rotation_translation_in_order() {
        let t = Transform {
            position: [1.0, -2.0, 3.0],
            rotation: [0.3, -0.7, 1.1],
            scale: [2.0, 0.5, 1.5],
        };
        let expected = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::from_rotation_x(0.3)
            * Mat4::from_rotation_y(-0.7)
            * Mat4::from_rotation_z(1.1)
            * Mat4::from_scale(Vec3::new(2.0, 0.5, 1.5));

        for (a, b) in t.matrix().raw().iter().zip(expected.to_cols_array().iter()) {
            assert!((a - b).abs() < 1e-5, "{a} != {b}");
        }
    }
}
