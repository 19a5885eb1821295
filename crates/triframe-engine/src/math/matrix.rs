use std::ops::Mul;

use bytemuck::{Pod, Zeroable};

/// 4×4 `f32` matrix, column-major.
///
/// Layout invariant:
/// - exactly 16 contiguous `f32`, no padding (`size_of::<Matrix4>() == 64`)
/// - element `(row, col)` lives at index `col * 4 + row`
///
/// This is the layout WGSL expects for `mat4x4<f32>`, so the raw bytes are
/// written into uniform slots without any conversion.
///
/// Composition operators (`translate`, `rotate*`, `scale`) post-multiply:
/// `m.translate(..)` is `m = m · T`. Applied to a point, the operation added
/// last runs first.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Matrix4 {
    m: [f32; 16],
}

const _: () = assert!(std::mem::size_of::<Matrix4>() == 16 * std::mem::size_of::<f32>());

impl Matrix4 {
    /// Number of `f32` elements.
    pub const ELEMENTS: usize = 16;

    /// Size of the raw representation in bytes.
    pub const BYTE_SIZE: u64 = std::mem::size_of::<Matrix4>() as u64;

    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Builds a matrix from 16 column-major elements.
    #[inline]
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[12] = x;
        out.m[13] = y;
        out.m[14] = z;
        out
    }

    pub fn from_scale(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = x;
        out.m[5] = y;
        out.m[10] = z;
        out
    }

    /// Right-handed rotation around +X by `radians`.
    pub fn from_rotation_x(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, s, 0.0, //
            0.0, -s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ])
    }

    /// Right-handed rotation around +Y by `radians`.
    pub fn from_rotation_y(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_cols_array([
            c, 0.0, -s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ])
    }

    /// Right-handed rotation around +Z by `radians`.
    pub fn from_rotation_z(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_cols_array([
            c, s, 0.0, 0.0, //
            -s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ])
    }

    /// Right-handed perspective projection with clip-space depth in `[0, 1]`
    /// (the wgpu/WebGPU convention).
    ///
    /// `fov_y` is the vertical field of view in radians.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && far > near, "invalid clip planes: near={near} far={far}");
        debug_assert!(aspect > 0.0, "invalid aspect ratio: {aspect}");

        let h = 1.0 / (0.5 * fov_y).tan();
        let w = h / aspect;
        let r = far / (near - far);

        Self::from_cols_array([
            w, 0.0, 0.0, 0.0, //
            0.0, h, 0.0, 0.0, //
            0.0, 0.0, r, -1.0, //
            0.0, 0.0, r * near, 0.0, //
        ])
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// Raw elements in the fixed column-major layout.
    #[inline]
    pub fn raw(&self) -> &[f32; 16] {
        &self.m
    }

    /// Raw bytes, exactly [`Matrix4::BYTE_SIZE`] long.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        *self = *self * Self::from_translation(x, y, z);
        self
    }

    pub fn rotate_around_x(&mut self, radians: f32) -> &mut Self {
        *self = *self * Self::from_rotation_x(radians);
        self
    }

    pub fn rotate_around_y(&mut self, radians: f32) -> &mut Self {
        *self = *self * Self::from_rotation_y(radians);
        self
    }

    pub fn rotate_around_z(&mut self, radians: f32) -> &mut Self {
        *self = *self * Self::from_rotation_z(radians);
        self
    }

    /// Euler composition: X, then Y, then Z (`m = m · Rx · Ry · Rz`).
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotate_around_x(x).rotate_around_y(y).rotate_around_z(z)
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        *self = *self * Self::from_scale(x, y, z);
        self
    }

    /// Prepends `other`: `self = other · self`.
    ///
    /// Used to place a locally built matrix under a parent transform.
    pub fn multiply_left(&mut self, other: &Matrix4) -> &mut Self {
        *self = *other * *self;
        self
    }

    /// Transforms a point (w = 1) and drops the resulting w.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0f32; 3];
        for (row, v) in out.iter_mut().enumerate() {
            *v = self.get(row, 0) * p[0]
                + self.get(row, 1) * p[1]
                + self.get(row, 2) * p[2]
                + self.get(row, 3);
        }
        out
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.get(row, k) * rhs.get(k, col)).sum();
            }
        }
        Matrix4::from_cols_array(out)
    }
}

impl Mul for &Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: &Matrix4) -> Matrix4 {
        *self * *rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    const EPS: f32 = 1e-5;

    fn assert_close(actual: &Matrix4, expected: &Mat4) {
        let expected = expected.to_cols_array();
        for (i, (a, e)) in actual.raw().iter().zip(expected.iter()).enumerate() {
            assert!((a - e).abs() <= EPS, "element {i}: {a} != {e}");
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn raw_layout_is_sixteen_floats() {
        assert_eq!(Matrix4::BYTE_SIZE, 64);
        assert_eq!(Matrix4::identity().as_bytes().len(), 64);
    }

    #[test]
    fn translation_lives_in_last_column() {
        let m = Matrix4::from_translation(1.0, 2.0, 3.0);
        assert_eq!(&m.raw()[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(m.get(0, 3), 1.0);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn translate_then_rotate_x_matches_reference() {
        let mut m = Matrix4::identity();
        m.translate(0.0, 0.0, -4.0);
        m.rotate_around_x(25f32.to_radians());

        let reference =
            Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)) * Mat4::from_rotation_x(25f32.to_radians());
        assert_close(&m, &reference);
    }

    #[test]
    fn euler_rotation_order_is_x_then_y_then_z() {
        let mut m = Matrix4::identity();
        m.rotate(0.3, -1.1, 2.0);

        let reference = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(-1.1) * Mat4::from_rotation_z(2.0);
        assert_close(&m, &reference);
    }

    #[test]
    fn translate_rotate_scale_matches_reference() {
        let mut m = Matrix4::identity();
        m.translate(1.0, -2.0, 0.5).rotate(0.1, 0.2, 0.3).scale(2.0, 3.0, 4.0);

        let reference = Mat4::from_translation(Vec3::new(1.0, -2.0, 0.5))
            * Mat4::from_rotation_x(0.1)
            * Mat4::from_rotation_y(0.2)
            * Mat4::from_rotation_z(0.3)
            * Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        assert_close(&m, &reference);
    }

    #[test]
    fn multiply_left_prepends() {
        let parent = Matrix4::from_translation(0.0, 0.0, -4.0);
        let mut local = Matrix4::from_rotation_y(0.7);
        local.multiply_left(&parent);

        let reference = Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)) * Mat4::from_rotation_y(0.7);
        assert_close(&local, &reference);
    }

    #[test]
    fn transform_point_applies_scale_before_translation() {
        let mut m = Matrix4::identity();
        m.translate(10.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);
        assert_eq!(m.transform_point([1.0, 1.0, 1.0]), [12.0, 2.0, 2.0]);
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn perspective_matches_reference() {
        let fov = 85f32.to_radians();
        let m = Matrix4::perspective(fov, 16.0 / 9.0, 0.01, 100.0);
        assert_close(&m, &Mat4::perspective_rh(fov, 16.0 / 9.0, 0.01, 100.0));
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let m = Matrix4::perspective(1.0, 1.0, 0.5, 10.0);
        let clip_z = m.get(2, 2) * -0.5 + m.get(2, 3);
        let clip_w = m.get(3, 2) * -0.5;
        assert!((clip_z / clip_w).abs() < EPS);
    }
}
