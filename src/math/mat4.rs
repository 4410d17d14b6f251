//! 4x4 transformation matrix using column-vector convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - Rotations and projections are **right-handed** (OpenGL conventions)
//!
//! Storage is `data[row][col]`; [`Mat4::to_cols_array`] produces the
//! column-major layout the GPU expects.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    pub fn translation(v: Vec3) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, v.x],
            [0.0, 1.0, 0.0, v.y],
            [0.0, 0.0, 1.0, v.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a (possibly non-uniform) scale matrix.
    pub fn scaling(s: Vec3) -> Self {
        Mat4::new([
            [s.x, 0.0, 0.0, 0.0],
            [0.0, s.y, 0.0, 0.0],
            [0.0, 0.0, s.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a counter-clockwise rotation of `angle` radians about `axis`.
    ///
    /// The axis does not need to be normalized. A zero axis yields identity.
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        let a = axis.normalize();
        if a == Vec3::ZERO {
            return Mat4::identity();
        }
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Mat4::new([
            [
                t * a.x * a.x + c,
                t * a.x * a.y - s * a.z,
                t * a.x * a.z + s * a.y,
                0.0,
            ],
            [
                t * a.x * a.y + s * a.z,
                t * a.y * a.y + c,
                t * a.y * a.z - s * a.x,
                0.0,
            ],
            [
                t * a.x * a.z - s * a.y,
                t * a.y * a.z + s * a.x,
                t * a.z * a.z + c,
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a right-handed perspective matrix mapping depth to [-1, 1].
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `near` / `far` - Clipping plane distances (both > 0)
    pub fn perspective_rh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let depth = near - far;
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / depth, 2.0 * far * near / depth],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.data;
        let mut out = [[0.0f32; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, value) in out_row.iter_mut().enumerate() {
                *value = m[col][row];
            }
        }
        Mat4::new(out)
    }

    /// Computes the inverse of the matrix, if it exists.
    ///
    /// Uses the 2x2 sub-determinant expansion. Returns `None` when the
    /// determinant is zero or not finite.
    pub fn inverse(&self) -> Option<Mat4> {
        let [[a00, a01, a02, a03], [a10, a11, a12, a13], [a20, a21, a22, a23], [a30, a31, a32, a33]] =
            self.data;

        let s0 = a00 * a11 - a10 * a01;
        let s1 = a00 * a12 - a10 * a02;
        let s2 = a00 * a13 - a10 * a03;
        let s3 = a01 * a12 - a11 * a02;
        let s4 = a01 * a13 - a11 * a03;
        let s5 = a02 * a13 - a12 * a03;

        let c5 = a22 * a33 - a32 * a23;
        let c4 = a21 * a33 - a31 * a23;
        let c3 = a21 * a32 - a31 * a22;
        let c2 = a20 * a33 - a30 * a23;
        let c1 = a20 * a32 - a30 * a22;
        let c0 = a20 * a31 - a30 * a21;

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        Some(Mat4::new([
            [
                (a11 * c5 - a12 * c4 + a13 * c3) * inv,
                (-a01 * c5 + a02 * c4 - a03 * c3) * inv,
                (a31 * s5 - a32 * s4 + a33 * s3) * inv,
                (-a21 * s5 + a22 * s4 - a23 * s3) * inv,
            ],
            [
                (-a10 * c5 + a12 * c2 - a13 * c1) * inv,
                (a00 * c5 - a02 * c2 + a03 * c1) * inv,
                (-a30 * s5 + a32 * s2 - a33 * s1) * inv,
                (a20 * s5 - a22 * s2 + a23 * s1) * inv,
            ],
            [
                (a10 * c4 - a11 * c2 + a13 * c0) * inv,
                (-a00 * c4 + a01 * c2 - a03 * c0) * inv,
                (a30 * s4 - a31 * s2 + a33 * s0) * inv,
                (-a20 * s4 + a21 * s2 - a23 * s0) * inv,
            ],
            [
                (-a10 * c3 + a11 * c1 - a12 * c0) * inv,
                (a00 * c3 - a01 * c1 + a02 * c0) * inv,
                (-a30 * s3 + a31 * s1 - a32 * s0) * inv,
                (a20 * s3 - a21 * s1 + a22 * s0) * inv,
            ],
        ]))
    }

    /// The normal matrix: transpose of the inverse.
    ///
    /// Transforms surface normals correctly under non-uniform scale and
    /// shear. `None` when the matrix is singular.
    pub fn inverse_transpose(&self) -> Option<Mat4> {
        self.inverse().map(|inv| inv.transpose())
    }

    /// Flattens the matrix in column-major order for GPU upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for (row, values) in self.data.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                out[col * 4 + row] = *value;
            }
        }
        out
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-vector convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, out_row) in result.iter_mut().enumerate() {
            for (col, value) in out_row.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        Mat4::new(result)
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1).
///
/// Applies perspective division if w != 1.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x + self.data[r][1] * v.y + self.data[r][2] * v.z + self.data[r][3]
        };
        let (x, y, z, w) = (row(0), row(1), row(2), row(3));

        if w != 0.0 && w != 1.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn translation_moves_points() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m * Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rotation_about_y_is_right_handed() {
        // +X rotated a quarter turn about +Y lands on -Z.
        let p = Mat4::rotation(FRAC_PI_2, Vec3::Y) * Vec3::X;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_normalizes_axis() {
        let a = Mat4::rotation(0.7, Vec3::new(0.0, 5.0, 0.0));
        let b = Mat4::rotation(0.7, Vec3::Y);
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }

    #[test]
    fn inverse_undoes_transform() {
        let m = Mat4::translation(Vec3::new(-0.5, 2.0, 1.0))
            * Mat4::rotation(0.3, Vec3::new(1.0, 1.0, 0.0))
            * Mat4::scaling(Vec3::new(0.5, 2.0, 3.0));
        let inv = m.inverse().expect("matrix is invertible");
        assert_relative_eq!(m * inv, Mat4::identity(), epsilon = 1e-5);
        assert_relative_eq!(inv * m, Mat4::identity(), epsilon = 1e-5);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Mat4::scaling(Vec3::new(1.0, 0.0, 1.0));
        assert!(m.inverse().is_none());
        assert!(m.inverse_transpose().is_none());
    }

    #[test]
    fn inverse_transpose_of_rotation_is_rotation() {
        let r = Mat4::rotation(PI / 3.0, Vec3::new(0.2, 1.0, -0.4));
        let it = r.inverse_transpose().expect("rotations are invertible");
        assert_relative_eq!(it, r, epsilon = 1e-5);
    }

    #[test]
    fn inverse_transpose_keeps_normals_perpendicular_under_scale() {
        let m = Mat4::scaling(Vec3::new(4.0, 1.0, 1.0));
        // Surface x = y has tangent (1, 1, 0) and normal (1, -1, 0).
        let tangent = m * Vec3::new(1.0, 1.0, 0.0);
        let normal = m.inverse_transpose().unwrap() * Vec3::new(1.0, -1.0, 0.0);
        assert_relative_eq!(tangent.dot(normal), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn cols_array_is_column_major() {
        let m = Mat4::translation(Vec3::new(7.0, 8.0, 9.0));
        let cols = m.to_cols_array();
        assert_eq!(&cols[12..15], &[7.0, 8.0, 9.0]);
        assert_eq!(cols[15], 1.0);
    }

    #[test]
    fn perspective_maps_near_plane_to_minus_one() {
        let p = Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0);
        let v = p * Vec3::new(0.0, 0.0, -0.1);
        assert_relative_eq!(v.z, -1.0, epsilon = 1e-5);
    }
}
