// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 4x4 affine transforms for room-scan primitives
//!
//! Scan exports store each primitive's placement as 16 floats in column-major
//! order. Partial exports are common, so a missing or short matrix is treated
//! as the identity instead of an error.

use nalgebra::{Matrix4, Point3, Vector4};

/// Number of entries in a column-major 4x4 matrix
pub const MATRIX_LEN: usize = 16;

/// Column-major affine transform (rotation + scale + translation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform4x4(Matrix4<f64>);

impl Transform4x4 {
    /// Build from a column-major slice.
    ///
    /// Returns `None` when fewer than 16 entries are present. Extra entries
    /// are ignored.
    pub fn from_column_slice(values: &[f64]) -> Option<Self> {
        if values.len() < MATRIX_LEN {
            return None;
        }
        Some(Self(Matrix4::from_column_slice(&values[..MATRIX_LEN])))
    }

    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Pure translation, mostly useful for tests and synthetic scans
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self(Matrix4::new_translation(&nalgebra::Vector3::new(x, y, z)))
    }

    /// Rotation about the vertical (Y) axis followed by a translation
    pub fn rotation_y(angle_rad: f64, x: f64, y: f64, z: f64) -> Self {
        let rotation = nalgebra::Rotation3::from_axis_angle(&nalgebra::Vector3::y_axis(), angle_rad);
        let mut m = rotation.to_homogeneous();
        m[(0, 3)] = x;
        m[(1, 3)] = y;
        m[(2, 3)] = z;
        Self(m)
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Apply the upper 3x4 block to a point.
    ///
    /// The bottom row is not used: `x' = m0*x + m4*y + m8*z + m12` and so on
    /// for rows 1 and 2, with no homogeneous divide.
    pub fn apply(&self, p: Point3<f64>) -> Point3<f64> {
        let affine = self.0.fixed_view::<3, 4>(0, 0);
        let v = affine * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Column-major copy of the 16 entries
    pub fn to_column_array(&self) -> [f64; MATRIX_LEN] {
        let mut out = [0.0; MATRIX_LEN];
        out.copy_from_slice(self.0.as_slice());
        out
    }
}

impl Default for Transform4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Apply a raw column-major matrix to a point.
///
/// A missing matrix, or one with fewer than 16 entries, leaves the point
/// unchanged.
pub fn apply_transform(m: Option<&[f64]>, p: Point3<f64>) -> Point3<f64> {
    match m.and_then(Transform4x4::from_column_slice) {
        Some(t) => t.apply(p),
        None => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Straight matrix-vector product written out by hand
    fn multiply(m: &[f64], p: [f64; 3]) -> [f64; 3] {
        let [x, y, z] = p;
        [
            m[0] * x + m[4] * y + m[8] * z + m[12],
            m[1] * x + m[5] * y + m[9] * z + m[13],
            m[2] * x + m[6] * y + m[10] * z + m[14],
        ]
    }

    #[test]
    fn test_absent_matrix_is_identity() {
        let p = Point3::new(1.5, -2.0, 3.25);
        assert_eq!(apply_transform(None, p), p);
    }

    #[test]
    fn test_short_matrix_is_identity() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let short = [2.0; 15];
        assert_eq!(apply_transform(Some(&short), p), p);
        assert!(Transform4x4::from_column_slice(&short).is_none());
    }

    #[test]
    fn test_matches_manual_product() {
        let m = [
            0.8, 0.1, -0.6, 0.0, // column 0
            0.0, 1.0, 0.0, 0.0, // column 1
            0.6, 0.2, 0.8, 0.0, // column 2
            3.0, -1.0, 7.5, 1.0, // column 3
        ];
        for p in [[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [-4.5, 0.25, 9.0]] {
            let expected = multiply(&m, p);
            let got = apply_transform(Some(&m), Point3::new(p[0], p[1], p[2]));
            assert_relative_eq!(got.x, expected[0], epsilon = 1e-12);
            assert_relative_eq!(got.y, expected[1], epsilon = 1e-12);
            assert_relative_eq!(got.z, expected[2], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bottom_row_is_ignored() {
        // A non-affine bottom row must not cause a perspective divide
        let mut m = Transform4x4::translation(1.0, 2.0, 3.0).to_column_array();
        m[3] = 5.0;
        m[15] = 2.0;
        let got = apply_transform(Some(&m), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(got, Point3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_extra_entries_ignored() {
        let mut m = Transform4x4::translation(1.0, 0.0, 0.0).to_column_array().to_vec();
        m.extend_from_slice(&[99.0, 99.0]);
        let got = apply_transform(Some(&m), Point3::origin());
        assert_eq!(got, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let t = Transform4x4::rotation_y(std::f64::consts::FRAC_PI_2, 0.0, 0.0, 0.0);
        let got = t.apply(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(got.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(got.z, -1.0, epsilon = 1e-12);
    }
}
