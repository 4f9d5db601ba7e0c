//! Fixed 4×4 affine transforms acting on homogeneous coordinates.
//!
//! A point `p = (x, y, z)` is lifted to `(x, y, z, 1)`, multiplied by the
//! matrix and truncated back to its first three components.  Row-vector
//! form `(p, 1) · Mᵀ` and column-vector form `M · (p, 1)ᵀ` are the same
//! arithmetic; this module evaluates the latter row by row.

use talairach_types::{CoordinateMatrix, Point3, PointSet, TalError};

use crate::orientation::to_point_set;

// ────────────────────────────────────────────────────────────────────────────
// AffineMatrix
// ────────────────────────────────────────────────────────────────────────────

/// A 4×4 affine transform.  The bottom row is always `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix([[f64; 4]; 4]);

impl AffineMatrix {
    /// The icbm2tal MNI → Talairach transform (Lancaster et al., 2007).
    pub const MNI_TO_TALAIRACH: Self = Self([
        [0.9254, 0.0024, -0.0118, -1.0207],
        [-0.0048, 0.9316, -0.0871, -1.7667],
        [0.0152, 0.0883, 0.8924, 4.0926],
        [0.0000, 0.0000, 0.0000, 1.0000],
    ]);

    /// Build an affine from its four rows.
    ///
    /// # Errors
    ///
    /// Returns [`TalError::NotAffine`] when the bottom row is not
    /// `[0, 0, 0, 1]` (i.e. the matrix would be projective).
    pub fn new(rows: [[f64; 4]; 4]) -> Result<Self, TalError> {
        if rows[3] != [0.0, 0.0, 0.0, 1.0] {
            return Err(TalError::NotAffine);
        }
        Ok(Self(rows))
    }

    pub fn rows(&self) -> &[[f64; 4]; 4] {
        &self.0
    }

    /// The translation column, i.e. where the origin is mapped to.
    pub fn translation(&self) -> Point3 {
        Point3::new(self.0[0][3], self.0[1][3], self.0[2][3])
    }

    /// Transform a single point.
    pub fn apply(&self, p: Point3) -> Point3 {
        let h = [p.x, p.y, p.z, 1.0];
        let row = |r: usize| {
            let m = &self.0[r];
            m[0] * h[0] + m[1] * h[1] + m[2] * h[2] + m[3] * h[3]
        };
        Point3::new(row(0), row(1), row(2))
    }

    /// Transform every point, preserving order.  The input is not modified.
    pub fn apply_all(&self, points: &PointSet) -> PointSet {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MNI → Talairach
// ────────────────────────────────────────────────────────────────────────────

/// Convert a table of MNI coordinates into Talairach space.
///
/// The table may be N×3 (points by row) or 3×N (coordinates by row, N ≠ 3);
/// a 3×3 table is read as three points and logs an ambiguity warning.  See
/// [`orient`][crate::orientation::orient] for the exact rule.
///
/// # Errors
///
/// Returns [`TalError::InvalidShape`] when neither dimension is 3.
pub fn mni_to_talairach(matrix: &CoordinateMatrix) -> Result<PointSet, TalError> {
    let points = to_point_set(matrix)?;
    Ok(transform_points(&points))
}

/// Apply [`AffineMatrix::MNI_TO_TALAIRACH`] to an already-oriented point set.
pub fn transform_points(points: &PointSet) -> PointSet {
    AffineMatrix::MNI_TO_TALAIRACH.apply_all(points)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: Point3, expected: (f64, f64, f64)) {
        assert!((actual.x - expected.0).abs() < EPS, "x={} expected {}", actual.x, expected.0);
        assert!((actual.y - expected.1).abs() < EPS, "y={} expected {}", actual.y, expected.1);
        assert!((actual.z - expected.2).abs() < EPS, "z={} expected {}", actual.z, expected.2);
    }

    fn matrix(rows: &[&[f64]]) -> CoordinateMatrix {
        CoordinateMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    // ── AffineMatrix ────────────────────────────────────────────────────────

    #[test]
    fn published_matrix_is_affine() {
        let m = AffineMatrix::MNI_TO_TALAIRACH;
        assert_eq!(m.rows()[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(AffineMatrix::new(*m.rows()).unwrap(), m);
    }

    #[test]
    fn new_rejects_projective_bottom_row() {
        let mut rows = *AffineMatrix::MNI_TO_TALAIRACH.rows();
        rows[3] = [0.0, 0.0, 0.1, 1.0];
        assert!(matches!(AffineMatrix::new(rows), Err(TalError::NotAffine)));
    }

    #[test]
    fn origin_maps_to_translation_exactly() {
        let m = AffineMatrix::MNI_TO_TALAIRACH;
        let t = m.apply(Point3::origin());
        assert_eq!(t, Point3::new(-1.0207, -1.7667, 4.0926));
        assert_eq!(t, m.translation());
    }

    #[test]
    fn hand_computed_points() {
        let m = AffineMatrix::MNI_TO_TALAIRACH;
        // x = 9.254 + 0.048 - 0.354 - 1.0207
        // y = -0.048 + 18.632 - 2.613 - 1.7667
        // z = 0.152 + 1.766 + 26.772 + 4.0926
        assert_close(m.apply(Point3::new(10.0, 20.0, 30.0)), (7.9273, 14.2043, 32.7826));
        // x = -37.016 + 0.0288 - 0.649 - 1.0207
        // y = 0.192 + 11.1792 - 4.7905 - 1.7667
        // z = -0.608 + 1.0596 + 49.082 + 4.0926
        assert_close(m.apply(Point3::new(-40.0, 12.0, 55.0)), (-38.6569, 4.814, 53.6262));
    }

    #[test]
    fn apply_matches_row_vector_times_transpose() {
        let m = AffineMatrix::MNI_TO_TALAIRACH;
        let p = Point3::new(-12.5, 33.0, 7.25);
        let h = [p.x, p.y, p.z, 1.0];
        let mut out = [0.0; 4];
        for (j, o) in out.iter_mut().enumerate() {
            for (i, hi) in h.iter().enumerate() {
                // (p, 1) · Mᵀ  ⇒  out[j] = Σ h[i] · M[j][i]
                *o += hi * m.rows()[j][i];
            }
        }
        assert_close(m.apply(p), (out[0], out[1], out[2]));
        assert!((out[3] - 1.0).abs() < EPS);
    }

    #[test]
    fn apply_all_preserves_shape_and_order() {
        let input: PointSet = (0..7)
            .map(|i| Point3::new(i as f64, -(i as f64), 2.0 * i as f64))
            .collect();
        let before = input.clone();
        let out = AffineMatrix::MNI_TO_TALAIRACH.apply_all(&input);
        assert_eq!(out.len(), input.len());
        assert_eq!(input, before);
        for (p, q) in input.iter().zip(out.iter()) {
            assert_eq!(AffineMatrix::MNI_TO_TALAIRACH.apply(*p), *q);
        }
    }

    // ── mni_to_talairach ────────────────────────────────────────────────────

    #[test]
    fn transposed_input_matches_points_by_row() {
        let by_row = matrix(&[
            &[10.0, 20.0, 30.0],
            &[-40.0, 12.0, 55.0],
            &[1.0, 2.0, 3.0],
            &[0.0, 0.0, 0.0],
        ]);
        let by_col = by_row.transpose();
        assert_eq!(by_col.shape(), (3, 4));
        assert_eq!(mni_to_talairach(&by_col).unwrap(), mni_to_talairach(&by_row).unwrap());
    }

    #[test]
    fn square_input_is_not_transposed() {
        let square = matrix(&[&[10.0, 20.0, 30.0], &[0.0, 0.0, 0.0], &[-40.0, 12.0, 55.0]]);
        let out = mni_to_talairach(&square).unwrap();
        assert_eq!(out.len(), 3);
        assert_close(out.points()[0], (7.9273, 14.2043, 32.7826));
        assert_eq!(out.points()[1], AffineMatrix::MNI_TO_TALAIRACH.translation());
    }

    #[test]
    fn wrong_width_is_invalid_shape() {
        let bad = CoordinateMatrix::from_rows(vec![vec![1.0; 4]; 5]).unwrap();
        match mni_to_talairach(&bad) {
            Err(TalError::InvalidShape { rows, cols }) => assert_eq!((rows, cols), (5, 4)),
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }
}
