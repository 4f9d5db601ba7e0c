//! Shape orientation: which dimension of a coordinate table holds x/y/z.
//!
//! | Shape | Interpretation |
//! |---|---|
//! | N×3, N ≠ 3 | N points, used as-is |
//! | 3×3 | three points, with an ambiguity warning |
//! | 3×N, N ≠ 3 | transposed input, N points |
//! | anything else | [`TalError::InvalidShape`] |

use talairach_types::{CoordinateMatrix, Point3, PointSet, TalError};
use tracing::{debug, warn};

/// How a coordinate table maps onto points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// One point per row.
    PointsByRow,
    /// 3×3: read as one point per row, but the table could equally be
    /// transposed.
    Ambiguous,
    /// One coordinate axis per row; transpose before use.
    Transposed,
}

/// Decide the orientation of a `rows × cols` table.
///
/// # Errors
///
/// Returns [`TalError::InvalidShape`] when neither dimension is 3, or when
/// the table holds no points at all.
pub fn orient(rows: usize, cols: usize) -> Result<Orientation, TalError> {
    match (rows, cols) {
        (3, 3) => Ok(Orientation::Ambiguous),
        (3, c) if c > 0 => Ok(Orientation::Transposed),
        (r, 3) if r > 0 => Ok(Orientation::PointsByRow),
        _ => Err(TalError::InvalidShape { rows, cols }),
    }
}

/// Orient `matrix` and collect it into a [`PointSet`] without transforming.
pub fn to_point_set(matrix: &CoordinateMatrix) -> Result<PointSet, TalError> {
    let (rows, cols) = matrix.shape();
    let points = match orient(rows, cols)? {
        Orientation::PointsByRow => collect_rows(matrix),
        Orientation::Ambiguous => {
            warn!(
                rows,
                cols, "ambiguous input shape; assuming one electrode per row"
            );
            collect_rows(matrix)
        }
        Orientation::Transposed => {
            debug!(rows, cols, "coordinates stored by column; transposing");
            collect_rows(&matrix.transpose())
        }
    };
    Ok(points)
}

fn collect_rows(matrix: &CoordinateMatrix) -> PointSet {
    matrix
        .as_rows()
        .iter()
        .map(|r| Point3::new(r[0], r[1], r[2]))
        .collect()
}
