//! `talairach-types` – shared value types and the workspace error enum.
//!
//! Every other crate in the workspace speaks in terms of these types:
//!
//! - [`Point3`] – a single electrode or voxel location.
//! - [`PointSet`] – an ordered sequence of points; position `i` of any output
//!   always corresponds to position `i` of the input.
//! - [`CoordinateMatrix`] – the raw numeric table read from disk, before it
//!   has been oriented into points.
//! - [`TalError`] – the single error type returned by the transform, the
//!   region lookup and the pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in 3-D brain space (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin of the coordinate space.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// The point as an `[x, y, z]` array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// An ordered sequence of points.  No uniqueness constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet(Vec<Point3>);

impl PointSet {
    pub fn new(points: Vec<Point3>) -> Self {
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[Point3] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.0.iter()
    }
}

impl FromIterator<Point3> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A row-major numeric table with a uniform row width.
///
/// This is the shape-agnostic form of coordinate input: it may hold N×3
/// (points by row) or 3×N (coordinates by row) data.  Orientation into a
/// [`PointSet`] is decided by `talairach-transform`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateMatrix {
    rows: Vec<Vec<f64>>,
    cols: usize,
}

impl CoordinateMatrix {
    /// Build a matrix from rows.
    ///
    /// # Errors
    ///
    /// Returns [`TalError::RaggedRow`] when any row differs in width from the
    /// first row.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TalError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != cols)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(TalError::RaggedRow {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows (first dimension).
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (second dimension).  Zero for an empty matrix.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Swap rows and columns, returning a new matrix.
    pub fn transpose(&self) -> Self {
        let rows = (0..self.cols)
            .map(|c| self.rows.iter().map(|r| r[c]).collect())
            .collect();
        Self {
            rows,
            cols: self.rows.len(),
        }
    }
}

/// Errors produced anywhere in the MNI → Talairach labelling pipeline.
#[derive(Error, Debug)]
pub enum TalError {
    #[error(
        "invalid coordinate shape ({rows}, {cols}): one dimension must hold the three x/y/z coordinates"
    )]
    InvalidShape { rows: usize, cols: usize },

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("matrix is not affine: bottom row must be [0, 0, 0, 1]")]
    NotAffine,

    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed coordinate file {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cube range must be at least 1, got {0}")]
    InvalidCubeRange(u32),

    #[error("Talairach lookup failed: {reason}{}", format_diagnostics(.status, .stdout, .stderr))]
    LookupFailed {
        status: Option<i32>,
        stdout: String,
        stderr: String,
        reason: String,
    },
}

impl TalError {
    /// Wrap an [`std::io::Error`] with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a [`csv::Error`] with the file it occurred on.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

fn format_diagnostics(status: &Option<i32>, stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if let Some(code) = status {
        out.push_str(&format!(" (exit status {code})"));
    }
    if !stderr.trim().is_empty() {
        out.push_str(&format!("\nstderr:\n{}", stderr.trim_end()));
    }
    if !stdout.trim().is_empty() {
        out.push_str(&format!("\nstdout:\n{}", stdout.trim_end()));
    }
    out
}
