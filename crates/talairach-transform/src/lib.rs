//! `talairach-transform` – MNI → Talairach coordinate conversion.
//!
//! Maps electrode locations from MNI normalised space into Talairach space
//! using the fixed icbm2tal affine published by the Research Imaging Center
//! (San Antonio, TX; <https://brainmap.org/icbm2tal/>).
//!
//! # Modules
//!
//! - [`affine`] – [`AffineMatrix`][affine::AffineMatrix]: a checked 4×4
//!   affine (bottom row `[0, 0, 0, 1]`) and the published
//!   [`MNI_TO_TALAIRACH`][affine::AffineMatrix::MNI_TO_TALAIRACH] constant.
//! - [`orientation`] – decides whether a numeric table holds points by row
//!   or coordinates by row, and builds a [`PointSet`][talairach_types::PointSet]
//!   from it.
//! - [`coords`] – tab-delimited coordinate text files, read and written.
//!
//! # Example
//!
//! ```rust
//! use talairach_transform::mni_to_talairach;
//! use talairach_types::CoordinateMatrix;
//!
//! let mni = CoordinateMatrix::from_rows(vec![vec![0.0, 0.0, 0.0]]).unwrap();
//! let tal = mni_to_talairach(&mni).unwrap();
//! assert_eq!(tal.points()[0].x, -1.0207);
//! ```

pub mod affine;
pub mod coords;
pub mod orientation;

pub use affine::{AffineMatrix, mni_to_talairach, transform_points};
pub use coords::{COORD_PRECISION, parse_coordinates, read_coordinates, write_coordinates};
pub use orientation::{Orientation, orient, to_point_set};
