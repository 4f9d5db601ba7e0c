//! The `RegionLookup` seam.
//!
//! A lookup takes a file of Talairach coordinates and a cube range, and on
//! success leaves a sibling file (`<coords_file>.td`) containing the region
//! labels for every point.  Labels are opaque here; they are never parsed.

use std::path::{Path, PathBuf};

use talairach_types::TalError;

/// Cube range used when the caller does not pick one.
pub const DEFAULT_CUBE_RANGE: u32 = 3;

/// Suffix the daemon appends to the coordinates file name.
pub const TD_SUFFIX: &str = ".td";

/// Where the daemon writes labels for `coords_file`.
///
/// The suffix is appended to the full file name, so `coords.txt` becomes
/// `coords.txt.td`.
pub fn sibling_output_path(coords_file: &Path) -> PathBuf {
    let mut name = coords_file.as_os_str().to_owned();
    name.push(TD_SUFFIX);
    PathBuf::from(name)
}

/// A single labelling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Tab-delimited Talairach coordinates, one point per line.
    pub coords_file: PathBuf,
    /// Search cube edge (mm) around each point.
    pub cube_range: u32,
}

impl LookupRequest {
    pub fn new(coords_file: impl Into<PathBuf>, cube_range: u32) -> Self {
        Self {
            coords_file: coords_file.into(),
            cube_range,
        }
    }

    /// # Errors
    ///
    /// Returns [`TalError::InvalidCubeRange`] for a zero cube range.
    pub fn validate(&self) -> Result<(), TalError> {
        if self.cube_range == 0 {
            return Err(TalError::InvalidCubeRange(self.cube_range));
        }
        Ok(())
    }

    /// The file the daemon is expected to produce.
    pub fn output_file(&self) -> PathBuf {
        sibling_output_path(&self.coords_file)
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    /// The labelled file left next to the coordinates file.
    pub output_file: PathBuf,
    pub stdout: String,
    pub stderr: String,
}

/// Anything that can turn a coordinates file into a labels file.
///
/// Implementations block until the labels file exists or the lookup has
/// failed.  They never retry.
pub trait RegionLookup: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TalError::LookupFailed`] if the lookup could not be run or
    /// did not produce its output, and [`TalError::InvalidCubeRange`] for a
    /// rejected request.
    fn lookup(&self, request: &LookupRequest) -> Result<LookupOutcome, TalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_path_appends_suffix() {
        assert_eq!(
            sibling_output_path(Path::new("/tmp/coordinates.txt")),
            PathBuf::from("/tmp/coordinates.txt.td")
        );
        assert_eq!(sibling_output_path(Path::new("coords")), PathBuf::from("coords.td"));
    }

    #[test]
    fn zero_cube_range_is_rejected() {
        let req = LookupRequest::new("coordinates.txt", 0);
        assert!(matches!(req.validate(), Err(TalError::InvalidCubeRange(0))));
        assert!(LookupRequest::new("coordinates.txt", DEFAULT_CUBE_RANGE).validate().is_ok());
    }

    #[test]
    fn request_output_file_matches_sibling_path() {
        let req = LookupRequest::new("out/coordinates.txt", 5);
        assert_eq!(req.output_file(), PathBuf::from("out/coordinates.txt.td"));
    }
}
