//! The MNI → Talairach → region-label pipeline.
//!
//! One run processes one coordinates file:
//!
//! 1. read the tab-delimited input;
//! 2. convert MNI → Talairach (or, for input already in Talairach space,
//!    only check its shape);
//! 3. write the coordinates the daemon will read, two decimals per field;
//! 4. run the [`RegionLookup`];
//! 5. move the `.td` labels file to its final name.
//!
//! Every stage returns early on error; nothing is relocated unless the
//! lookup succeeded, and nothing is written unless the input had a valid
//! shape.
//!
//! # Example
//!
//! ```rust
//! use talairach_daemon::SimLookup;
//! use talairach_runtime::{LabelPipeline, PipelineOptions};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let coords = dir.path().join("elecs.txt");
//! std::fs::write(&coords, "10.0\t20.0\t30.0\n").unwrap();
//!
//! let mut options = PipelineOptions::new(&coords);
//! options.tal_file = dir.path().join("coordinates.txt");
//!
//! let report = LabelPipeline::new(SimLookup::labelling("Frontal Lobe"))
//!     .run(&options)
//!     .unwrap();
//! assert_eq!(report.output_file, dir.path().join("elecs_brod_areas.txt"));
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use talairach_daemon::{DEFAULT_CUBE_RANGE, LookupRequest, RegionLookup, relocate};
use talairach_transform::{COORD_PRECISION, mni_to_talairach, read_coordinates, to_point_set, write_coordinates};
use talairach_types::TalError;
use tracing::{info, instrument};

/// Appended to the input file stem to name the final labels file.
pub const OUTPUT_SUFFIX: &str = "_brod_areas.txt";

/// Intermediate file handed to the daemon when none is configured.
pub const DEFAULT_TAL_FILE: &str = "coordinates.txt";

/// `<dir>/<stem>_brod_areas.txt` for an input at `<dir>/<stem>.<ext>`.
pub fn default_output_path(coords: &Path) -> PathBuf {
    let mut name = coords
        .file_stem()
        .map(|s| s.to_owned())
        .unwrap_or_else(|| "coordinates".into());
    name.push(OUTPUT_SUFFIX);
    coords.with_file_name(name)
}

/// Inputs for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Tab-delimited input coordinates.
    pub coords: PathBuf,
    /// Where the Talairach coordinates are written for the daemon.
    pub tal_file: PathBuf,
    /// Final labels file; [`default_output_path`] when `None`.
    pub output: Option<PathBuf>,
    /// Input is already in Talairach space; skip the transform.
    pub already_talairach: bool,
    pub cube_range: u32,
}

impl PipelineOptions {
    pub fn new(coords: impl Into<PathBuf>) -> Self {
        Self {
            coords: coords.into(),
            tal_file: PathBuf::from(DEFAULT_TAL_FILE),
            output: None,
            already_talairach: false,
            cube_range: DEFAULT_CUBE_RANGE,
        }
    }

    /// The resolved final labels path.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.coords))
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelReport {
    pub points: usize,
    /// Whether the MNI → Talairach transform was applied.
    pub transformed: bool,
    pub cube_range: u32,
    pub tal_file: PathBuf,
    pub output_file: PathBuf,
    /// Whatever the daemon printed.
    pub daemon_stdout: String,
}

/// Sequential labelling pipeline over any [`RegionLookup`].
pub struct LabelPipeline<L> {
    lookup: L,
}

impl<L: RegionLookup> LabelPipeline<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Run every stage for `options`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`TalError`] from any stage unchanged.
    #[instrument(skip(self, options), fields(coords = %options.coords.display()))]
    pub fn run(&self, options: &PipelineOptions) -> Result<LabelReport, TalError> {
        let request = LookupRequest::new(&options.tal_file, options.cube_range);
        request.validate()?;

        let matrix = read_coordinates(&options.coords)?;
        let points = if options.already_talairach {
            to_point_set(&matrix)?
        } else {
            mni_to_talairach(&matrix)?
        };
        info!(
            points = points.len(),
            transformed = !options.already_talairach,
            "coordinates ready"
        );

        write_coordinates(&options.tal_file, &points, COORD_PRECISION)?;

        let outcome = self.lookup.lookup(&request)?;
        let output_file = relocate(&outcome.output_file, &options.output_path())?;
        info!(output = %output_file.display(), "output file written");

        Ok(LabelReport {
            points: points.len(),
            transformed: !options.already_talairach,
            cube_range: options.cube_range,
            tal_file: options.tal_file.clone(),
            output_file,
            daemon_stdout: outcome.stdout,
        })
    }
}
