//! [`TalairachClient`] – the Java Talairach Daemon command-line client.
//!
//! The client jar exposes `org.talairach.ExcelToTD`, which takes a single
//! `<option>:<arguments>` parameter.  Option `3` is the cube search:
//!
//! ```text
//! java -cp talairach.jar org.talairach.ExcelToTD 3:<cube_range>,<coords_file>
//! ```
//!
//! On success it writes `<coords_file>.td` next to the input.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use talairach_types::TalError;
use tracing::{debug, info, instrument};

use crate::lookup::{LookupOutcome, LookupRequest, RegionLookup};

/// Main class of the batch client.
pub const EXCEL_TO_TD_CLASS: &str = "org.talairach.ExcelToTD";

/// `ExcelToTD` search option selecting a cube search.
pub const CUBE_SEARCH_OPTION: u32 = 3;

/// Runs the Talairach Daemon client as a blocking subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalairachClient {
    java: PathBuf,
    classpath: PathBuf,
}

impl TalairachClient {
    /// Client at `classpath` (usually `talairach.jar`), run with `java` from
    /// `PATH`.
    pub fn new(classpath: impl Into<PathBuf>) -> Self {
        Self {
            java: PathBuf::from("java"),
            classpath: classpath.into(),
        }
    }

    /// Use a specific Java launcher.
    pub fn with_java(mut self, java: impl Into<PathBuf>) -> Self {
        self.java = java.into();
        self
    }

    pub fn java(&self) -> &Path {
        &self.java
    }

    pub fn classpath(&self) -> &Path {
        &self.classpath
    }

    /// Arguments passed to the Java launcher for `request`.
    pub fn command_args(&self, request: &LookupRequest) -> Vec<OsString> {
        let search = format!(
            "{}:{},{}",
            CUBE_SEARCH_OPTION,
            request.cube_range,
            request.coords_file.to_string_lossy()
        );
        vec![
            "-cp".into(),
            self.classpath.clone().into_os_string(),
            EXCEL_TO_TD_CLASS.into(),
            search.into(),
        ]
    }
}

impl RegionLookup for TalairachClient {
    #[instrument(skip(self), fields(java = %self.java.display(), classpath = %self.classpath.display()))]
    fn lookup(&self, request: &LookupRequest) -> Result<LookupOutcome, TalError> {
        request.validate()?;

        let args = self.command_args(request);
        debug!(?args, "launching Talairach client");

        let output = Command::new(&self.java)
            .args(&args)
            .output()
            .map_err(|e| TalError::LookupFailed {
                status: None,
                stdout: String::new(),
                stderr: e.to_string(),
                reason: format!("could not launch {}", self.java.display()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(TalError::LookupFailed {
                status: output.status.code(),
                stdout,
                stderr,
                reason: "client exited unsuccessfully".to_string(),
            });
        }

        let output_file = request.output_file();
        if !output_file.is_file() {
            return Err(TalError::LookupFailed {
                status: output.status.code(),
                reason: format!("client did not produce {}", output_file.display()),
                stdout,
                stderr,
            });
        }

        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim_end());
        }
        info!(output = %output_file.display(), "region labels written");

        Ok(LookupOutcome {
            output_file,
            stdout,
            stderr,
        })
    }
}
