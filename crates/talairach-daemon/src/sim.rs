//! In-process stand-in for the Talairach Daemon.
//!
//! [`SimLookup`] implements [`RegionLookup`] without spawning anything, so
//! the pipeline can be exercised in CI where no Java runtime or client jar
//! is installed.
//!
//! # Example
//!
//! ```rust
//! use talairach_daemon::{LookupRequest, RegionLookup, SimLookup};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let coords = dir.path().join("coordinates.txt");
//! std::fs::write(&coords, "7.93\t14.20\t32.78\n").unwrap();
//!
//! let sim = SimLookup::labelling("Left Cerebrum");
//! let outcome = sim.lookup(&LookupRequest::new(&coords, 3)).unwrap();
//! let labels = std::fs::read_to_string(&outcome.output_file).unwrap();
//! assert_eq!(labels, "7.93\t14.20\t32.78\tLeft Cerebrum\n");
//! assert_eq!(sim.calls().len(), 1);
//! ```

use std::fs;
use std::sync::Mutex;

use talairach_types::TalError;

use crate::lookup::{LookupOutcome, LookupRequest, RegionLookup};

/// What a [`SimLookup`] does when called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimBehavior {
    /// Write the labels file, appending `label` to every input line.
    Label { label: String },
    /// Fail as a daemon exiting with `status` would.
    Fail { status: Option<i32>, stderr: String },
    /// Report success without writing the labels file.
    SilentExit,
}

/// A [`RegionLookup`] with canned behaviour that records every request.
#[derive(Debug)]
pub struct SimLookup {
    behavior: SimBehavior,
    calls: Mutex<Vec<LookupRequest>>,
}

impl SimLookup {
    pub fn new(behavior: SimBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Succeeds, tagging every point with `label`.
    pub fn labelling(label: impl Into<String>) -> Self {
        Self::new(SimBehavior::Label {
            label: label.into(),
        })
    }

    /// Fails with exit status `status` and the given stderr.
    pub fn failing(status: i32, stderr: impl Into<String>) -> Self {
        Self::new(SimBehavior::Fail {
            status: Some(status),
            stderr: stderr.into(),
        })
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<LookupRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl RegionLookup for SimLookup {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupOutcome, TalError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        request.validate()?;

        match &self.behavior {
            SimBehavior::Label { label } => {
                let coords = fs::read_to_string(&request.coords_file)
                    .map_err(|e| TalError::io(&request.coords_file, e))?;
                let labelled: String = coords
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(|l| format!("{l}\t{label}\n"))
                    .collect();
                let output_file = request.output_file();
                fs::write(&output_file, labelled).map_err(|e| TalError::io(&output_file, e))?;
                Ok(LookupOutcome {
                    output_file,
                    stdout: format!("Processed {}", request.coords_file.display()),
                    stderr: String::new(),
                })
            }
            SimBehavior::Fail { status, stderr } => Err(TalError::LookupFailed {
                status: *status,
                stdout: String::new(),
                stderr: stderr.clone(),
                reason: "client exited unsuccessfully".to_string(),
            }),
            SimBehavior::SilentExit => Err(TalError::LookupFailed {
                status: Some(0),
                stdout: String::new(),
                stderr: String::new(),
                reason: format!("client did not produce {}", request.output_file().display()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_sim_writes_nothing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let coords = dir.path().join("coordinates.txt");
        fs::write(&coords, "1.00\t2.00\t3.00\n").unwrap();

        let sim = SimLookup::failing(1, "java.lang.NullPointerException");
        let request = LookupRequest::new(&coords, 3);
        let err = sim.lookup(&request).unwrap_err();

        assert!(err.to_string().contains("NullPointerException"));
        assert!(!request.output_file().exists());
        assert_eq!(sim.calls(), vec![request]);
    }

    #[test]
    fn silent_exit_is_failure() {
        let sim = SimLookup::new(SimBehavior::SilentExit);
        let err = sim.lookup(&LookupRequest::new("coordinates.txt", 3)).unwrap_err();
        assert!(matches!(err, TalError::LookupFailed { status: Some(0), .. }));
    }

    #[test]
    fn labelling_sim_keeps_point_order() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let coords = dir.path().join("coordinates.txt");
        fs::write(&coords, "1.00\t2.00\t3.00\n4.00\t5.00\t6.00\n").unwrap();

        let outcome = SimLookup::labelling("Gray Matter")
            .lookup(&LookupRequest::new(&coords, 5))
            .unwrap();
        let labels = fs::read_to_string(outcome.output_file).unwrap();
        let lines: Vec<&str> = labels.lines().collect();
        assert_eq!(lines, vec!["1.00\t2.00\t3.00\tGray Matter", "4.00\t5.00\t6.00\tGray Matter"]);
    }
}
