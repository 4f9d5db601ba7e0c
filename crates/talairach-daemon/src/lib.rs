//! `talairach-daemon` – boundary to the external Talairach Daemon client.
//!
//! Anatomical labelling is done by the Java Talairach Daemon
//! (<http://www.talairach.org>).  This crate only defines how it is called:
//!
//! - [`lookup`] – the [`RegionLookup`][lookup::RegionLookup] trait plus its
//!   request/outcome types.  Everything else in the workspace talks to the
//!   trait, so the real client can be swapped for a stub in tests.
//! - [`client`] – [`TalairachClient`][client::TalairachClient]: runs
//!   `java -cp <client> org.talairach.ExcelToTD` as a blocking subprocess.
//! - [`handoff`] – moves the labelled file the daemon leaves behind to its
//!   final location.
//! - [`sim`] – [`SimLookup`][sim::SimLookup]: canned success / failure for
//!   headless tests.

pub mod client;
pub mod handoff;
pub mod lookup;
pub mod sim;

pub use client::TalairachClient;
pub use handoff::relocate;
pub use lookup::{DEFAULT_CUBE_RANGE, LookupOutcome, LookupRequest, RegionLookup, sibling_output_path};
pub use sim::{SimBehavior, SimLookup};
