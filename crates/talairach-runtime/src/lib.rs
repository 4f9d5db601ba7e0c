//! `talairach-runtime` – runs the labelling pipeline end to end.
//!
//! # Modules
//!
//! - [`pipeline`] – [`LabelPipeline`][pipeline::LabelPipeline]: read →
//!   transform → write → look up → relocate, stopping at the first error.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: wires up
//!   `tracing-subscriber` with an optional OTLP span exporter.

pub mod pipeline;
pub mod telemetry;

pub use pipeline::{
    DEFAULT_TAL_FILE, LabelPipeline, LabelReport, OUTPUT_SUFFIX, PipelineOptions, default_output_path,
};
pub use telemetry::{TracerProviderGuard, init_tracing};
