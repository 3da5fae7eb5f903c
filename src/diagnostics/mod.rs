//! Diagnostics data model exposed by both detectors and the demo binary.
//!
//! `DetectionReport` is the entry point returned by `detect_with_diagnostics`,
//! bundling the ranked result with a `PipelineTrace` describing input
//! alignment, stage timings and intermediate counts.

pub mod pipeline;
pub mod timing;

pub use pipeline::{DetectionReport, FieldStats, InputDescriptor, PipelineTrace};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
