//! Reelpage Infrastructure
//!
//! Process-level plumbing shared by the binaries: tracing subscriber setup
//! with an optional daily log file.

pub mod telemetry;

pub use telemetry::{init_telemetry, log_file_path, TelemetryOptions};
