// Error types for lapscope

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum LapscopeError {
    // Errors while loading a telemetry trace
    #[snafu(display("Invalid telemetry file: {path}"))]
    InvalidTraceFile { path: String },
    #[snafu(display("Error reading telemetry trace"))]
    TraceIOError { source: io::Error },
    #[snafu(display("Error parsing telemetry trace"))]
    TraceParseError { source: serde_json::Error },
    #[snafu(display(
        "Telemetry trace is not sorted by time: sample {index} goes backwards ({prev_time_s}s -> {time_s}s)"
    ))]
    NonMonotonicTrace {
        index: usize,
        prev_time_s: f64,
        time_s: f64,
    },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
