// Library interface for lapscope
// This allows integration tests to access internal modules

pub mod errors;
pub mod playback;
pub mod trace;
pub mod ui;

// Re-export commonly used types
pub use errors::LapscopeError;
pub use playback::{Frame, PlaybackController, PlaybackMode, RenderSync, TickScheduler};
pub use trace::{CornerMarker, Sample, TelemetryTrace};
