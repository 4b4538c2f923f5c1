pub mod clock;
pub mod controller;
pub mod interpolator;
pub mod sync;

pub use clock::VirtualClock;
pub use controller::{
    DEFAULT_PLAYBACK_RATE, PlaybackController, PlaybackMode, TickScheduler, TickToken,
};
pub use interpolator::{Frame, FrameResult, frame_at, frame_at_index};
pub use sync::{FrameSink, RenderSync, SharedFrame};
