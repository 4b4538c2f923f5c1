use std::sync::Arc;

use log::{debug, warn};

use super::clock::VirtualClock;
use super::interpolator::{Frame, FrameResult, frame_at, frame_at_index};
use super::sync::RenderSync;
use crate::trace::TelemetryTrace;

pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

/// Playback mode, queryable by the UI for affordances such as the
/// play/pause button label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    Idle,
    Playing,
    Paused,
}

/// Identifies one tick request so callbacks that outlive a cancellation
/// can be told apart from the live one.
pub type TickToken = u64;

/// Environment capability for scheduling the next frame callback.
///
/// The rendering environment promises to call `PlaybackController::on_tick`
/// with the given token on its next frame. Tests drive ticks manually;
/// the viewer maps this onto an egui repaint request.
pub trait TickScheduler {
    fn request_tick(&mut self, token: TickToken);
}

/// The state machine coordinating clock, interpolator, and render loop.
///
/// Single-threaded by construction: only one tick is in flight at a time
/// and the next is requested only after the current one completes. The
/// trace is shared read-only and replaced wholesale on `load`.
pub struct PlaybackController<S: TickScheduler> {
    trace: Arc<TelemetryTrace>,
    mode: PlaybackMode,
    cursor: usize,
    rate: f64,
    clock: Option<VirtualClock>,
    pending_tick: Option<TickToken>,
    next_token: TickToken,
    scheduler: S,
    sync: RenderSync,
}

impl<S: TickScheduler> PlaybackController<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            trace: Arc::new(TelemetryTrace::empty()),
            mode: PlaybackMode::Idle,
            cursor: 0,
            rate: DEFAULT_PLAYBACK_RATE,
            clock: None,
            pending_tick: None,
            next_token: 0,
            scheduler,
            sync: RenderSync::default(),
        }
    }

    /// Replace the trace wholesale, discarding any in-flight playback.
    /// Surfaces receive the first sample right away so they render the
    /// start of the lap instead of a leftover from the previous trace.
    pub fn load(&mut self, trace: TelemetryTrace) {
        self.cancel_tick();
        self.trace = Arc::new(trace);
        self.mode = PlaybackMode::Idle;
        self.cursor = 0;
        self.clock = None;
        if !self.trace.is_empty() {
            let frame = frame_at_index(&self.trace, 0);
            self.sync.publish(&frame);
        }
        debug!("Trace loaded: {} samples", self.trace.len());
    }

    /// Start or resume playback from the current cursor. Playing from the
    /// final sample restarts the lap instead of no-opping.
    pub fn play(&mut self, now_s: f64) {
        if self.trace.is_empty() || self.mode == PlaybackMode::Playing {
            return;
        }
        if self.cursor == self.trace.last_index() {
            self.cursor = 0;
        }
        let virtual_time_s = self.trace.samples()[self.cursor].time_s;
        self.clock = Some(VirtualClock::start(virtual_time_s, self.rate, now_s));
        self.mode = PlaybackMode::Playing;
        self.request_tick();
    }

    /// Stop the clock, freezing the cursor at its last computed position.
    pub fn pause(&mut self) {
        if self.mode != PlaybackMode::Playing {
            return;
        }
        self.cancel_tick();
        self.clock = None;
        self.mode = PlaybackMode::Paused;
    }

    /// Change the playback rate. While playing this goes through the
    /// clock's continuity-preserving origin solve so the playhead does not
    /// jump; otherwise the rate just applies to the next `play`.
    pub fn set_rate(&mut self, rate: f64, now_s: f64) {
        if !(rate > 0.) || !rate.is_finite() {
            warn!("Ignoring invalid playback rate {}", rate);
            return;
        }
        self.rate = rate;
        if self.mode == PlaybackMode::Playing
            && let Some(clock) = self.clock.as_mut()
        {
            clock.change_rate(rate, now_s);
        }
    }

    /// Jump straight to a recorded sample and pause there. Scrubbing
    /// always pauses so user input never fights the running clock.
    pub fn scrub(&mut self, index: usize) {
        if self.trace.is_empty() {
            return;
        }
        self.cancel_tick();
        self.clock = None;
        self.mode = PlaybackMode::Paused;
        let frame = frame_at_index(&self.trace, index);
        self.cursor = frame.cursor;
        self.sync.publish(&frame);
    }

    /// Per-frame callback from the rendering environment. Ticks whose
    /// token no longer matches the pending request were cancelled by
    /// `pause`/`scrub`/`load` and are dropped without emitting a frame.
    pub fn on_tick(&mut self, token: TickToken, now_s: f64) {
        if self.pending_tick != Some(token) {
            return;
        }
        self.pending_tick = None;
        if self.mode != PlaybackMode::Playing {
            return;
        }
        let Some(clock) = self.clock else {
            return;
        };

        let virtual_time_s = clock.virtual_time(now_s);
        match frame_at(&self.trace, virtual_time_s, self.cursor) {
            FrameResult::Frame(frame) => {
                self.cursor = frame.cursor;
                self.sync.publish(&frame);
                self.request_tick();
            }
            FrameResult::EndOfTrace => {
                // Loop back to the start, ready to replay
                debug!("End of trace at virtual time {:.2}s", virtual_time_s);
                self.mode = PlaybackMode::Idle;
                self.cursor = 0;
                self.clock = None;
            }
        }
    }

    fn request_tick(&mut self) {
        let token = self.next_token;
        self.next_token += 1;
        self.pending_tick = Some(token);
        self.scheduler.request_tick(token);
    }

    /// Cancelling with nothing pending is a no-op.
    fn cancel_tick(&mut self) {
        self.pending_tick = None;
    }

    /// Token of the tick the controller is waiting on, if any. The
    /// rendering environment hands it back through `on_tick`.
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending_tick
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn trace(&self) -> &Arc<TelemetryTrace> {
        &self.trace
    }

    /// Scrub position expressed to the rendering environment as an exact
    /// frame, without touching playback state.
    pub fn current_frame(&self) -> Option<Frame> {
        if self.trace.is_empty() {
            return None;
        }
        Some(frame_at_index(&self.trace, self.cursor))
    }

    pub fn render_sync_mut(&mut self) -> &mut RenderSync {
        &mut self.sync
    }
}
