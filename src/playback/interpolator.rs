use crate::trace::{Sample, TelemetryTrace};

/// One fully interpolated output snapshot for a given virtual time.
/// Recomputed every tick, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub distance_m: f64,
    pub speed_kmh: f64,
    pub throttle_pct: f64,
    pub brake: f64,
    /// Index of the sample anchoring the interpolation window
    pub cursor: usize,
}

impl Frame {
    fn from_sample(sample: &Sample, cursor: usize) -> Self {
        Self {
            x: sample.x,
            y: sample.y,
            distance_m: sample.distance_m,
            speed_kmh: sample.speed_kmh,
            throttle_pct: sample.throttle_pct,
            brake: sample.brake,
            cursor,
        }
    }
}

/// Result of evaluating a trace at a virtual time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameResult {
    Frame(Frame),
    /// Virtual time ran past the final sample
    EndOfTrace,
}

fn lerp(curr: f64, next: f64, progress: f64) -> f64 {
    curr + (next - curr) * progress
}

/// Evaluate the trace at `virtual_time_s`, scanning forward from
/// `cursor_hint` to the bracketing sample pair.
///
/// The hint makes the per-tick call O(samples passed since the last tick)
/// instead of a fresh scan from zero. Callers carry the returned frame's
/// `cursor` into the next call; a hint that is too far forward is safe,
/// the scan just starts there.
pub fn frame_at(trace: &TelemetryTrace, virtual_time_s: f64, cursor_hint: usize) -> FrameResult {
    if trace.is_empty() {
        return FrameResult::EndOfTrace;
    }
    if trace.len() == 1 {
        // A lone sample is the whole lap until virtual time moves past it
        let only = &trace.samples()[0];
        if virtual_time_s <= only.time_s {
            return FrameResult::Frame(Frame::from_sample(only, 0));
        }
        return FrameResult::EndOfTrace;
    }

    let samples = trace.samples();
    let mut idx = cursor_hint.min(trace.last_index());
    while idx + 1 < samples.len() && samples[idx + 1].time_s < virtual_time_s {
        idx += 1;
    }
    if idx == trace.last_index() {
        return FrameResult::EndOfTrace;
    }

    let curr = &samples[idx];
    let next = &samples[idx + 1];
    let span_s = next.time_s - curr.time_s;
    // Zero-duration segments (duplicate timestamps) snap to the later
    // sample; the clamp also absorbs floating-point overshoot
    let progress = if span_s <= 0. {
        1.
    } else {
        ((virtual_time_s - curr.time_s) / span_s).clamp(0., 1.)
    };

    FrameResult::Frame(Frame {
        x: lerp(curr.x, next.x, progress),
        y: lerp(curr.y, next.y, progress),
        distance_m: lerp(curr.distance_m, next.distance_m, progress),
        speed_kmh: lerp(curr.speed_kmh, next.speed_kmh, progress),
        throttle_pct: lerp(curr.throttle_pct, next.throttle_pct, progress),
        brake: lerp(curr.brake, next.brake, progress),
        cursor: idx,
    })
}

/// Scrub path: the exact sample at `index`, no interpolation. The index
/// is clamped to the trace, so a scrub can never land out of bounds or
/// between two samples.
pub fn frame_at_index(trace: &TelemetryTrace, index: usize) -> Frame {
    let clamped = index.min(trace.last_index());
    Frame::from_sample(&trace.samples()[clamped], clamped)
}
