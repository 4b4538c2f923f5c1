/// Maps a wall-clock timestamp onto virtual time: seconds elapsed into
/// the trace, scaled by the playback rate.
///
/// Wall time is plain `f64` seconds supplied by the caller so the origin
/// solve stays exact real arithmetic and the clock needs no environment.
#[derive(Clone, Copy, Debug)]
pub struct VirtualClock {
    origin_s: f64,
    rate: f64,
}

impl VirtualClock {
    /// Start a clock whose virtual time reads `virtual_time_s` at `now_s`.
    pub fn start(virtual_time_s: f64, rate: f64, now_s: f64) -> Self {
        Self {
            origin_s: now_s - virtual_time_s / rate,
            rate,
        }
    }

    /// Virtual time at wall-clock `now_s`. Pure; never blocks.
    pub fn virtual_time(&self, now_s: f64) -> f64 {
        (now_s - self.origin_s) * self.rate
    }

    /// Change the playback rate without moving the playhead.
    ///
    /// Resetting the origin to `now_s` would teleport virtual time back to
    /// zero. Instead solve for the origin that keeps the instantaneous
    /// virtual time unchanged: `origin = now - v / new_rate` where `v` is
    /// the virtual time under the old rate.
    pub fn change_rate(&mut self, new_rate: f64, now_s: f64) {
        let v = self.virtual_time(now_s);
        self.origin_s = now_s - v / new_rate;
        self.rate = new_rate;
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}
