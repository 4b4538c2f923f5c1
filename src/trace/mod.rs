pub mod loader;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::LapscopeError;

/// Padding applied around the track extents so the car dot and corner
/// labels never sit on the plot edge. Fraction of the larger extent.
const BOUNDS_MARGIN_PCT: f64 = 0.05;

/// One recorded telemetry point along the lap. Field names mirror the
/// collaborator's JSON records, so this doubles as the wire shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the start of the lap
    #[serde(rename = "Time")]
    pub time_s: f64,
    /// Meters traveled from the start/finish line
    #[serde(rename = "Distance")]
    pub distance_m: f64,
    /// Track-relative position
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    /// Speed in km/h
    #[serde(rename = "Speed")]
    pub speed_kmh: f64,
    /// Throttle application, 0-100
    #[serde(rename = "Throttle")]
    pub throttle_pct: f64,
    /// Brake application; some seasons report 0/1, others a percentage
    #[serde(rename = "Brake")]
    pub brake: f64,
}

/// Static corner annotation. Not part of playback state; rendered as
/// fixed markers on the charts and the track map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerMarker {
    pub number: u32,
    #[serde(rename = "Distance")]
    pub distance_m: f64,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

/// Track extents padded for rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TraceBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// An ordered lap of telemetry samples plus geometry derived once at load.
///
/// A trace is never mutated after construction; a new telemetry fetch
/// replaces the whole value. The playback engine shares it read-only.
#[derive(Clone, Debug, Default)]
pub struct TelemetryTrace {
    samples: Vec<Sample>,
    corners: Vec<CornerMarker>,
    max_distance_m: f64,
    bounds: TraceBounds,
    path: Vec<[f64; 2]>,
}

impl TelemetryTrace {
    /// Build a trace from raw samples, validating that `time_s` is
    /// ascending. The forward-scan interpolator depends on the ordering,
    /// so out-of-order input is rejected here rather than sorted away.
    pub fn new(
        samples: Vec<Sample>,
        corners: Vec<CornerMarker>,
    ) -> Result<Self, LapscopeError> {
        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].time_s < pair[0].time_s {
                return Err(LapscopeError::NonMonotonicTrace {
                    index: index + 1,
                    prev_time_s: pair[0].time_s,
                    time_s: pair[1].time_s,
                });
            }
        }

        let max_distance_m = samples
            .iter()
            .map(|s| s.distance_m)
            .fold(0., f64::max);
        let bounds = Self::padded_bounds(&samples);
        let path = samples.iter().map(|s| [s.x, s.y]).collect();

        Ok(Self {
            samples,
            corners,
            max_distance_m,
            bounds,
            path,
        })
    }

    /// An empty trace: a valid, inert state in which every playback
    /// command is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    fn padded_bounds(samples: &[Sample]) -> TraceBounds {
        let Some((min_x, max_x)) = samples.iter().map(|s| s.x).minmax().into_option() else {
            return TraceBounds::default();
        };
        let Some((min_y, max_y)) = samples.iter().map(|s| s.y).minmax().into_option() else {
            return TraceBounds::default();
        };
        let margin = (max_x - min_x).max(max_y - min_y) * BOUNDS_MARGIN_PCT;
        TraceBounds {
            min_x: min_x - margin,
            max_x: max_x + margin,
            min_y: min_y - margin,
            max_y: max_y + margin,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn corners(&self) -> &[CornerMarker] {
        &self.corners
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the final sample. Panics on an empty trace; callers gate
    /// on `is_empty` first.
    pub fn last_index(&self) -> usize {
        self.samples.len() - 1
    }

    pub fn max_distance_m(&self) -> f64 {
        self.max_distance_m
    }

    pub fn bounds(&self) -> TraceBounds {
        self.bounds
    }

    /// The lap polyline through all `(x, y)` pairs, ready for plotting.
    pub fn path(&self) -> &[[f64; 2]] {
        &self.path
    }
}
