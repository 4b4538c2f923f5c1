pub(crate) mod config;
pub mod viewer;

use egui::Color32;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);

// Channel colors, matched to the charts users already know from the
// web dashboard this viewer replaces
pub(crate) const SPEED_COLOR: Color32 = Color32::from_rgb(239, 68, 68);
pub(crate) const THROTTLE_COLOR: Color32 = Color32::from_rgb(16, 185, 129);
pub(crate) const BRAKE_COLOR: Color32 = Color32::from_rgb(245, 158, 11);
pub(crate) const TRACK_COLOR: Color32 = Color32::from_rgb(156, 163, 175);
pub(crate) const CORNER_COLOR: Color32 = Color32::from_rgb(107, 114, 128);

pub(crate) const MARKER_RADIUS: f32 = 5.;
pub(crate) const CAR_DOT_RADIUS: f32 = 7.;

pub(crate) const RATE_OPTIONS: [f64; 5] = [0.25, 0.5, 1., 2., 4.];
