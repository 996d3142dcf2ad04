//! Mouse wheel zoom stepping.
//!
//! Each notch multiplies the zoom by `1 ± 15%`. Notches that would leave the
//! zoom range are counted; once more than [`WHEEL_REJECT_THRESHOLD`] of them
//! pile up the wheel stops producing zoom steps until a notch lands back in
//! range. This keeps a spinning wheel from fighting the range clamp.

use crate::constants::{WHEEL_REJECT_THRESHOLD, WHEEL_ZOOM_STEP};

/// Outcome of one wheel notch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelStep {
    /// Zoom to this (unclamped) percentage.
    Zoom(f64),
    /// Too much out-of-range movement; do nothing.
    Rejected,
}

/// Wheel zoom state carried between notches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelZoom {
    changed_delta: f64,
}

impl WheelZoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated out-of-range movement.
    pub fn rejections(&self) -> f64 {
        self.changed_delta
    }

    /// Process one wheel event with raw `delta` (positive zooms in).
    pub fn step(&mut self, delta: f64, zoom: f64, max_zoom: f64) -> WheelStep {
        let delta = delta.clamp(-1.0, 1.0);
        let new_zoom = zoom * (100.0 + delta * WHEEL_ZOOM_STEP) / 100.0;

        if !(100.0..=max_zoom).contains(&new_zoom) {
            self.changed_delta += delta.abs();
        } else {
            self.changed_delta = 0.0;
        }

        if self.changed_delta > WHEEL_REJECT_THRESHOLD {
            log::trace!("Wheel notch rejected ({:.0} out of range)", self.changed_delta);
            return WheelStep::Rejected;
        }
        WheelStep::Zoom(new_zoom)
    }

    /// Forget accumulated rejections.
    pub fn reset(&mut self) {
        self.changed_delta = 0.0;
    }
}
