use snapview_input::Point;

use super::ease_out_quart;
use crate::constants::{MOMENTUM_THRESHOLD, MOMENTUM_TICKS};

/// Rolling two-slot window of pointer positions, filled by a periodic timer
/// while a pan is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumSampler {
    window: [Point; 2],
    latest: Option<Point>,
}

impl MomentumSampler {
    /// Start sampling a gesture that began at `start`. Both slots hold it.
    pub fn new(start: Point) -> Self {
        Self {
            window: [start, start],
            latest: None,
        }
    }

    /// Record the pointer's latest position.
    pub fn track(&mut self, current: Point) {
        self.latest = Some(current);
    }

    /// Timer tick: shift the latest position into the window.
    pub fn sample(&mut self) {
        if let Some(latest) = self.latest {
            self.window = [self.window[1], latest];
        }
    }

    /// Whether the pointer moved at all since the gesture began.
    pub fn has_moved(&self) -> bool {
        self.latest.is_some()
    }

    /// Difference between the two samples.
    pub fn velocity(&self) -> Point {
        self.window[1] - self.window[0]
    }
}

/// One momentum tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumFrame {
    /// Total pointer-space displacement from the gesture start
    pub offset: Point,
    pub finished: bool,
}

/// Inertial continuation of a pan after release.
///
/// Each tick adds an increment that starts near a third of the sampled
/// velocity and decays to zero along a quartic ease-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    velocity: Point,
    offset: Point,
    step: u32,
}

impl Momentum {
    /// Launch from the sampler when either axis moved more than the
    /// threshold between the last two samples. `drag_delta` is where the
    /// drag left off, relative to its start.
    pub fn launch(sampler: &MomentumSampler, drag_delta: Point) -> Option<Self> {
        if !sampler.has_moved() {
            return None;
        }
        let velocity = sampler.velocity();
        if velocity.x.abs() <= MOMENTUM_THRESHOLD && velocity.y.abs() <= MOMENTUM_THRESHOLD {
            log::trace!("No momentum: velocity ({:.1}, {:.1})", velocity.x, velocity.y);
            return None;
        }
        log::debug!("Momentum launched: velocity ({:.1}, {:.1})", velocity.x, velocity.y);
        Some(Self {
            velocity,
            offset: drag_delta,
            step: 0,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.step >= MOMENTUM_TICKS
    }

    /// Current displacement.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> MomentumFrame {
        if !self.is_finished() {
            self.step += 1;
            let t = f64::from(self.step);
            let d = f64::from(MOMENTUM_TICKS);
            let vx = self.velocity.x / 3.0;
            let vy = self.velocity.y / 3.0;
            self.offset = self
                .offset
                .offset(ease_out_quart(t, vx, -vx, d), ease_out_quart(t, vy, -vy, d));
        }
        MomentumFrame {
            offset: self.offset,
            finished: self.is_finished(),
        }
    }
}
