//! Double tap detection.

use web_time::Instant;

use crate::constants::{DOUBLE_TAP_DISTANCE, DOUBLE_TAP_WINDOW};
use crate::layout::Point;

/// Remembers the last tap so the next one can be matched against it.
///
/// A tap that comes too late or too far away starts a new sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleTap {
    last: Option<(Instant, Point)>,
}

impl DoubleTap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tap at `page`. Returns `true` when it completes a double tap.
    pub fn tap(&mut self, at: Instant, page: Point) -> bool {
        if let Some((prev_at, prev_page)) = self.last.take() {
            let quick = at.saturating_duration_since(prev_at) < DOUBLE_TAP_WINDOW;
            let near = (page.x - prev_page.x).abs() < DOUBLE_TAP_DISTANCE
                && (page.y - prev_page.y).abs() < DOUBLE_TAP_DISTANCE;
            if quick && near {
                return true;
            }
        }
        self.last = Some((at, page));
        false
    }

    /// Forget the pending tap.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
