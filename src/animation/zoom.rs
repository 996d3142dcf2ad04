use snapview_input::{Point, Rect, Size};

use super::ease_out_quart;
use crate::constants::ZOOM_TICKS;
use crate::geometry::{PanBounds, display_size, focal_offset};

/// Geometry for one zoom tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFrame {
    /// Zoom percentage at this tick
    pub zoom: f64,
    /// Image position and display size
    pub image: Rect,
    /// Whether this was the last tick
    pub finished: bool,
}

/// A fixed-length eased zoom from one percentage to another.
///
/// Every tick scales the image about `focal` relative to where it was when
/// the animation started, then clamps the result so the base rectangle stays
/// covered. The last tick lands exactly on the target.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomAnimation {
    from: f64,
    to: f64,
    focal: Point,
    start: Point,
    base: Size,
    bounds: PanBounds,
    step: u32,
}

impl ZoomAnimation {
    /// Prepare an animation. `start` is the image position at zoom `from`,
    /// `base` the zoom-100 display size.
    pub fn new(
        from: f64,
        to: f64,
        focal: Point,
        start: Point,
        base: Size,
        container: Size,
    ) -> Self {
        Self {
            from,
            to,
            focal,
            start,
            base,
            bounds: PanBounds::new(container, base),
            step: 0,
        }
    }

    /// Target zoom.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Ticks played so far.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= ZOOM_TICKS
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> ZoomFrame {
        self.step = (self.step + 1).min(ZOOM_TICKS);
        self.frame_at(self.step)
    }

    /// Jump to the last tick.
    pub fn finish(&mut self) -> ZoomFrame {
        self.step = ZOOM_TICKS;
        self.frame_at(self.step)
    }

    fn frame_at(&self, step: u32) -> ZoomFrame {
        let finished = step >= ZOOM_TICKS;
        let zoom = if finished {
            self.to
        } else {
            ease_out_quart(
                f64::from(step),
                self.from,
                self.to - self.from,
                f64::from(ZOOM_TICKS),
            )
        };
        let size = display_size(self.base, zoom);
        let pos = self
            .bounds
            .clamp(focal_offset(self.focal, self.start, zoom / self.from), size);

        log::trace!("Zoom tick {}/{}: {:.2}%", step, ZOOM_TICKS, zoom);
        ZoomFrame {
            zoom,
            image: Rect::new(pos.x, pos.y, size.w, size.h),
            finished,
        }
    }
}
