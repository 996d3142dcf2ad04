//! Viewer geometry.
//!
//! Pure functions mapping container, image and snap-view measurements to
//! CSS pixel positions. Nothing here touches the host or viewer state.
//!
//! Coordinates follow the markup: the image is absolutely positioned inside
//! the container with `left`/`top`, the snap handle inside the snap image.

use snapview_input::{Point, Rect, Size};

use crate::constants::MIN_ZOOM;

/// Fit an image of `natural` size inside `container`, preserving aspect ratio.
///
/// Landscape images in a portrait (or square) container, and images whose
/// height-fitted width would overflow, are fitted to the container width.
/// Everything else is fitted to the container height.
pub fn fit_image_to_container(natural: Size, container: Size) -> Size {
    let ratio = natural.w / natural.h;
    let width = if (natural.w > natural.h && container.h >= container.w)
        || ratio * container.h > container.w
    {
        container.w
    } else {
        ratio * container.h
    };
    Size::new(width, width / ratio)
}

/// Size of the snap image: the longer side of `image` spans the snap view.
pub fn snap_image_size(image: Size, snap_view: Size) -> Size {
    let w = if image.w > image.h {
        snap_view.w
    } else {
        image.w * snap_view.h / image.h
    };
    let h = if image.h > image.w {
        snap_view.h
    } else {
        image.h * snap_view.w / image.w
    };
    Size::new(w, h)
}

/// Image display size at `zoom` percent.
pub fn display_size(base: Size, zoom: f64) -> Size {
    base.scale(zoom / 100.0)
}

/// Top-left position that centers `image` in `container`.
pub fn centered(image: Size, container: Size) -> Point {
    Point::new((container.w - image.w) / 2.0, (container.h - image.h) / 2.0)
}

/// The visible viewport of the displayed image, mapped onto the snap image.
///
/// The handle shrinks as the image grows.
pub fn snap_handle_box(display: Size, image_pos: Point, container: Size, snap_image: Size) -> Rect {
    Rect::new(
        -image_pos.x * snap_image.w / display.w,
        -image_pos.y * snap_image.h / display.h,
        container.w * snap_image.w / display.w,
        container.h * snap_image.h / display.h,
    )
}

/// Bounds the image must keep covering: the rectangle the image occupies at
/// zoom 100, centered in the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PanBounds {
    /// Bounds for an image whose zoom-100 size is `base`.
    pub fn new(container: Size, base: Size) -> Self {
        let origin = centered(base, container);
        Self {
            left: origin.x,
            top: origin.y,
            right: container.w - origin.x,
            bottom: container.h - origin.y,
        }
    }

    /// Clamp an image at `pos` with size `image` so it covers the bounds.
    ///
    /// The left/top edge may not move right of (below) the base edge, and
    /// the right/bottom edge may not move left of (above) it.
    pub fn clamp(&self, pos: Point, image: Size) -> Point {
        let mut left = pos.x.min(self.left);
        let mut top = pos.y.min(self.top);
        if left + image.w < self.right {
            left = self.right - image.w;
        }
        if top + image.h < self.bottom {
            top = self.bottom - image.h;
        }
        Point::new(left, top)
    }

    /// Whether an image at `pos` with size `image` covers the bounds.
    pub fn is_covered_by(&self, pos: Point, image: Size, tolerance: f64) -> bool {
        pos.x <= self.left + tolerance
            && pos.y <= self.top + tolerance
            && pos.x + image.w >= self.right - tolerance
            && pos.y + image.h >= self.bottom - tolerance
    }
}

/// New image position that keeps `focal` (container coordinates) fixed when
/// the image scales by `ratio` from `current`.
pub fn focal_offset(focal: Point, current: Point, ratio: f64) -> Point {
    Point::new(
        -((focal.x - current.x) * ratio - focal.x),
        -((focal.y - current.y) * ratio - focal.y),
    )
}

/// Clamp a requested zoom into `[100, max_zoom]`, rounding to a whole percent.
pub fn clamp_zoom(requested: f64, max_zoom: f64) -> f64 {
    requested.max(MIN_ZOOM).round().min(max_zoom)
}

/// Zoom handle `left` on a track of `track_length` pixels.
///
/// Zero when the zoom range is empty or the track has no length.
pub fn zoom_handle_left(zoom: f64, max_zoom: f64, track_length: f64) -> f64 {
    let range = max_zoom - MIN_ZOOM;
    if range <= 0.0 || track_length <= 0.0 {
        return 0.0;
    }
    (zoom - MIN_ZOOM) * track_length / range
}

/// Zoom for a pointer at `page_x` over a zoom track.
///
/// The handle center follows the pointer. `track_left` is the track's page
/// x; the result maps `[0, track_length]` linearly onto `[100, max_zoom]`.
/// `None` when the track has no length.
pub fn zoom_from_track(
    page_x: f64,
    track_left: f64,
    handle_width: f64,
    track_length: f64,
    max_zoom: f64,
) -> Option<f64> {
    if track_length <= 0.0 {
        return None;
    }
    let left = (page_x - track_left - handle_width / 2.0).clamp(0.0, track_length);
    Some(MIN_ZOOM + (max_zoom - MIN_ZOOM) * left / track_length)
}

/// Snap handle position after dragging by `delta` from `start`.
///
/// The handle stays inside the snap image, except that a handle already
/// outside at drag start may stay where it was.
pub fn drag_snap_handle(start: Point, delta: Point, handle: Size, snap_image: Size) -> Point {
    let max_left = (snap_image.w - handle.w).max(start.x);
    let max_top = (snap_image.h - handle.h).max(start.y);
    let min_left = start.x.min(0.0);
    let min_top = start.y.min(0.0);
    Point::new(
        (start.x + delta.x).clamp(min_left, max_left),
        (start.y + delta.y).clamp(min_top, max_top),
    )
}

/// Image position that corresponds to a snap handle at `handle_pos`.
pub fn image_offset_for_handle(handle_pos: Point, display: Size, snap_image: Size) -> Point {
    Point::new(
        -handle_pos.x * display.w / snap_image.w,
        -handle_pos.y * display.h / snap_image.h,
    )
}

/// Snap handle movement equivalent to moving the image by `image_delta`.
///
/// The handle moves opposite to the image, scaled down to the snap image.
pub fn handle_delta_for_image_delta(image_delta: Point, display: Size, snap_image: Size) -> Point {
    Point::new(
        -image_delta.x * snap_image.w / display.w,
        -image_delta.y * snap_image.h / display.h,
    )
}
