//! Viewer state.
//!
//! One [`ViewerState`] per viewer, owned by it and mutated only through the
//! viewer's request methods. Geometry is `None` until the first image has
//! loaded and been measured; the accessors turn that into
//! [`ViewerError::MissingGeometry`].

use snapview_input::{Point, Size};

use crate::constants::MIN_ZOOM;
use crate::error::{Result, ViewerError};
use crate::geometry;

/// Shared zoom, pan and layout state of one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    /// Current zoom percentage
    pub(crate) zoom: f64,
    /// The current image has finished loading
    pub(crate) loaded: bool,
    /// A pinch is in progress
    pub(crate) zooming: bool,
    pub(crate) snap_view_visible: bool,
    pub(crate) container: Option<Size>,
    /// Image size at zoom 100, fitted to the container
    pub(crate) image: Option<Size>,
    pub(crate) snap_image: Option<Size>,
    pub(crate) snap_handle: Option<Size>,
    pub(crate) zoom_track_length: f64,
    /// Image `left`/`top` inside the container
    pub(crate) image_pos: Point,
    /// Snap handle `left`/`top` inside the snap image
    pub(crate) snap_handle_pos: Point,
}

impl ViewerState {
    /// Initial state. `loaded` starts true so the sliders are live before any
    /// image is requested.
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            loaded: true,
            zooming: false,
            snap_view_visible: false,
            container: None,
            image: None,
            snap_image: None,
            snap_handle: None,
            zoom_track_length: 0.0,
            image_pos: Point::ZERO,
            snap_handle_pos: Point::ZERO,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    pub fn is_snap_view_visible(&self) -> bool {
        self.snap_view_visible
    }

    pub fn zoom_track_length(&self) -> f64 {
        self.zoom_track_length
    }

    pub fn image_pos(&self) -> Point {
        self.image_pos
    }

    pub fn snap_handle_pos(&self) -> Point {
        self.snap_handle_pos
    }

    pub fn container(&self) -> Result<Size> {
        self.container
            .ok_or_else(|| ViewerError::missing_geometry("container size"))
    }

    /// Image size at zoom 100.
    pub fn base_image(&self) -> Result<Size> {
        self.image
            .ok_or_else(|| ViewerError::missing_geometry("image size"))
    }

    pub fn snap_image(&self) -> Result<Size> {
        self.snap_image
            .ok_or_else(|| ViewerError::missing_geometry("snap image size"))
    }

    pub fn snap_handle(&self) -> Result<Size> {
        self.snap_handle
            .ok_or_else(|| ViewerError::missing_geometry("snap handle size"))
    }

    /// Image size at the current zoom.
    pub fn display_size(&self) -> Result<Size> {
        Ok(geometry::display_size(self.base_image()?, self.zoom))
    }

    /// Whether geometry has been measured.
    pub fn is_measured(&self) -> bool {
        self.container.is_some() && self.image.is_some() && self.snap_image.is_some()
    }

    /// The image can be dragged: measured, not pinching, zoomed in.
    pub fn can_pan(&self) -> bool {
        self.is_interactive() && !self.zooming && self.zoom > MIN_ZOOM
    }

    /// Snap handle and zoom track respond once an image is loaded and measured.
    pub fn is_interactive(&self) -> bool {
        self.loaded && self.is_measured()
    }
}
