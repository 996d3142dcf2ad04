//! Global constants for snapview

use std::time::Duration;

// =============================================================================
// Zoom
// =============================================================================

/// Lowest zoom percentage; the image exactly fits the container
pub const MIN_ZOOM: f64 = 100.0;

/// Default initial (and reset) zoom percentage
pub const DEFAULT_ZOOM_VALUE: f64 = 100.0;

/// Default upper zoom bound
pub const DEFAULT_MAX_ZOOM: f64 = 500.0;

/// Zoom a double tap jumps to from the reset zoom
pub const DOUBLE_TAP_ZOOM: f64 = 200.0;

/// Frames in one eased zoom animation
pub const ZOOM_TICKS: u32 = 16;

// =============================================================================
// Momentum
// =============================================================================

/// Frames in one momentum animation
pub const MOMENTUM_TICKS: u32 = 60;

/// Pointer travel between the last two samples needed to launch momentum, in pixels
pub const MOMENTUM_THRESHOLD: f64 = 30.0;

/// Pointer sampling period while panning
pub const MOMENTUM_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

// =============================================================================
// Snap view
// =============================================================================

/// How long the snap view stays up after the last interaction
pub const SNAP_VIEW_HIDE_DELAY: Duration = Duration::from_millis(1500);

// =============================================================================
// Markup
// =============================================================================

/// Attribute marking an element that already hosts a viewer
pub const VIEWER_MARKER: &str = "data-image-viewer";

/// Value stored in [`VIEWER_MARKER`]
pub const VIEWER_MARKER_VALUE: &str = "enabled";

/// CSS class names of the generated markup
pub mod class {
    pub const CONTAINER: &str = "iv-container";
    pub const IMAGE_MODE: &str = "iv-image-mode";
    pub const WRAP: &str = "iv-wrap";
    pub const LOADER: &str = "iv-loader";
    pub const SNAP_VIEW: &str = "iv-snap-view";
    pub const SNAP_IMAGE_WRAP: &str = "iv-snap-image-wrap";
    pub const SNAP_HANDLE: &str = "iv-snap-handle";
    pub const SNAP_IMAGE: &str = "iv-snap-image";
    pub const ZOOM_SLIDER: &str = "iv-zoom-slider";
    pub const ZOOM_HANDLE: &str = "iv-zoom-handle";
    pub const IMAGE_VIEW: &str = "iv-image-view";
    pub const IMAGE_WRAP: &str = "iv-image-wrap";
    pub const SMALL_IMAGE: &str = "iv-image iv-small-image";
    pub const LARGE_IMAGE: &str = "iv-image iv-large-image";
    pub const FULLSCREEN: &str = "iv-fullscreen";
    pub const FULLSCREEN_CONTAINER: &str = "iv-fullscreen-container";
    pub const FULLSCREEN_CLOSE: &str = "iv-fullscreen-close";
}
