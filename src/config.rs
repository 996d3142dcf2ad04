//! Viewer options.
//!
//! Options are fixed for the lifetime of a viewer. They deserialize from the
//! camelCase JSON a page would pass (`{"maxZoom": 300}`), with every field
//! optional and falling back to its documented default.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_ZOOM, DEFAULT_ZOOM_VALUE, MIN_ZOOM};
use crate::error::{Result, ViewerError};

/// Per-viewer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerOptions {
    /// Initial zoom percentage, also the target of a reset
    pub zoom_value: f64,

    /// Upper zoom bound, in percent
    pub max_zoom: f64,

    /// Recompute geometry when the window resizes
    pub refresh_on_resize: bool,

    /// Zoom with the mouse wheel
    pub zoom_on_mouse_wheel: bool,

    /// Show the snap view (minimap) while zoomed
    pub snap_view: bool,
}

fn default_zoom_value() -> f64 {
    DEFAULT_ZOOM_VALUE
}

fn default_max_zoom() -> f64 {
    DEFAULT_MAX_ZOOM
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            zoom_value: default_zoom_value(),
            max_zoom: default_max_zoom(),
            refresh_on_resize: true,
            zoom_on_mouse_wheel: true,
            snap_view: true,
        }
    }
}

impl ViewerOptions {
    /// Deserialize options from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validated()
    }

    /// Serialize the options to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Check ranges. `max_zoom` must be at least 100; `zoom_value` is
    /// clamped into `[100, max_zoom]` and rounded like every applied zoom.
    pub fn validated(mut self) -> Result<Self> {
        if !self.max_zoom.is_finite() || self.max_zoom < MIN_ZOOM {
            return Err(ViewerError::invalid_option(format!(
                "maxZoom must be at least {}, got {}",
                MIN_ZOOM, self.max_zoom
            )));
        }
        if !self.zoom_value.is_finite() {
            return Err(ViewerError::invalid_option("zoomValue must be a number"));
        }
        let clamped = self.zoom_value.max(MIN_ZOOM).round().min(self.max_zoom);
        if clamped != self.zoom_value {
            log::warn!(
                "zoomValue {} not a whole percent in [{}, {}], using {}",
                self.zoom_value,
                MIN_ZOOM,
                self.max_zoom,
                clamped
            );
            self.zoom_value = clamped;
        }
        Ok(self)
    }
}
