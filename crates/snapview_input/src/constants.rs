//! Gesture tuning constants shared by the recognizers.

use std::time::Duration;

// =============================================================================
// Wheel
// =============================================================================

/// Percent of the current zoom added per wheel notch
pub const WHEEL_ZOOM_STEP: f64 = 15.0;

/// Accumulated out-of-range wheel movement after which notches are ignored
pub const WHEEL_REJECT_THRESHOLD: f64 = 5.0;

// =============================================================================
// Double tap
// =============================================================================

/// Maximum time between the two taps
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(500);

/// Maximum distance between the two taps on either axis, in pixels
pub const DOUBLE_TAP_DISTANCE: f64 = 50.0;
