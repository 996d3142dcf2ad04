//! Error types for viewer operations.

use snapview_input::HostError;
use thiserror::Error;

/// Errors raised by [`Viewer`](crate::Viewer) and [`FullscreenViewer`](crate::FullscreenViewer).
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The target selector matched nothing
    #[error("Dom element \"{selector}\" not found")]
    ElementNotFound {
        /// Selector that was looked up
        selector: String,
    },

    /// The target already hosts a viewer
    #[error("An image viewer is already being initiated on the element")]
    AlreadyAttached,

    /// A part of the generated markup is missing
    #[error("Missing markup: {0}")]
    MissingElement(#[from] HostError),

    /// Geometry was needed before the image was measured
    #[error("Missing size info in state: {what}")]
    MissingGeometry {
        /// Which measurement was absent
        what: &'static str,
    },

    /// An option value is out of range
    #[error("Invalid option: {message}")]
    InvalidOption {
        /// Description of the problem
        message: String,
    },

    /// Options JSON could not be parsed
    #[error("Options JSON error: {0}")]
    Options(#[from] serde_json::Error),

    /// The viewer was destroyed
    #[error("The viewer has been destroyed")]
    Destroyed,
}

impl ViewerError {
    /// Create a missing geometry error.
    pub fn missing_geometry(what: &'static str) -> Self {
        Self::MissingGeometry { what }
    }

    /// Create an invalid option error.
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
