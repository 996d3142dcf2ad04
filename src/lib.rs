//! snapview - pan and zoom image viewer
//!
//! An image viewer widget with a minimap ("snap view"), a zoom track, pinch,
//! wheel and double tap zoom, and momentum panning. The page is reached
//! through the [`Host`](snapview_input::Host) trait: [`snapview_input::MemoryHost`]
//! for headless runs, and a `web-sys` host in the browser build.

pub mod animation;
pub mod config;
pub mod constants;
pub mod error;
pub mod fullscreen;
pub mod geometry;
pub mod state;
pub mod testing;
pub mod viewer;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::*;

pub use config::ViewerOptions;
pub use error::{Result, ViewerError};
pub use fullscreen::FullscreenViewer;
pub use snapview_input as input;
pub use state::ViewerState;
pub use viewer::{ImageSources, Viewer, ViewerElements, ViewerTarget};
