//! Time-based viewer animations.
//!
//! Both animations are plain state machines advanced one tick per host
//! frame. They compute geometry; the viewer applies it.

mod easing;
mod momentum;
mod zoom;

pub use easing::ease_out_quart;
pub use momentum::{Momentum, MomentumFrame, MomentumSampler};
pub use zoom::{ZoomAnimation, ZoomFrame};
