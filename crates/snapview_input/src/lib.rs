//! snapview_input - host abstraction and gesture recognition for snapview
//!
//! This crate knows nothing about zoom geometry. It provides the [`Host`]
//! seam the viewer talks to the DOM through, an in-memory [`MemoryHost`]
//! for tests and native runs, and the gesture recognizers: the generic
//! [`GestureSlider`], [`PinchRecognizer`], [`WheelZoom`] and [`DoubleTap`].

pub mod constants;
mod event;
mod host;
mod layout;
mod memory;
mod pinch;
mod slider;
mod tap;
mod wheel;

pub use event::{DomEvent, EventKind, EventResponse, HostEvent, PointerFamily};
pub use host::{
    must_query, px, ElementId, ElementSpec, EventTarget, FrameId, Host, HostError, ListenerId,
    TimerId,
};
pub use layout::{Point, Rect, Size};
pub use memory::MemoryHost;
pub use pinch::{two_finger_geometry, PinchEvent, PinchRecognizer, PinchSession};
pub use slider::{GestureSession, GestureSlider, SlideEvent};
pub use tap::DoubleTap;
pub use wheel::{WheelStep, WheelZoom};

pub use web_time::Instant;
