//! The image viewer controller.
//!
//! A [`Viewer`] attaches to one element, builds its markup through a
//! [`Host`], and from then on is driven entirely by [`HostEvent`]s passed to
//! [`Viewer::handle`]. Three [`GestureSlider`]s (image pan, snap handle,
//! zoom track) and the pinch, wheel and double tap recognizers report what
//! the user did; the viewer turns that into zoom and pan requests, runs the
//! animations and writes the resulting geometry back as inline styles.
//!
//! ```text
//! .iv-container
//! └── .iv-wrap
//!     ├── .iv-loader
//!     ├── .iv-snap-view
//!     │   ├── .iv-snap-image-wrap
//!     │   │   ├── img.iv-snap-image
//!     │   │   └── .iv-snap-handle
//!     │   └── .iv-zoom-slider
//!     │       └── .iv-zoom-handle
//!     └── .iv-image-view
//!         └── .iv-image-wrap
//!             └── img.iv-image
//! ```

mod dom;
mod interaction;
mod loading;
mod routes;

#[cfg(test)]
mod tests;

pub use dom::{ImageSources, ViewerElements, ViewerTarget};

use snapview_input::{
    DoubleTap, ElementId, EventKind, EventResponse, EventTarget, FrameId, GestureSlider, Host,
    HostEvent, PinchRecognizer, Point, Rect, TimerId, WheelZoom, px,
};

use crate::animation::{Momentum, MomentumSampler, ZoomAnimation, ZoomFrame};
use crate::config::ViewerOptions;
use crate::constants::{MIN_ZOOM, SNAP_VIEW_HIDE_DELAY, VIEWER_MARKER, VIEWER_MARKER_VALUE};
use crate::error::{Result, ViewerError};
use crate::geometry;
use crate::state::ViewerState;
use routes::{Handles, Route, Routes};

/// Pointer bookkeeping for the drag in progress.
#[derive(Debug, Default, Clone, Copy)]
struct DragState {
    /// Snap handle position when the pan started
    pan_origin: Point,
    /// Last reported image drag delta
    last_delta: Option<Point>,
    /// Zoom track page x, measured at press
    track_left: f64,
    /// Zoom handle width, measured at press
    handle_width: f64,
}

/// Image loads awaiting completion.
#[derive(Debug, Default, Clone, Copy)]
struct PendingLoads {
    image: Option<ElementId>,
    hi_res: Option<ElementId>,
}

/// Interactive pan/zoom image viewer bound to one element.
pub struct Viewer<H: Host> {
    host: H,
    options: ViewerOptions,
    elements: ViewerElements,
    sources: ImageSources,
    state: ViewerState,
    image_slider: GestureSlider<ViewerState>,
    snap_slider: GestureSlider<ViewerState>,
    zoom_slider: GestureSlider<ViewerState>,
    pinch: PinchRecognizer,
    wheel: WheelZoom,
    taps: DoubleTap,
    routes: Routes,
    handles: Handles,
    zoom_animation: Option<ZoomAnimation>,
    momentum: Option<Momentum>,
    sampler: Option<MomentumSampler>,
    drag: DragState,
    pending: PendingLoads,
    destroyed: bool,
}

impl<H: Host> std::fmt::Debug for Viewer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("options", &self.options)
            .field("elements", &self.elements)
            .field("sources", &self.sources)
            .field("state", &self.state)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Viewer<H> {
    /// Attach a viewer to `target`.
    ///
    /// Fails if the target does not exist or already hosts a viewer. When the
    /// target names an image source it starts loading right away.
    pub fn new(
        mut host: H,
        target: impl Into<ViewerTarget>,
        options: ViewerOptions,
    ) -> Result<Self> {
        let options = options.validated()?;
        let (elements, sources) = dom::attach(&mut host, target.into())?;

        let can_pan: fn(&ViewerState) -> bool = ViewerState::can_pan;
        let interactive: fn(&ViewerState) -> bool = ViewerState::is_interactive;
        let mut image_slider = GestureSlider::new(elements.image_wrap, can_pan);
        let mut snap_slider = GestureSlider::new(elements.snap_handle, interactive);
        let mut zoom_slider = GestureSlider::new(elements.zoom_slider, interactive);
        image_slider.start(&mut host);
        snap_slider.start(&mut host);
        zoom_slider.start(&mut host);

        let mut routes = Routes::default();
        let image_wrap = EventTarget::Element(elements.image_wrap);
        let snap_view = EventTarget::Element(elements.snap_view);
        routes.bind(&mut host, image_wrap, &[EventKind::TouchStart], Route::PinchStart);
        routes.bind(&mut host, image_wrap, &[EventKind::Wheel], Route::Wheel);
        routes.bind(&mut host, image_wrap, &[EventKind::Click], Route::Tap);
        routes.bind(
            &mut host,
            image_wrap,
            &[EventKind::TouchMove, EventKind::MouseMove],
            Route::PointerOverImage,
        );
        routes.bind(
            &mut host,
            snap_view,
            &[EventKind::MouseEnter, EventKind::TouchStart],
            Route::SnapViewEnter,
        );
        routes.bind(
            &mut host,
            snap_view,
            &[EventKind::MouseLeave, EventKind::TouchEnd],
            Route::SnapViewLeave,
        );
        if options.refresh_on_resize {
            routes.bind(&mut host, EventTarget::Window, &[EventKind::Resize], Route::WindowResize);
        }

        let mut viewer = Self {
            host,
            state: ViewerState::new(options.zoom_value),
            options,
            elements,
            sources,
            image_slider,
            snap_slider,
            zoom_slider,
            pinch: PinchRecognizer::new(),
            wheel: WheelZoom::new(),
            taps: DoubleTap::new(),
            routes,
            handles: Handles::default(),
            zoom_animation: None,
            momentum: None,
            sampler: None,
            drag: DragState::default(),
            pending: PendingLoads::default(),
            destroyed: false,
        };

        if viewer.sources.src.is_some() {
            viewer.load_images();
        }

        let dom_element = viewer.elements.dom_element;
        viewer
            .host
            .set_attribute(dom_element, VIEWER_MARKER, VIEWER_MARKER_VALUE);
        log::info!(
            "Viewer attached to {:?} (image mode: {})",
            dom_element,
            viewer.elements.is_image_mode()
        );
        Ok(viewer)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn elements(&self) -> &ViewerElements {
        &self.elements
    }

    pub fn sources(&self) -> &ImageSources {
        &self.sources
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether a zoom or momentum animation is running.
    pub fn is_animating(&self) -> bool {
        self.zoom_animation.is_some() || self.momentum.is_some()
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            return Err(ViewerError::Destroyed);
        }
        Ok(())
    }

    /// Dispatch one host event. Events for unknown handles are ignored, as
    /// is everything after [`destroy`](Self::destroy).
    pub fn handle(&mut self, event: HostEvent) -> Result<EventResponse> {
        if self.destroyed {
            return Ok(EventResponse::Ignored);
        }
        match event {
            HostEvent::Dom { listener, event } => self.on_dom(listener, &event),
            HostEvent::Frame(frame) => self.on_frame(frame),
            HostEvent::Timer(timer) => self.on_timer(timer),
            HostEvent::Loaded(element) => self.on_loaded(element),
        }
    }

    fn on_frame(&mut self, frame: FrameId) -> Result<EventResponse> {
        if self.handles.take_zoom_frame(frame) {
            self.zoom_tick()?;
            return Ok(EventResponse::Handled);
        }
        if self.handles.take_momentum_frame(frame) {
            self.momentum_tick()?;
            return Ok(EventResponse::Handled);
        }
        Ok(EventResponse::Ignored)
    }

    fn on_timer(&mut self, timer: TimerId) -> Result<EventResponse> {
        if self.handles.is_sampler(timer) {
            if let Some(sampler) = self.sampler.as_mut() {
                sampler.sample();
            }
            return Ok(EventResponse::Handled);
        }
        if self.handles.take_snap_view_timeout(timer) {
            self.hide_snap_view_now();
            return Ok(EventResponse::Handled);
        }
        Ok(EventResponse::Ignored)
    }

    /// Zoom to `percent`, keeping `focal` (container coordinates, default the
    /// container center) fixed. Animated.
    pub fn zoom(&mut self, percent: f64, focal: Option<Point>) -> Result<()> {
        self.ensure_alive()?;
        self.request_zoom(percent, focal)
    }

    /// Zoom back to the configured zoom value.
    pub fn reset_zoom(&mut self, animate: bool) -> Result<()> {
        self.ensure_alive()?;
        self.zoom_to(self.options.zoom_value, None, animate)
    }

    /// Re-measure and reset the zoom, e.g. after a layout change.
    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.calculate_dimensions()?;
        self.zoom_to(self.options.zoom_value, None, true)
    }

    /// Show the snap view. With `no_timeout` it stays until hidden.
    pub fn show_snap_view(&mut self, no_timeout: bool) -> Result<()> {
        self.ensure_alive()?;
        self.show_snap_view_now(no_timeout);
        Ok(())
    }

    pub fn hide_snap_view(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.hide_snap_view_now();
        Ok(())
    }

    /// Animated zoom request. Every zoom source goes through here.
    pub(crate) fn request_zoom(&mut self, percent: f64, focal: Option<Point>) -> Result<()> {
        self.zoom_to(percent, focal, true)
    }

    fn zoom_to(&mut self, percent: f64, focal: Option<Point>, animate: bool) -> Result<()> {
        if self.elements.image.is_none() || !self.state.loaded || !self.state.is_measured() {
            log::warn!("Zoom to {} ignored: no image loaded", percent);
            return Ok(());
        }
        let container = self.state.container()?;
        let base = self.state.base_image()?;

        let target = geometry::clamp_zoom(percent, self.options.max_zoom);
        let focal = focal.unwrap_or(Point::new(container.w / 2.0, container.h / 2.0));
        log::debug!(
            "Zoom {:.1}% -> {}% about ({:.1}, {:.1})",
            self.state.zoom,
            target,
            focal.x,
            focal.y
        );

        self.stop_animations();
        let mut animation = ZoomAnimation::new(
            self.state.zoom,
            target,
            focal,
            self.state.image_pos,
            base,
            container,
        );
        if animate {
            self.zoom_animation = Some(animation);
            self.zoom_tick()
        } else {
            let frame = animation.finish();
            self.apply_zoom_frame(frame)
        }
    }

    fn zoom_tick(&mut self) -> Result<()> {
        let Some(animation) = self.zoom_animation.as_mut() else {
            return Ok(());
        };
        let frame = animation.tick();
        if frame.finished {
            self.zoom_animation = None;
        } else {
            self.handles.zoom_frame = Some(self.host.request_frame());
        }
        self.apply_zoom_frame(frame)
    }

    fn apply_zoom_frame(&mut self, frame: ZoomFrame) -> Result<()> {
        let Some(image) = self.elements.image else {
            return Ok(());
        };
        let rect = frame.image;
        self.host.set_style(
            image,
            &[
                ("height", px(rect.h)),
                ("width", px(rect.w)),
                ("left", px(rect.left)),
                ("top", px(rect.top)),
            ],
        );
        self.state.zoom = frame.zoom;
        self.state.image_pos = rect.origin();
        self.resize_snap_handle(rect)?;

        let handle_left = geometry::zoom_handle_left(
            frame.zoom,
            self.options.max_zoom,
            self.state.zoom_track_length,
        );
        self.host
            .set_style(self.elements.zoom_handle, &[("left", px(handle_left))]);
        Ok(())
    }

    fn resize_snap_handle(&mut self, image: Rect) -> Result<()> {
        let container = self.state.container()?;
        let snap_image = self.state.snap_image()?;
        let handle = geometry::snap_handle_box(image.size(), image.origin(), container, snap_image);
        self.host.set_style(
            self.elements.snap_handle,
            &[
                ("top", px(handle.top)),
                ("left", px(handle.left)),
                ("width", px(handle.w)),
                ("height", px(handle.h)),
            ],
        );
        self.state.snap_handle = Some(handle.size());
        self.state.snap_handle_pos = handle.origin();
        Ok(())
    }

    /// Move the snap handle by `handle_delta` from where the current drag
    /// started, and the image with it. Every pan source goes through here.
    pub(crate) fn request_pan(&mut self, handle_delta: Point) -> Result<()> {
        if self.state.snap_handle.is_none() {
            return Ok(());
        }
        let handle = self.state.snap_handle()?;
        let snap_image = self.state.snap_image()?;
        let display = self.state.display_size()?;

        let pos =
            geometry::drag_snap_handle(self.drag.pan_origin, handle_delta, handle, snap_image);
        let image_pos = geometry::image_offset_for_handle(pos, display, snap_image);

        self.host.set_style(
            self.elements.snap_handle,
            &[("left", px(pos.x)), ("top", px(pos.y))],
        );
        if let Some(image) = self.elements.image {
            self.host.set_style(
                image,
                &[("left", px(image_pos.x)), ("top", px(image_pos.y))],
            );
        }
        self.state.snap_handle_pos = pos;
        self.state.image_pos = image_pos;
        Ok(())
    }

    /// Cancel the zoom and momentum animations and the sampler.
    fn stop_animations(&mut self) {
        self.handles.clear_frames(&mut self.host);
        self.zoom_animation = None;
        self.momentum = None;
        self.sampler = None;
    }

    fn show_snap_view_now(&mut self, no_timeout: bool) {
        if !self.options.snap_view {
            return;
        }
        let state = &self.state;
        if state.snap_view_visible || state.zoom <= MIN_ZOOM || !state.is_interactive() {
            return;
        }

        self.handles.clear_snap_view_timeout(&mut self.host);
        self.state.snap_view_visible = true;
        self.host.set_style(
            self.elements.snap_view,
            &[("opacity", "1".to_string()), ("pointerEvents", "inherit".to_string())],
        );
        if !no_timeout {
            self.handles.snap_view_timeout = Some(self.host.set_timeout(SNAP_VIEW_HIDE_DELAY));
        }
    }

    fn hide_snap_view_now(&mut self) {
        self.host.set_style(
            self.elements.snap_view,
            &[("opacity", "0".to_string()), ("pointerEvents", "none".to_string())],
        );
        self.state.snap_view_visible = false;
    }

    /// Tear the viewer down: release every listener, frame and timer, remove
    /// the markup and restore the target element. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.image_slider.destroy(&mut self.host);
        self.snap_slider.destroy(&mut self.host);
        self.zoom_slider.destroy(&mut self.host);
        self.pinch.release(&mut self.host);
        self.routes.release_all(&mut self.host);
        self.stop_animations();
        self.handles.release_all(&mut self.host);
        self.pending = PendingLoads::default();
        self.wheel.reset();
        self.taps.reset();

        dom::detach(&mut self.host, &self.elements);
        self.elements.image = None;
        self.elements.snap_image = None;
        self.destroyed = true;
        log::info!("Viewer on {:?} destroyed", self.elements.dom_element);
    }
}
