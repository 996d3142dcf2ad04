//! Headless driving of viewers over [`MemoryHost`].
//!
//! [`Driver`] plays the browser: it lays out a [`Scene`], bubbles DOM events
//! to the listeners a viewer subscribed, pumps animation frames and moves
//! virtual time forward so timers fire. Used by the tests and the demo binary.

use std::time::Duration;

use snapview_input::{
    DomEvent, ElementId, EventKind, EventResponse, EventTarget, HostEvent, MemoryHost, Point, Rect,
    Size,
};

use crate::config::ViewerOptions;
use crate::error::Result;
use crate::fullscreen::FullscreenViewer;
use crate::viewer::{Viewer, ViewerElements, ViewerTarget};

/// Time between two animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Frame rounds after which [`Driver::run_frames`] gives up.
const MAX_FRAME_ROUNDS: usize = 10_000;

/// Sizes the page reports to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub container: Rect,
    /// Client size of the snap view pane
    pub snap_view: Size,
    pub zoom_handle_width: f64,
    /// Natural sizes of the images the page can load
    pub images: Vec<(String, Size)>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            container: Rect::new(0.0, 0.0, 400.0, 300.0),
            snap_view: Size::new(160.0, 120.0),
            zoom_handle_width: 20.0,
            images: vec![
                ("photo.jpg".to_string(), Size::new(800.0, 600.0)),
                ("photo-hd.jpg".to_string(), Size::new(3200.0, 2400.0)),
                ("tall.jpg".to_string(), Size::new(300.0, 900.0)),
            ],
        }
    }
}

impl Scene {
    fn apply(&self, host: &mut MemoryHost, elements: &ViewerElements) {
        for (src, size) in &self.images {
            host.register_image(src, *size);
        }
        host.set_size(elements.container, self.container.size());
        host.set_rect(elements.container, self.container);
        host.set_client_size(elements.snap_view, self.snap_view);
        host.set_offset_width(elements.zoom_handle, self.zoom_handle_width);
        host.set_size(
            elements.zoom_handle,
            Size::new(self.zoom_handle_width, self.zoom_handle_width),
        );
        host.set_rect(elements.zoom_slider, self.zoom_track());
    }

    /// Page rect of the zoom track: under the snap view, which sits 10px
    /// into the container's corner.
    pub fn zoom_track(&self) -> Rect {
        Rect::new(
            self.container.left + 10.0,
            self.container.top + 10.0 + self.snap_view.h,
            self.snap_view.w,
            self.zoom_handle_width,
        )
    }
}

/// Something the driver can feed host events to.
pub trait Dispatch {
    fn viewer(&self) -> &Viewer<MemoryHost>;
    fn host(&self) -> &MemoryHost;
    fn host_mut(&mut self) -> &mut MemoryHost;
    fn dispatch(&mut self, event: HostEvent) -> Result<EventResponse>;
}

impl Dispatch for Viewer<MemoryHost> {
    fn viewer(&self) -> &Viewer<MemoryHost> {
        self
    }

    fn host(&self) -> &MemoryHost {
        Viewer::host(self)
    }

    fn host_mut(&mut self) -> &mut MemoryHost {
        Viewer::host_mut(self)
    }

    fn dispatch(&mut self, event: HostEvent) -> Result<EventResponse> {
        self.handle(event)
    }
}

impl Dispatch for FullscreenViewer<MemoryHost> {
    fn viewer(&self) -> &Viewer<MemoryHost> {
        FullscreenViewer::viewer(self)
    }

    fn host(&self) -> &MemoryHost {
        FullscreenViewer::viewer(self).host()
    }

    fn host_mut(&mut self) -> &mut MemoryHost {
        self.viewer_mut().host_mut()
    }

    fn dispatch(&mut self, event: HostEvent) -> Result<EventResponse> {
        self.handle(event)
    }
}

/// Plays the browser for one controller.
#[derive(Debug)]
pub struct Driver<C: Dispatch = Viewer<MemoryHost>> {
    controller: C,
    scene: Scene,
}

impl Driver<Viewer<MemoryHost>> {
    /// A viewer on a `div#viewer` laid out per `scene`. Nothing is loaded.
    pub fn new(scene: Scene, options: ViewerOptions) -> Result<Self> {
        let mut host = MemoryHost::new();
        for (src, size) in &scene.images {
            host.register_image(src, *size);
        }
        let target = host.add_element("div", Some("viewer"), scene.container.size());
        Self::attach(host, target, scene, options)
    }

    /// A viewer on an existing element of `host`.
    pub fn attach(
        host: MemoryHost,
        target: impl Into<ViewerTarget>,
        scene: Scene,
        options: ViewerOptions,
    ) -> Result<Self> {
        let mut viewer = Viewer::new(host, target, options)?;
        let elements = viewer.elements().clone();
        scene.apply(viewer.host_mut(), &elements);
        Ok(Self {
            controller: viewer,
            scene,
        })
    }

    /// A loaded viewer showing `photo.jpg` at its initial zoom.
    pub fn loaded(options: ViewerOptions) -> Result<Self> {
        let mut driver = Self::new(Scene::default(), options)?;
        driver.load("photo.jpg", None)?;
        Ok(driver)
    }

    /// Load `src` and let every pending load and animation finish.
    pub fn load(&mut self, src: &str, hi_res: Option<&str>) -> Result<()> {
        self.controller.load(src, hi_res)?;
        self.complete_loads()?;
        self.run_frames()?;
        Ok(())
    }
}

impl Driver<FullscreenViewer<MemoryHost>> {
    /// A full-screen viewer whose inner container is laid out per `scene`.
    pub fn fullscreen(scene: Scene, options: ViewerOptions) -> Result<Self> {
        let mut host = MemoryHost::new();
        for (src, size) in &scene.images {
            host.register_image(src, *size);
        }
        let mut controller = FullscreenViewer::new(host, options)?;
        let elements = controller.viewer().elements().clone();
        scene.apply(controller.viewer_mut().host_mut(), &elements);
        Ok(Self { controller, scene })
    }
}

impl<C: Dispatch> Driver<C> {
    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn viewer(&self) -> &Viewer<MemoryHost> {
        self.controller.viewer()
    }

    pub fn host(&self) -> &MemoryHost {
        self.controller.host()
    }

    pub fn host_mut(&mut self) -> &mut MemoryHost {
        self.controller.host_mut()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn elements(&self) -> &ViewerElements {
        self.viewer().elements()
    }

    pub fn zoom(&self) -> f64 {
        self.viewer().state().zoom()
    }

    pub fn dispatch(&mut self, event: HostEvent) -> Result<EventResponse> {
        self.controller.dispatch(event)
    }

    /// Deliver `event` at `target` and bubble it up to the document.
    ///
    /// Listeners removed by an earlier listener are skipped, like a browser
    /// skips listeners removed during dispatch.
    pub fn emit(&mut self, target: EventTarget, event: DomEvent) -> Result<EventResponse> {
        let kind = event.kind();
        let mut response = EventResponse::Ignored;
        for target in self.propagation_path(target, kind) {
            for listener in self.host().listeners_for(target, kind) {
                if !self.host().listeners_for(target, kind).contains(&listener) {
                    continue;
                }
                let r = self.dispatch(HostEvent::Dom {
                    listener,
                    event: event.clone(),
                })?;
                response = response.merge(r);
            }
        }
        Ok(response)
    }

    fn propagation_path(&self, target: EventTarget, kind: EventKind) -> Vec<EventTarget> {
        let EventTarget::Element(element) = target else {
            return vec![target];
        };
        if matches!(kind, EventKind::MouseEnter | EventKind::MouseLeave) {
            return vec![target];
        }
        let mut path = vec![target];
        let mut current = element;
        while let Some(parent) = self.host().parent_of(current) {
            path.push(EventTarget::Element(parent));
            current = parent;
        }
        path.push(EventTarget::Document);
        path
    }

    /// Finish every pending image load, including loads started by a load
    /// completing.
    pub fn complete_loads(&mut self) -> Result<()> {
        loop {
            let pending = self.host().pending_loads();
            if pending.is_empty() {
                return Ok(());
            }
            for image in pending {
                if self.host_mut().complete_load(image) {
                    let _ = self.dispatch(HostEvent::Loaded(image))?;
                }
            }
        }
    }

    /// Deliver frames until none are requested. Returns how many ran.
    /// Virtual time does not move.
    pub fn run_frames(&mut self) -> Result<usize> {
        let mut delivered = 0;
        for _ in 0..MAX_FRAME_ROUNDS {
            let frames = self.host_mut().take_frames();
            if frames.is_empty() {
                return Ok(delivered);
            }
            for frame in frames {
                let _ = self.dispatch(HostEvent::Frame(frame))?;
                delivered += 1;
            }
        }
        log::warn!("Frames still pending after {} rounds", MAX_FRAME_ROUNDS);
        Ok(delivered)
    }

    /// Move time forward by `by` in frame-sized steps, firing timers and
    /// one round of frames per step.
    pub fn advance(&mut self, by: Duration) -> Result<()> {
        let mut left = by;
        while !left.is_zero() {
            let step = left.min(FRAME_INTERVAL);
            left -= step;
            for timer in self.host_mut().advance(step) {
                let _ = self.dispatch(HostEvent::Timer(timer))?;
            }
            for frame in self.host_mut().take_frames() {
                let _ = self.dispatch(HostEvent::Frame(frame))?;
            }
        }
        Ok(())
    }

    pub fn mouse_down(&mut self, on: ElementId, page: Point) -> Result<EventResponse> {
        self.emit(EventTarget::Element(on), DomEvent::MouseDown { page })
    }

    pub fn mouse_move(&mut self, on: ElementId, page: Point) -> Result<EventResponse> {
        self.emit(EventTarget::Element(on), DomEvent::MouseMove { page })
    }

    pub fn mouse_up(&mut self, on: ElementId, page: Point) -> Result<EventResponse> {
        self.emit(EventTarget::Element(on), DomEvent::MouseUp { page })
    }

    pub fn touch_start(&mut self, on: ElementId, touches: &[Point]) -> Result<EventResponse> {
        self.emit(
            EventTarget::Element(on),
            DomEvent::TouchStart {
                touches: touches.to_vec(),
            },
        )
    }

    pub fn touch_move(&mut self, on: ElementId, touches: &[Point]) -> Result<EventResponse> {
        self.emit(
            EventTarget::Element(on),
            DomEvent::TouchMove {
                touches: touches.to_vec(),
            },
        )
    }

    pub fn touch_end(&mut self, on: ElementId, touches: &[Point]) -> Result<EventResponse> {
        self.emit(
            EventTarget::Element(on),
            DomEvent::TouchEnd {
                touches: touches.to_vec(),
            },
        )
    }

    /// One wheel notch over the image. Positive `delta` zooms in.
    pub fn wheel(&mut self, page: Point, delta: f64) -> Result<EventResponse> {
        let image_wrap = self.elements().image_wrap;
        self.emit(EventTarget::Element(image_wrap), DomEvent::Wheel { delta, page })
    }

    pub fn click(&mut self, page: Point) -> Result<EventResponse> {
        let image_wrap = self.elements().image_wrap;
        self.emit(EventTarget::Element(image_wrap), DomEvent::Click { page })
    }

    /// Mouse drag on `on` from `from` to `to` in `steps` moves spaced
    /// `step_time` apart, then release.
    pub fn drag(
        &mut self,
        on: ElementId,
        from: Point,
        to: Point,
        steps: u32,
        step_time: Duration,
    ) -> Result<()> {
        let _ = self.mouse_down(on, from)?;
        let steps = steps.max(1);
        for i in 1..=steps {
            self.advance(step_time)?;
            let t = f64::from(i) / f64::from(steps);
            let page = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            let _ = self.mouse_move(on, page)?;
        }
        let _ = self.mouse_up(on, to)?;
        Ok(())
    }

    /// Inline `left`/`top`/`width`/`height` of an element, when all are set.
    pub fn styled_rect(&self, element: ElementId) -> Option<Rect> {
        let host = self.host();
        Some(Rect::new(
            host.style_px(element, "left")?,
            host.style_px(element, "top")?,
            host.style_px(element, "width")?,
            host.style_px(element, "height")?,
        ))
    }

    /// Where the main image is drawn.
    pub fn image_rect(&self) -> Option<Rect> {
        self.styled_rect(self.elements().image?)
    }

    pub fn snap_handle_rect(&self) -> Option<Rect> {
        self.styled_rect(self.elements().snap_handle)
    }
}
