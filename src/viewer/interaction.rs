//! Routing DOM events to the sliders and recognizers.

use snapview_input::{
    DomEvent, EventResponse, Host, ListenerId, PinchEvent, Point, SlideEvent, WheelStep,
};

use super::Viewer;
use super::routes::Route;
use crate::animation::{Momentum, MomentumSampler};
use crate::constants::{DOUBLE_TAP_ZOOM, MOMENTUM_SAMPLE_INTERVAL};
use crate::error::Result;
use crate::geometry;

impl<H: Host> Viewer<H> {
    pub(super) fn on_dom(
        &mut self,
        listener: ListenerId,
        event: &DomEvent,
    ) -> Result<EventResponse> {
        if self.image_slider.owns(listener) {
            let slide = self
                .image_slider
                .handle(&mut self.host, &self.state, listener, event);
            return self.on_image_slide(slide);
        }
        if self.snap_slider.owns(listener) {
            let slide = self
                .snap_slider
                .handle(&mut self.host, &self.state, listener, event);
            return self.on_snap_slide(slide);
        }
        if self.zoom_slider.owns(listener) {
            let slide = self
                .zoom_slider
                .handle(&mut self.host, &self.state, listener, event);
            return self.on_zoom_slide(slide);
        }
        if self.pinch.owns(listener) {
            let pinch = self.pinch.handle(&mut self.host, listener, event);
            return self.on_pinch(pinch);
        }

        let Some(route) = self.routes.route(listener) else {
            return Ok(EventResponse::Ignored);
        };
        match route {
            Route::PointerOverImage => {
                self.show_snap_view_now(false);
                Ok(EventResponse::Handled)
            }
            Route::SnapViewEnter => {
                self.state.snap_view_visible = false;
                self.show_snap_view_now(true);
                Ok(EventResponse::Handled)
            }
            Route::SnapViewLeave => {
                self.state.snap_view_visible = false;
                self.show_snap_view_now(false);
                Ok(EventResponse::Handled)
            }
            Route::PinchStart => self.on_pinch_start(event),
            Route::Wheel => self.on_wheel(event),
            Route::Tap => self.on_tap(event),
            Route::WindowResize => {
                log::debug!("Window resized, refreshing");
                self.refresh()?;
                Ok(EventResponse::Handled)
            }
        }
    }

    /// Page position of the container's top-left corner.
    fn container_origin(&self) -> Point {
        let rect = self.host.bounding_rect(self.elements.container);
        rect.origin() + self.host.scroll_offset()
    }

    /// Dragging the image drives the snap handle, which moves the image.
    fn on_image_slide(&mut self, slide: Option<SlideEvent>) -> Result<EventResponse> {
        let Some(slide) = slide else {
            return Ok(EventResponse::Ignored);
        };
        match slide {
            SlideEvent::Start(start) => {
                self.stop_animations();
                self.begin_pan();
                self.sampler = Some(MomentumSampler::new(start));
                self.drag.last_delta = None;
                self.handles.momentum_sampler =
                    Some(self.host.set_interval(MOMENTUM_SAMPLE_INTERVAL));
                Ok(EventResponse::PreventDefault)
            }
            SlideEvent::Move { delta, current } => {
                if let Some(sampler) = self.sampler.as_mut() {
                    sampler.track(current);
                }
                self.drag.last_delta = Some(delta);
                let display = self.state.display_size()?;
                let snap_image = self.state.snap_image()?;
                self.request_pan(geometry::handle_delta_for_image_delta(
                    delta, display, snap_image,
                ))?;
                Ok(EventResponse::PreventDefault)
            }
            SlideEvent::End => {
                let sampler = self.sampler.take();
                let last_delta = self.drag.last_delta.take();
                self.stop_animations();
                if let (Some(sampler), Some(delta)) = (sampler, last_delta) {
                    self.momentum = Momentum::launch(&sampler, delta);
                    self.momentum_tick()?;
                }
                Ok(EventResponse::Handled)
            }
        }
    }

    /// Record where the snap handle is and stop any momentum.
    fn begin_pan(&mut self) {
        self.drag.pan_origin = self.state.snap_handle_pos;
        self.handles.clear_momentum(&mut self.host);
        self.momentum = None;
    }

    pub(super) fn momentum_tick(&mut self) -> Result<()> {
        let Some(momentum) = self.momentum.as_mut() else {
            return Ok(());
        };
        let frame = momentum.tick();
        if frame.finished {
            self.momentum = None;
        } else {
            self.handles.momentum_frame = Some(self.host.request_frame());
        }
        let display = self.state.display_size()?;
        let snap_image = self.state.snap_image()?;
        self.request_pan(geometry::handle_delta_for_image_delta(frame.offset, display, snap_image))
    }

    fn on_snap_slide(&mut self, slide: Option<SlideEvent>) -> Result<EventResponse> {
        match slide {
            None => Ok(EventResponse::Ignored),
            Some(SlideEvent::Start(_)) => {
                self.begin_pan();
                Ok(EventResponse::PreventDefault)
            }
            Some(SlideEvent::Move { delta, .. }) => {
                self.request_pan(delta)?;
                Ok(EventResponse::PreventDefault)
            }
            Some(SlideEvent::End) => Ok(EventResponse::Handled),
        }
    }

    /// The zoom handle follows the pointer along the track.
    fn on_zoom_slide(&mut self, slide: Option<SlideEvent>) -> Result<EventResponse> {
        let page_x = match slide {
            None => return Ok(EventResponse::Ignored),
            Some(SlideEvent::End) => return Ok(EventResponse::Handled),
            Some(SlideEvent::Start(start)) => {
                let rect = self.host.bounding_rect(self.elements.zoom_slider);
                self.drag.track_left = rect.left + self.host.scroll_offset().x;
                self.drag.handle_width = self.host.computed_size(self.elements.zoom_handle).w;
                start.x
            }
            Some(SlideEvent::Move { current, .. }) => current.x,
        };

        let zoom = geometry::zoom_from_track(
            page_x,
            self.drag.track_left,
            self.drag.handle_width,
            self.state.zoom_track_length,
            self.options.max_zoom,
        );
        match zoom {
            Some(zoom) => self.request_zoom(zoom, None)?,
            None => log::warn!("Zoom track has no length, ignoring drag"),
        }
        Ok(EventResponse::PreventDefault)
    }

    fn on_pinch_start(&mut self, event: &DomEvent) -> Result<EventResponse> {
        if !self.state.loaded {
            return Ok(EventResponse::Ignored);
        }
        let origin = self.container_origin();
        let begun = self
            .pinch
            .begin(&mut self.host, event.touches(), self.state.zoom, origin);
        if begun.is_none() {
            return Ok(EventResponse::Ignored);
        }

        // the image slider saw the same touch; a pinch is not a pan
        self.state.zooming = true;
        self.image_slider.cancel(&mut self.host);
        self.handles.clear_momentum(&mut self.host);
        self.sampler = None;
        Ok(EventResponse::Handled)
    }

    fn on_pinch(&mut self, pinch: Option<PinchEvent>) -> Result<EventResponse> {
        match pinch {
            None => Ok(EventResponse::Ignored),
            Some(PinchEvent::Zoom { zoom, center }) => {
                self.request_zoom(zoom, Some(center))?;
                Ok(EventResponse::Handled)
            }
            Some(PinchEvent::End) => {
                self.state.zooming = false;
                Ok(EventResponse::Handled)
            }
        }
    }

    fn on_wheel(&mut self, event: &DomEvent) -> Result<EventResponse> {
        let DomEvent::Wheel { delta, page } = *event else {
            return Ok(EventResponse::Ignored);
        };
        if !self.options.zoom_on_mouse_wheel || !self.state.loaded {
            return Ok(EventResponse::Ignored);
        }

        self.stop_animations();
        match self.wheel.step(delta, self.state.zoom, self.options.max_zoom) {
            WheelStep::Rejected => Ok(EventResponse::PreventDefault),
            WheelStep::Zoom(zoom) => {
                let focal = page - self.container_origin();
                self.request_zoom(zoom, Some(focal))?;
                self.show_snap_view_now(false);
                Ok(EventResponse::PreventDefault)
            }
        }
    }

    fn on_tap(&mut self, event: &DomEvent) -> Result<EventResponse> {
        let Some(page) = event.primary_point() else {
            return Ok(EventResponse::Ignored);
        };
        if !self.state.loaded {
            return Ok(EventResponse::Ignored);
        }
        if self.taps.tap(self.host.now(), page) {
            if self.state.zoom == self.options.zoom_value {
                log::debug!("Double tap: zoom in");
                self.request_zoom(DOUBLE_TAP_ZOOM, None)?;
            } else {
                log::debug!("Double tap: reset zoom");
                self.request_zoom(self.options.zoom_value, None)?;
            }
        }
        Ok(EventResponse::Handled)
    }
}
