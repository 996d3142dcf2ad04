//! Full-screen overlay around a [`Viewer`].

use snapview_input::{
    ElementId, ElementSpec, EventKind, EventResponse, EventTarget, Host, HostEvent, ListenerId,
};

use crate::config::ViewerOptions;
use crate::constants::class;
use crate::error::{Result, ViewerError};
use crate::viewer::{Viewer, ViewerTarget};

/// A viewer living in a page-covering overlay with a close button.
///
/// The overlay starts hidden. [`show`](Self::show) reveals it, optionally
/// loading a new image, and locks page scrolling until [`hide`](Self::hide).
pub struct FullscreenViewer<H: Host> {
    viewer: Viewer<H>,
    overlay: ElementId,
    close_listener: Option<ListenerId>,
    /// Only subscribed while the overlay is shown
    resize_listener: Option<ListenerId>,
    visible: bool,
    destroyed: bool,
}

impl<H: Host> std::fmt::Debug for FullscreenViewer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullscreenViewer")
            .field("viewer", &self.viewer)
            .field("overlay", &self.overlay)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl<H: Host> FullscreenViewer<H> {
    /// Build the overlay under `body` and attach a viewer inside it.
    ///
    /// `refresh_on_resize` is forced off: the overlay refreshes on resize
    /// itself, and only while visible.
    pub fn new(mut host: H, options: ViewerOptions) -> Result<Self> {
        let body = host.body();
        let overlay = host.create_element(
            ElementSpec::new("div", class::FULLSCREEN, body).style("display: none"),
        );
        let container =
            host.create_element(ElementSpec::new("div", class::FULLSCREEN_CONTAINER, overlay));
        let close = host.create_element(ElementSpec::new("div", class::FULLSCREEN_CLOSE, overlay));

        let options = ViewerOptions {
            refresh_on_resize: false,
            ..options
        };
        let mut viewer = Viewer::new(host, ViewerTarget::Element(container), options)?;
        let close_listener = viewer
            .host_mut()
            .listen(EventTarget::Element(close), &[EventKind::Click]);

        log::info!("Fullscreen overlay created as {:?}", overlay);
        Ok(Self {
            viewer,
            overlay,
            close_listener: Some(close_listener),
            resize_listener: None,
            visible: false,
            destroyed: false,
        })
    }

    pub fn viewer(&self) -> &Viewer<H> {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer<H> {
        &mut self.viewer
    }

    pub fn overlay(&self) -> ElementId {
        self.overlay
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Dispatch a host event to the overlay or the inner viewer.
    pub fn handle(&mut self, event: HostEvent) -> Result<EventResponse> {
        if self.destroyed {
            return Ok(EventResponse::Ignored);
        }
        if let HostEvent::Dom { listener, .. } = &event {
            if self.close_listener == Some(*listener) {
                self.hide()?;
                return Ok(EventResponse::Handled);
            }
            if self.resize_listener == Some(*listener) {
                self.viewer.refresh()?;
                return Ok(EventResponse::Handled);
            }
        }
        self.viewer.handle(event)
    }

    /// Reveal the overlay. A non-empty `src` is loaded first.
    pub fn show(&mut self, src: Option<&str>, hi_res: Option<&str>) -> Result<()> {
        if self.destroyed {
            return Err(ViewerError::Destroyed);
        }
        let host = self.viewer.host_mut();
        host.set_style(self.overlay, &[("display", "block".to_string())]);

        if let Some(src) = src.filter(|s| !s.is_empty()) {
            self.viewer.load(src, hi_res)?;
        }

        let host = self.viewer.host_mut();
        if self.resize_listener.is_none() {
            self.resize_listener = Some(host.listen(EventTarget::Window, &[EventKind::Resize]));
        }
        let html = host.document_element();
        host.set_style(html, &[("overflow", "hidden".to_string())]);
        self.visible = true;
        log::debug!("Fullscreen shown");
        Ok(())
    }

    /// Hide the overlay and give the page its scrolling back.
    pub fn hide(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(ViewerError::Destroyed);
        }
        let host = self.viewer.host_mut();
        host.set_style(self.overlay, &[("display", "none".to_string())]);
        let html = host.document_element();
        host.remove_style(html, "overflow");
        if let Some(id) = self.resize_listener.take() {
            host.unlisten(id);
        }
        self.visible = false;
        log::debug!("Fullscreen hidden");
        Ok(())
    }

    /// Destroy the inner viewer and remove the overlay. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.viewer.destroy();
        let host = self.viewer.host_mut();
        for id in [self.close_listener.take(), self.resize_listener.take()]
            .into_iter()
            .flatten()
        {
            host.unlisten(id);
        }
        if self.visible {
            let html = host.document_element();
            host.remove_style(html, "overflow");
        }
        host.remove_element(self.overlay);
        self.visible = false;
        self.destroyed = true;
        log::info!("Fullscreen overlay destroyed");
    }
}
