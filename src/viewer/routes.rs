//! Handle registries.
//!
//! Every listener, frame and timer the viewer acquires outside its sliders
//! and pinch recognizer is recorded here, so teardown can release each
//! exactly once.

use std::collections::BTreeMap;

use snapview_input::{EventKind, EventTarget, FrameId, Host, ListenerId, TimerId};

/// What a viewer-level listener is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// Pointer moved over the image: show the snap view with auto-hide
    PointerOverImage,
    /// Pointer entered or touched the snap view: keep it up
    SnapViewEnter,
    /// Pointer left the snap view: arm the auto-hide
    SnapViewLeave,
    /// Touch started on the image: maybe a pinch
    PinchStart,
    /// Mouse wheel over the image
    Wheel,
    /// Click on the image, feeds double tap detection
    Tap,
    /// Window resized
    WindowResize,
}

/// Listener table for [`Route`]s.
#[derive(Debug, Default)]
pub(crate) struct Routes {
    table: BTreeMap<ListenerId, Route>,
}

impl Routes {
    /// Subscribe and remember what the subscription is for.
    pub fn bind<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        target: EventTarget,
        kinds: &[EventKind],
        route: Route,
    ) -> ListenerId {
        let id = host.listen(target, kinds);
        self.table.insert(id, route);
        id
    }

    pub fn route(&self, listener: ListenerId) -> Option<Route> {
        self.table.get(&listener).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Unsubscribe everything.
    pub fn release_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        for (id, _) in std::mem::take(&mut self.table) {
            host.unlisten(id);
        }
    }
}

/// Frame and timer handles owned by the viewer.
#[derive(Debug, Default)]
pub(crate) struct Handles {
    /// 50ms interval feeding the momentum sampler
    pub momentum_sampler: Option<TimerId>,
    pub momentum_frame: Option<FrameId>,
    pub zoom_frame: Option<FrameId>,
    pub snap_view_timeout: Option<TimerId>,
}

impl Handles {
    /// Stop the sampler and the momentum animation.
    pub fn clear_momentum<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.momentum_sampler.take() {
            host.clear_timer(id);
        }
        if let Some(id) = self.momentum_frame.take() {
            host.cancel_frame(id);
        }
    }

    /// Stop every animation: sampler, momentum and zoom.
    pub fn clear_frames<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.clear_momentum(host);
        if let Some(id) = self.zoom_frame.take() {
            host.cancel_frame(id);
        }
    }

    pub fn clear_snap_view_timeout<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.snap_view_timeout.take() {
            host.clear_timer(id);
        }
    }

    pub fn release_all<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.clear_frames(host);
        self.clear_snap_view_timeout(host);
    }

    /// Whether `timer` is the sampler interval. Intervals stay armed.
    pub fn is_sampler(&self, timer: TimerId) -> bool {
        self.momentum_sampler == Some(timer)
    }

    /// Take `timer` if it is the snap view timeout.
    pub fn take_snap_view_timeout(&mut self, timer: TimerId) -> bool {
        if self.snap_view_timeout == Some(timer) {
            self.snap_view_timeout = None;
            return true;
        }
        false
    }

    /// Take `frame` if it is the pending zoom frame.
    pub fn take_zoom_frame(&mut self, frame: FrameId) -> bool {
        if self.zoom_frame == Some(frame) {
            self.zoom_frame = None;
            return true;
        }
        false
    }

    /// Take `frame` if it is the pending momentum frame.
    pub fn take_momentum_frame(&mut self, frame: FrameId) -> bool {
        if self.momentum_frame == Some(frame) {
            self.momentum_frame = None;
            return true;
        }
        false
    }
}
