//! Pinch-to-zoom gesture recognition.
use crate::event::{DomEvent, EventKind};
use crate::host::{EventTarget, Host, ListenerId};
use crate::layout::Point;

/// Snapshot of state at the moment a two-finger touch begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchSession {
    /// Pixel distance between the two fingers at gesture start.
    pub start_distance: f64,
    /// Zoom percentage at gesture start.
    pub start_zoom: f64,
    /// Midpoint of the two fingers, in container coordinates.
    pub center: Point,
}

impl PinchSession {
    /// Zoom for the current finger distance: half the change in distance
    /// is added to the starting zoom. Not clamped.
    pub fn zoom_for(&self, distance: f64) -> f64 {
        self.start_zoom + (distance - self.start_distance) / 2.0
    }
}

/// What the recognizer reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinchEvent {
    /// Fingers moved: zoom to `zoom` keeping `center` fixed.
    Zoom { zoom: f64, center: Point },
    /// Fingers lifted.
    End,
}

/// Returns (midpoint, distance) of the first two touches.
pub fn two_finger_geometry(touches: &[Point]) -> Option<(Point, f64)> {
    let [t0, t1, ..] = touches else {
        return None;
    };
    Some((t0.midpoint(*t1), t0.distance(*t1)))
}

/// Tracks a pinch from two-finger touch start until release.
#[derive(Debug, Default)]
pub struct PinchRecognizer {
    session: Option<PinchSession>,
    move_listener: Option<ListenerId>,
    end_listener: Option<ListenerId>,
}

impl PinchRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pinch in progress.
    pub fn session(&self) -> Option<&PinchSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a pinch if `touches` holds at least two contacts.
    ///
    /// `origin` is the container's page position, used to express the
    /// center in container coordinates. Any previous pinch subscriptions
    /// are dropped first.
    pub fn begin<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        touches: &[Point],
        start_zoom: f64,
        origin: Point,
    ) -> Option<PinchSession> {
        let (mid, start_distance) = two_finger_geometry(touches)?;
        self.release(host);

        let session = PinchSession {
            start_distance,
            start_zoom,
            center: mid - origin,
        };
        self.session = Some(session);
        self.move_listener = Some(host.listen(EventTarget::Document, &[EventKind::TouchMove]));
        self.end_listener = Some(host.listen(EventTarget::Document, &[EventKind::TouchEnd]));
        log::debug!(
            "Pinch start: distance {:.1}, zoom {:.0}, center ({:.1}, {:.1})",
            start_distance,
            start_zoom,
            session.center.x,
            session.center.y
        );
        Some(session)
    }

    /// Whether `listener` belongs to the active pinch.
    pub fn owns(&self, listener: ListenerId) -> bool {
        self.move_listener == Some(listener) || self.end_listener == Some(listener)
    }

    /// Feed a DOM event delivered to `listener`.
    pub fn handle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        listener: ListenerId,
        event: &DomEvent,
    ) -> Option<PinchEvent> {
        if self.move_listener == Some(listener) {
            let session = self.session?;
            // one finger lifted mid-gesture: nothing to measure
            let (_, distance) = two_finger_geometry(event.touches())?;
            return Some(PinchEvent::Zoom {
                zoom: session.zoom_for(distance),
                center: session.center,
            });
        }
        if self.end_listener == Some(listener) {
            self.release(host);
            return Some(PinchEvent::End);
        }
        None
    }

    /// Drop the pinch and its subscriptions.
    pub fn release<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.move_listener.take() {
            host.unlisten(id);
        }
        if let Some(id) = self.end_listener.take() {
            host.unlisten(id);
        }
        self.session = None;
    }
}
