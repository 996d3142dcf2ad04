//! Press-move-release gesture tracking bound to one element.
//!
//! A [`GestureSlider`] listens for presses on its surface. A press starts a
//! [`GestureSession`] and subscribes to document-level move and release
//! events for the pointer family that pressed, so the gesture keeps tracking
//! when the pointer leaves the surface. The slider knows nothing about what
//! it drives: it reports [`SlideEvent`]s and the owner decides.
//!
//! Enablement is checked once, at press time. A session that has started
//! runs until release (or [`GestureSlider::cancel`]) regardless of later
//! changes to the predicate.

use crate::event::{DomEvent, EventKind, PointerFamily};
use crate::host::{ElementId, EventTarget, Host, ListenerId};
use crate::layout::Point;

/// What a slider reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideEvent {
    /// A session started at this page point.
    Start(Point),
    /// The pointer moved. `delta` is relative to the start point.
    Move { delta: Point, current: Point },
    /// The pointer was released (or a context menu opened).
    End,
}

/// State of one press-to-release interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    family: PointerFamily,
    origin: Point,
    current: Point,
    move_listener: ListenerId,
    end_listener: ListenerId,
    menu_listener: ListenerId,
}

impl GestureSession {
    /// Pointer family that started the session.
    pub fn family(&self) -> PointerFamily {
        self.family
    }

    /// Page point of the press.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Last reported page point.
    pub fn current(&self) -> Point {
        self.current
    }

    /// Current minus start.
    pub fn delta(&self) -> Point {
        self.current - self.origin
    }

    fn owns(&self, listener: ListenerId) -> bool {
        listener == self.move_listener
            || listener == self.end_listener
            || listener == self.menu_listener
    }

    fn release<H: Host + ?Sized>(self, host: &mut H) {
        host.unlisten(self.move_listener);
        host.unlisten(self.end_listener);
        host.unlisten(self.menu_listener);
    }
}

/// Generic drag tracker bound to one surface.
///
/// `S` is the context handed to the enablement predicate.
#[derive(Debug)]
pub struct GestureSlider<S> {
    surface: ElementId,
    is_enabled: fn(&S) -> bool,
    press_listener: Option<ListenerId>,
    session: Option<GestureSession>,
}

impl<S> GestureSlider<S> {
    /// Bind a slider to `surface`. Nothing is subscribed until [`start`](Self::start).
    pub fn new(surface: ElementId, is_enabled: fn(&S) -> bool) -> Self {
        Self {
            surface,
            is_enabled,
            press_listener: None,
            session: None,
        }
    }

    /// Surface this slider is bound to.
    pub fn surface(&self) -> ElementId {
        self.surface
    }

    /// Whether a session is in progress.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The session in progress, if any.
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Subscribe to presses on the surface. Calling twice is a no-op.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.press_listener.is_none() {
            let id = host.listen(
                EventTarget::Element(self.surface),
                &[EventKind::TouchStart, EventKind::MouseDown],
            );
            self.press_listener = Some(id);
        }
    }

    /// Whether `listener` belongs to this slider.
    pub fn owns(&self, listener: ListenerId) -> bool {
        self.press_listener == Some(listener)
            || self.session.as_ref().is_some_and(|s| s.owns(listener))
    }

    /// Feed a DOM event delivered to `listener`.
    ///
    /// Returns `None` when the listener is not ours or the event is ignored.
    pub fn handle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &S,
        listener: ListenerId,
        event: &DomEvent,
    ) -> Option<SlideEvent> {
        if self.press_listener == Some(listener) {
            return self.press(host, ctx, event);
        }

        let session = self.session.as_mut()?;
        if !session.owns(listener) {
            return None;
        }

        if listener == session.move_listener {
            let current = event.primary_point()?;
            session.current = current;
            return Some(SlideEvent::Move {
                delta: session.delta(),
                current,
            });
        }

        // release or context menu
        if let Some(session) = self.session.take() {
            session.release(host);
        }
        Some(SlideEvent::End)
    }

    fn press<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &S,
        event: &DomEvent,
    ) -> Option<SlideEvent> {
        if !(self.is_enabled)(ctx) {
            return None;
        }
        let family = PointerFamily::of_press(event)?;
        let origin = event.primary_point()?;

        // a release outside the document leaves the previous session dangling
        self.cancel(host);

        let move_listener = host.listen(EventTarget::Document, &[family.move_kind()]);
        let end_listener = host.listen(EventTarget::Document, &[family.end_kind()]);
        let menu_listener = host.listen(EventTarget::Document, &[EventKind::ContextMenu]);

        self.session = Some(GestureSession {
            family,
            origin,
            current: origin,
            move_listener,
            end_listener,
            menu_listener,
        });
        Some(SlideEvent::Start(origin))
    }

    /// Drop the session in progress without reporting [`SlideEvent::End`].
    pub fn cancel<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(session) = self.session.take() {
            session.release(host);
        }
    }

    /// Unsubscribe everything this slider holds.
    pub fn destroy<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(id) = self.press_listener.take() {
            host.unlisten(id);
        }
        self.cancel(host);
    }
}
