use crate::host::{ElementId, FrameId, ListenerId, TimerId};
use crate::layout::Point;

/// DOM events a viewer listens to.
///
/// All coordinates are page coordinates (`pageX`/`pageY`).
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Mouse button pressed.
    MouseDown { page: Point },
    /// Mouse moved.
    MouseMove { page: Point },
    /// Mouse button released.
    MouseUp { page: Point },
    /// Finger(s) placed on the surface. `touches` lists every active contact.
    TouchStart { touches: Vec<Point> },
    /// Finger(s) moved.
    TouchMove { touches: Vec<Point> },
    /// Finger(s) lifted. `touches` lists the contacts that remain.
    TouchEnd { touches: Vec<Point> },
    /// Context menu opened. Browsers skip `mouseup` in that case.
    ContextMenu,
    /// Wheel scrolled. Positive `delta` means zoom in.
    Wheel { delta: f64, page: Point },
    /// Click (or tap).
    Click { page: Point },
    /// Pointer entered the element.
    MouseEnter,
    /// Pointer left the element.
    MouseLeave,
    /// Window resized.
    Resize,
}

/// Discriminant of [`DomEvent`], used when subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
    ContextMenu,
    Wheel,
    Click,
    MouseEnter,
    MouseLeave,
    Resize,
}

impl EventKind {
    /// DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::MouseDown => "mousedown",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseUp => "mouseup",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::ContextMenu => "contextmenu",
            EventKind::Wheel => "wheel",
            EventKind::Click => "click",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::Resize => "resize",
        }
    }
}

impl DomEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::MouseDown { .. } => EventKind::MouseDown,
            DomEvent::MouseMove { .. } => EventKind::MouseMove,
            DomEvent::MouseUp { .. } => EventKind::MouseUp,
            DomEvent::TouchStart { .. } => EventKind::TouchStart,
            DomEvent::TouchMove { .. } => EventKind::TouchMove,
            DomEvent::TouchEnd { .. } => EventKind::TouchEnd,
            DomEvent::ContextMenu => EventKind::ContextMenu,
            DomEvent::Wheel { .. } => EventKind::Wheel,
            DomEvent::Click { .. } => EventKind::Click,
            DomEvent::MouseEnter => EventKind::MouseEnter,
            DomEvent::MouseLeave => EventKind::MouseLeave,
            DomEvent::Resize => EventKind::Resize,
        }
    }

    /// The single point that represents this event.
    ///
    /// Touch events normalize to the first contact.
    pub fn primary_point(&self) -> Option<Point> {
        match self {
            DomEvent::MouseDown { page }
            | DomEvent::MouseMove { page }
            | DomEvent::MouseUp { page }
            | DomEvent::Wheel { page, .. }
            | DomEvent::Click { page } => Some(*page),
            DomEvent::TouchStart { touches }
            | DomEvent::TouchMove { touches }
            | DomEvent::TouchEnd { touches } => touches.first().copied(),
            _ => None,
        }
    }

    /// Active touch contacts, empty for non-touch events.
    pub fn touches(&self) -> &[Point] {
        match self {
            DomEvent::TouchStart { touches }
            | DomEvent::TouchMove { touches }
            | DomEvent::TouchEnd { touches } => touches,
            _ => &[],
        }
    }
}

/// Pointer family that started a gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerFamily {
    Mouse,
    Touch,
}

impl PointerFamily {
    /// Family of a press event, `None` for anything that is not a press.
    pub fn of_press(event: &DomEvent) -> Option<Self> {
        match event {
            DomEvent::MouseDown { .. } => Some(PointerFamily::Mouse),
            DomEvent::TouchStart { .. } => Some(PointerFamily::Touch),
            _ => None,
        }
    }

    /// Event kind that reports movement for this family.
    pub fn move_kind(self) -> EventKind {
        match self {
            PointerFamily::Mouse => EventKind::MouseMove,
            PointerFamily::Touch => EventKind::TouchMove,
        }
    }

    /// Event kind that reports release for this family.
    pub fn end_kind(self) -> EventKind {
        match self {
            PointerFamily::Mouse => EventKind::MouseUp,
            PointerFamily::Touch => EventKind::TouchEnd,
        }
    }
}

/// What the host should do with the DOM event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub enum EventResponse {
    /// Nobody handled the event.
    #[default]
    Ignored,
    /// Handled, default browser action untouched.
    Handled,
    /// Handled, and the default browser action must be prevented.
    PreventDefault,
}

impl EventResponse {
    /// Combine two responses, keeping the stronger one.
    pub fn merge(self, other: EventResponse) -> EventResponse {
        use EventResponse::*;
        match (self, other) {
            (PreventDefault, _) | (_, PreventDefault) => PreventDefault,
            (Handled, _) | (_, Handled) => Handled,
            _ => Ignored,
        }
    }
}

/// Everything a host can deliver back to the code that subscribed.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A DOM event reached a listener.
    Dom { listener: ListenerId, event: DomEvent },
    /// A requested animation frame is due.
    Frame(FrameId),
    /// A timeout or interval fired.
    Timer(TimerId),
    /// A watched image finished loading.
    Loaded(ElementId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_normalizes_to_first_contact() {
        let ev = DomEvent::TouchStart {
            touches: vec![Point::new(5.0, 6.0), Point::new(50.0, 60.0)],
        };
        assert_eq!(ev.primary_point(), Some(Point::new(5.0, 6.0)));
        assert_eq!(ev.touches().len(), 2);
        assert_eq!(DomEvent::TouchEnd { touches: vec![] }.primary_point(), None);
    }

    #[test]
    fn test_pointer_family_kinds() {
        let mouse = PointerFamily::of_press(&DomEvent::MouseDown { page: Point::ZERO });
        assert_eq!(mouse, Some(PointerFamily::Mouse));
        assert_eq!(PointerFamily::Touch.move_kind(), EventKind::TouchMove);
        assert_eq!(PointerFamily::Mouse.end_kind(), EventKind::MouseUp);
        assert_eq!(PointerFamily::of_press(&DomEvent::ContextMenu), None);
    }

    #[test]
    fn test_response_merge() {
        assert_eq!(
            EventResponse::Handled.merge(EventResponse::PreventDefault),
            EventResponse::PreventDefault
        );
        assert_eq!(
            EventResponse::Ignored.merge(EventResponse::Handled),
            EventResponse::Handled
        );
        assert_eq!(
            EventResponse::Ignored.merge(EventResponse::Ignored),
            EventResponse::Ignored
        );
    }
}
