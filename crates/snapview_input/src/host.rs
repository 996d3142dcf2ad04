//! The DOM collaborator interface.
//!
//! Everything the viewer needs from its environment goes through [`Host`]:
//! element creation and styling, measurement, listener subscription,
//! animation frames, timers and image-load notification. Hosts deliver
//! the results back as [`HostEvent`](crate::HostEvent)s tagged with the
//! handle returned at subscription time.

use std::time::Duration;

use thiserror::Error;
use web_time::Instant;

use crate::event::EventKind;
use crate::layout::{Point, Rect, Size};

/// Handle to an element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Handle to a listener subscription. Passing it to [`Host::unlisten`] unbinds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Handle to a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Handle to a timeout or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Element(ElementId),
    Document,
    Window,
}

/// Description of an element to create.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    /// Tag name, e.g. `div` or `img`.
    pub tag: String,
    /// Space separated class list.
    pub class_name: String,
    /// Image source, only meaningful for `img`.
    pub src: Option<String>,
    /// Parent the element is appended to.
    pub parent: ElementId,
    /// Sibling the element is inserted before instead of appended.
    pub insert_before: Option<ElementId>,
    /// Inline style text (`cssText`).
    pub style: Option<String>,
}

impl ElementSpec {
    /// A `tag.class` element appended to `parent`.
    pub fn new(tag: impl Into<String>, class_name: impl Into<String>, parent: ElementId) -> Self {
        Self {
            tag: tag.into(),
            class_name: class_name.into(),
            src: None,
            parent,
            insert_before: None,
            style: None,
        }
    }

    /// Set the image source.
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Insert before a sibling instead of appending.
    pub fn insert_before(mut self, sibling: ElementId) -> Self {
        self.insert_before = Some(sibling);
        self
    }

    /// Set inline style text.
    pub fn style(mut self, css_text: impl Into<String>) -> Self {
        self.style = Some(css_text.into());
        self
    }
}

/// Errors raised while talking to the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// A required element is missing from the markup.
    #[error("The selector \"{selector}\" does not match any element")]
    MissingElement {
        /// Selector that matched nothing
        selector: String,
    },
}

impl HostError {
    /// Create a missing element error.
    pub fn missing_element(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }
}

/// The environment a viewer runs in.
///
/// Single threaded; no method may call back into the viewer synchronously.
/// Subscriptions report through [`HostEvent`](crate::HostEvent)s.
pub trait Host {
    /// Find the first element in the document matching `selector`.
    fn resolve(&self, selector: &str) -> Option<ElementId>;

    /// Find the first descendant of `root` matching `selector`.
    fn query(&self, root: ElementId, selector: &str) -> Option<ElementId>;

    /// The `<body>` element.
    fn body(&self) -> ElementId;

    /// The `<html>` element.
    fn document_element(&self) -> ElementId;

    /// Lower-case tag name.
    fn tag_name(&self, element: ElementId) -> String;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);
    fn remove_attribute(&mut self, element: ElementId, name: &str);

    /// Create and insert a new element.
    fn create_element(&mut self, spec: ElementSpec) -> ElementId;

    /// Detach an element (and its subtree) from the document.
    fn remove_element(&mut self, element: ElementId);

    /// Replace `element` with a new wrapper described by `spec` and move
    /// `element` inside it. `spec.parent` is ignored.
    fn wrap(&mut self, element: ElementId, spec: ElementSpec) -> ElementId;

    /// Replace the parent of `element` with `element` itself.
    fn unwrap(&mut self, element: ElementId);

    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Set inline style properties. Names are camelCase as in `element.style`.
    fn set_style(&mut self, element: ElementId, properties: &[(&str, String)]);

    /// Remove one inline style property.
    fn remove_style(&mut self, element: ElementId, property: &str);

    /// Current inline style text.
    fn style_text(&self, element: ElementId) -> String;

    /// Computed style value.
    fn computed_style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Computed content width and height.
    fn computed_size(&self, element: ElementId) -> Size;

    /// `clientWidth`/`clientHeight`.
    fn client_size(&self, element: ElementId) -> Size;

    /// `offsetWidth`.
    fn offset_width(&self, element: ElementId) -> f64;

    /// Bounding client rect.
    fn bounding_rect(&self, element: ElementId) -> Rect;

    /// Document scroll offset (`body.scrollLeft`, `body.scrollTop`).
    fn scroll_offset(&self) -> Point;

    /// Subscribe to `kinds` on `target`.
    fn listen(&mut self, target: EventTarget, kinds: &[EventKind]) -> ListenerId;

    /// Unbind a subscription. Unknown ids are ignored.
    fn unlisten(&mut self, listener: ListenerId);

    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, frame: FrameId);

    fn set_timeout(&mut self, delay: Duration) -> TimerId;
    fn set_interval(&mut self, period: Duration) -> TimerId;
    fn clear_timer(&mut self, timer: TimerId);

    /// Report once, via [`HostEvent::Loaded`](crate::HostEvent::Loaded), when
    /// the image element has finished loading.
    fn watch_load(&mut self, image: ElementId);

    /// Current time.
    fn now(&self) -> Instant;
}

/// Query a descendant that the markup guarantees, failing loudly if it is absent.
pub fn must_query<H: Host + ?Sized>(
    host: &H,
    root: ElementId,
    selector: &str,
) -> Result<ElementId, HostError> {
    host.query(root, selector)
        .ok_or_else(|| HostError::missing_element(selector))
}

/// Format a pixel value for a style property.
pub fn px(value: f64) -> String {
    format!("{}px", value)
}
