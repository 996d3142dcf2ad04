//! Browser host and JavaScript bindings.
//!
//! [`WebHost`] implements [`Host`] over `web-sys`. Every DOM listener, frame,
//! timer and load callback is a stored [`Closure`] that turns the browser
//! callback into a [`HostEvent`] and posts it to a [`Mailbox`]. The mailbox
//! hands events to the viewer one at a time.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};
use std::time::Duration;

use snapview_input::{
    DomEvent, ElementId, ElementSpec, EventKind, EventResponse, EventTarget, FrameId, Host,
    HostEvent, ListenerId, Point, Rect, Size, TimerId,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, HtmlElement, HtmlImageElement, MouseEvent,
    TouchEvent, TouchList, WheelEvent, Window,
};
use web_time::Instant;

use crate::config::ViewerOptions;
use crate::fullscreen::FullscreenViewer;
use crate::viewer::{Viewer, ViewerTarget};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"snapview: logger already initialized".into());
    }
}

// ============================================================================
// Mailbox
// ============================================================================

/// Something that consumes host events.
pub trait Receiver {
    fn receive(&mut self, event: HostEvent) -> EventResponse;
}

impl Receiver for Viewer<WebHost> {
    fn receive(&mut self, event: HostEvent) -> EventResponse {
        self.handle(event).unwrap_or_else(|e| {
            log::error!("Viewer failed to handle event: {}", e);
            EventResponse::Ignored
        })
    }
}

impl Receiver for FullscreenViewer<WebHost> {
    fn receive(&mut self, event: HostEvent) -> EventResponse {
        self.handle(event).unwrap_or_else(|e| {
            log::error!("Fullscreen viewer failed to handle event: {}", e);
            EventResponse::Ignored
        })
    }
}

/// Serializes delivery of host events to a single receiver.
///
/// An event that arrives while the receiver is busy is queued and delivered
/// once the running dispatch returns.
#[derive(Default)]
pub struct Mailbox {
    receiver: RefCell<Option<Weak<RefCell<dyn Receiver>>>>,
    queue: RefCell<VecDeque<HostEvent>>,
}

impl Mailbox {
    fn connect(&self, receiver: Weak<RefCell<dyn Receiver>>) {
        *self.receiver.borrow_mut() = Some(receiver);
    }

    fn deliver(&self, event: HostEvent) -> EventResponse {
        let receiver = self.receiver.borrow().as_ref().and_then(Weak::upgrade);
        let Some(receiver) = receiver else {
            return EventResponse::Ignored;
        };
        let Ok(mut target) = receiver.try_borrow_mut() else {
            self.queue.borrow_mut().push_back(event);
            return EventResponse::Ignored;
        };
        let response = target.receive(event);
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(queued) => {
                    let _ = target.receive(queued);
                }
                None => break,
            }
        }
        response
    }
}

// ============================================================================
// WebHost
// ============================================================================

/// Single-shot callbacks, dropped once they have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Once {
    Frame(FrameId),
    Timeout(TimerId),
    Load(ElementId),
}

struct Listener {
    target: web_sys::EventTarget,
    bindings: Vec<(EventKind, Closure<dyn FnMut(Event)>)>,
}

struct Interval {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// [`Host`] over the real DOM.
pub struct WebHost {
    window: Window,
    document: Document,
    mailbox: Rc<Mailbox>,
    /// Indexed by `ElementId`. Lookups register author markup through `&self`.
    elements: RefCell<Vec<Element>>,
    listeners: HashMap<ListenerId, Listener>,
    once: HashMap<Once, (i32, Closure<dyn FnMut()>)>,
    intervals: HashMap<TimerId, Interval>,
    /// Single-shot callbacks that have finished running
    spent: Rc<RefCell<Vec<Once>>>,
    next_handle: u64,
}

impl WebHost {
    /// Host for the current page. Fails outside a browser window.
    pub fn new() -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let html = document
            .document_element()
            .ok_or_else(|| JsError::new("no document element"))?;
        let body: Element = document
            .body()
            .ok_or_else(|| JsError::new("no body"))?
            .into();
        Ok(Self {
            window,
            document,
            mailbox: Rc::new(Mailbox::default()),
            elements: RefCell::new(vec![body, html]),
            listeners: HashMap::new(),
            once: HashMap::new(),
            intervals: HashMap::new(),
            spent: Rc::new(RefCell::new(Vec::new())),
            next_handle: 0,
        })
    }

    pub fn mailbox(&self) -> Rc<Mailbox> {
        Rc::clone(&self.mailbox)
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.0 as usize).cloned()
    }

    fn html_element(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    fn image_element(&self, id: ElementId) -> Option<HtmlImageElement> {
        self.element(id).and_then(|e| e.dyn_into::<HtmlImageElement>().ok())
    }

    fn register(&self, element: Element) -> ElementId {
        let mut elements = self.elements.borrow_mut();
        if let Some(index) = elements.iter().position(|e| *e == element) {
            return ElementId(index as u64);
        }
        elements.push(element);
        ElementId((elements.len() - 1) as u64)
    }

    fn event_target(&self, target: EventTarget) -> Option<web_sys::EventTarget> {
        match target {
            EventTarget::Element(id) => self.element(id).map(Into::into),
            EventTarget::Document => Some(self.document.clone().into()),
            EventTarget::Window => Some(self.window.clone().into()),
        }
    }

    /// Drop single-shot callbacks that already ran.
    fn prune(&mut self) {
        let spent: Vec<Once> = self.spent.borrow_mut().drain(..).collect();
        for key in spent {
            if let Once::Load(id) = key {
                if let Some(image) = self.image_element(id) {
                    image.set_onload(None);
                }
            }
            self.once.remove(&key);
        }
    }

    /// A closure that delivers `event` and then marks `key` spent.
    fn once_callback(&self, key: Once, event: HostEvent) -> Closure<dyn FnMut()> {
        let mailbox = Rc::clone(&self.mailbox);
        let spent = Rc::clone(&self.spent);
        Closure::wrap(Box::new(move || {
            let _ = mailbox.deliver(event.clone());
            spent.borrow_mut().push(key);
        }) as Box<dyn FnMut()>)
    }

    fn listener_callback(
        &self,
        listener: ListenerId,
        kind: EventKind,
    ) -> Closure<dyn FnMut(Event)> {
        let mailbox = Rc::clone(&self.mailbox);
        Closure::wrap(Box::new(move |event: Event| {
            let Some(dom) = to_dom_event(kind, &event) else {
                return;
            };
            let response = mailbox.deliver(HostEvent::Dom {
                listener,
                event: dom,
            });
            if response == EventResponse::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>)
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        let listeners: Vec<ListenerId> = self.listeners.keys().copied().collect();
        for id in listeners {
            self.unlisten(id);
        }
        let once: Vec<(Once, (i32, Closure<dyn FnMut()>))> = self.once.drain().collect();
        for (key, (handle, _)) in once {
            match key {
                Once::Frame(_) => {
                    let _ = self.window.cancel_animation_frame(handle);
                }
                Once::Timeout(_) => self.window.clear_timeout_with_handle(handle),
                Once::Load(id) => {
                    if let Some(image) = self.image_element(id) {
                        image.set_onload(None);
                    }
                }
            }
        }
        for (_, interval) in self.intervals.drain() {
            self.window.clear_interval_with_handle(interval.handle);
        }
    }
}

/// `maxWidth` -> `max-width`
fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_px(value: &str) -> f64 {
    value.trim_end_matches("px").trim().parse().unwrap_or(0.0)
}

fn touch_points(list: TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(t.page_x() as f64, t.page_y() as f64))
        .collect()
}

fn to_dom_event(kind: EventKind, event: &Event) -> Option<DomEvent> {
    let page = || {
        event
            .dyn_ref::<MouseEvent>()
            .map(|m| Point::new(m.page_x() as f64, m.page_y() as f64))
    };
    let touches = || event.dyn_ref::<TouchEvent>().map(|t| touch_points(t.touches()));
    Some(match kind {
        EventKind::MouseDown => DomEvent::MouseDown { page: page()? },
        EventKind::MouseMove => DomEvent::MouseMove { page: page()? },
        EventKind::MouseUp => DomEvent::MouseUp { page: page()? },
        EventKind::Click => DomEvent::Click { page: page()? },
        EventKind::TouchStart => DomEvent::TouchStart { touches: touches()? },
        EventKind::TouchMove => DomEvent::TouchMove { touches: touches()? },
        EventKind::TouchEnd => DomEvent::TouchEnd { touches: touches()? },
        EventKind::Wheel => {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            DomEvent::Wheel {
                delta: -wheel.delta_y(),
                page: page()?,
            }
        }
        EventKind::ContextMenu => DomEvent::ContextMenu,
        EventKind::MouseEnter => DomEvent::MouseEnter,
        EventKind::MouseLeave => DomEvent::MouseLeave,
        EventKind::Resize => DomEvent::Resize,
    })
}

impl Host for WebHost {
    fn resolve(&self, selector: &str) -> Option<ElementId> {
        let found = self.document.query_selector(selector).ok()??;
        Some(self.register(found))
    }

    fn query(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        let found = self.element(root)?.query_selector(selector).ok()??;
        Some(self.register(found))
    }

    fn body(&self) -> ElementId {
        ElementId(0)
    }

    fn document_element(&self) -> ElementId {
        ElementId(1)
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.element(element)
            .map(|e| e.tag_name().to_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element(element) {
            if let Err(err) = e.set_attribute(name, value) {
                log::warn!("set_attribute({}) failed: {:?}", name, err);
            }
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(e) = self.element(element) {
            let _ = e.remove_attribute(name);
        }
    }

    fn create_element(&mut self, spec: ElementSpec) -> ElementId {
        let element = match self.document.create_element(&spec.tag) {
            Ok(e) => e,
            Err(err) => {
                log::error!("Failed to create <{}>: {:?}", spec.tag, err);
                return self.document_element();
            }
        };
        element.set_class_name(&spec.class_name);
        if let Some(style) = &spec.style {
            let _ = element.set_attribute("style", style);
        }
        if let Some(src) = &spec.src {
            let _ = element.set_attribute("src", src);
        }
        if let Some(parent) = self.element(spec.parent) {
            let before = spec.insert_before.and_then(|id| self.element(id));
            let inserted = match before {
                Some(sibling) => parent.insert_before(&element, Some(&sibling)),
                None => parent.append_child(&element),
            };
            if let Err(err) = inserted {
                log::error!("Failed to insert <{}>: {:?}", spec.tag, err);
            }
        }
        self.register(element)
    }

    fn remove_element(&mut self, element: ElementId) {
        if let Some(e) = self.element(element) {
            e.remove();
        }
    }

    fn wrap(&mut self, element: ElementId, spec: ElementSpec) -> ElementId {
        let Some(target) = self.element(element) else {
            return element;
        };
        let Some(parent) = target.parent_element() else {
            return element;
        };
        let parent_id = self.register(parent);
        let wrapper = self.create_element(ElementSpec {
            parent: parent_id,
            insert_before: Some(element),
            ..spec
        });
        if let Some(w) = self.element(wrapper) {
            if let Err(err) = w.append_child(&target) {
                log::error!("Failed to wrap element: {:?}", err);
            }
        }
        wrapper
    }

    fn unwrap(&mut self, element: ElementId) {
        let Some(target) = self.element(element) else {
            return;
        };
        let Some(wrapper) = target.parent_element() else {
            return;
        };
        if let Some(grandparent) = wrapper.parent_node() {
            if grandparent.insert_before(&target, Some(&wrapper)).is_ok() {
                wrapper.remove();
            }
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.element(element) {
            let _ = e.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.element(element) {
            let _ = e.class_list().remove_1(class);
        }
    }

    fn set_style(&mut self, element: ElementId, properties: &[(&str, String)]) {
        let Some(e) = self.html_element(element) else {
            return;
        };
        let style = e.style();
        for (name, value) in properties {
            if let Err(err) = style.set_property(&kebab_case(name), value) {
                log::warn!("Failed to set style {}: {:?}", name, err);
            }
        }
    }

    fn remove_style(&mut self, element: ElementId, property: &str) {
        if let Some(e) = self.html_element(element) {
            let _ = e.style().remove_property(&kebab_case(property));
        }
    }

    fn style_text(&self, element: ElementId) -> String {
        self.html_element(element)
            .map(|e| e.style().css_text())
            .unwrap_or_default()
    }

    fn computed_style(&self, element: ElementId, property: &str) -> Option<String> {
        let e = self.element(element)?;
        let style = self.window.get_computed_style(&e).ok()??;
        style.get_property_value(&kebab_case(property)).ok()
    }

    fn computed_size(&self, element: ElementId) -> Size {
        let width = self.computed_style(element, "width").unwrap_or_default();
        let height = self.computed_style(element, "height").unwrap_or_default();
        Size::new(parse_px(&width), parse_px(&height))
    }

    fn client_size(&self, element: ElementId) -> Size {
        self.element(element)
            .map(|e| Size::new(e.client_width() as f64, e.client_height() as f64))
            .unwrap_or_default()
    }

    fn offset_width(&self, element: ElementId) -> f64 {
        self.html_element(element)
            .map(|e| e.offset_width() as f64)
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.element(element)
            .map(|e| {
                let r = e.get_bounding_client_rect();
                Rect::new(r.left(), r.top(), r.width(), r.height())
            })
            .unwrap_or_default()
    }

    fn scroll_offset(&self) -> Point {
        Point::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn listen(&mut self, target: EventTarget, kinds: &[EventKind]) -> ListenerId {
        let id = ListenerId(self.next_handle());
        let Some(dom_target) = self.event_target(target) else {
            log::warn!("Listening on unknown target {:?}", target);
            return id;
        };
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let mut bindings = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let callback = self.listener_callback(id, kind);
            let added = dom_target
                .add_event_listener_with_callback_and_add_event_listener_options(
                    kind.dom_name(),
                    callback.as_ref().unchecked_ref(),
                    &options,
                );
            if let Err(err) = added {
                log::error!("Failed to listen for {}: {:?}", kind.dom_name(), err);
                continue;
            }
            bindings.push((kind, callback));
        }
        self.listeners.insert(
            id,
            Listener {
                target: dom_target,
                bindings,
            },
        );
        id
    }

    fn unlisten(&mut self, listener: ListenerId) {
        let Some(entry) = self.listeners.remove(&listener) else {
            return;
        };
        for (kind, callback) in entry.bindings {
            let _ = entry.target.remove_event_listener_with_callback(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
            );
        }
    }

    fn request_frame(&mut self) -> FrameId {
        self.prune();
        let id = FrameId(self.next_handle());
        let key = Once::Frame(id);
        let callback = self.once_callback(key, HostEvent::Frame(id));
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                self.once.insert(key, (handle, callback));
            }
            Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
        }
        id
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        if let Some((handle, _)) = self.once.remove(&Once::Frame(frame)) {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.prune();
        let id = TimerId(self.next_handle());
        let key = Once::Timeout(id);
        let callback = self.once_callback(key, HostEvent::Timer(id));
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay.as_millis() as i32,
        ) {
            Ok(handle) => {
                self.once.insert(key, (handle, callback));
            }
            Err(err) => log::error!("setTimeout failed: {:?}", err),
        }
        id
    }

    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_handle());
        let mailbox = Rc::clone(&self.mailbox);
        let callback = Closure::wrap(Box::new(move || {
            let _ = mailbox.deliver(HostEvent::Timer(id));
        }) as Box<dyn FnMut()>);
        match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period.as_millis() as i32,
        ) {
            Ok(handle) => {
                self.intervals.insert(
                    id,
                    Interval {
                        handle,
                        _callback: callback,
                    },
                );
            }
            Err(err) => log::error!("setInterval failed: {:?}", err),
        }
        id
    }

    fn clear_timer(&mut self, timer: TimerId) {
        if let Some((handle, _)) = self.once.remove(&Once::Timeout(timer)) {
            self.window.clear_timeout_with_handle(handle);
        }
        if let Some(interval) = self.intervals.remove(&timer) {
            self.window.clear_interval_with_handle(interval.handle);
        }
    }

    fn watch_load(&mut self, image: ElementId) {
        self.prune();
        let Some(img) = self.image_element(image) else {
            log::warn!("watch_load on a non-image {:?}", image);
            return;
        };
        let key = Once::Load(image);
        let callback = self.once_callback(key, HostEvent::Loaded(image));
        img.set_onload(Some(callback.as_ref().unchecked_ref()));
        self.once.insert(key, (0, callback));
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ============================================================================
// JavaScript bindings
// ============================================================================

/// Options arrive as a plain object (`{maxZoom: 300}`), a JSON string, or nothing.
fn parse_options(options: JsValue) -> Result<ViewerOptions, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(ViewerOptions::default());
    }
    let json = match options.as_string() {
        Some(json) => json,
        None => js_sys::JSON::stringify(&options)
            .map_err(|_| JsError::new("options are not serializable"))?
            .into(),
    };
    if json.trim().is_empty() {
        return Ok(ViewerOptions::default());
    }
    Ok(ViewerOptions::from_json(&json)?)
}

/// Point the host's mailbox at `receiver`. The mailbox only holds a weak
/// reference, so dropping the binding releases the viewer and its host.
fn connect<R: Receiver + 'static>(mailbox: &Mailbox, receiver: &Rc<RefCell<R>>) {
    let receiver: Rc<RefCell<dyn Receiver>> = receiver.clone();
    mailbox.connect(Rc::downgrade(&receiver));
}

fn busy() -> JsError {
    JsError::new("viewer is busy handling an event")
}

/// `new ImageViewer("#photo", { maxZoom: 300 })`
#[wasm_bindgen(js_name = ImageViewer)]
pub struct JsViewer {
    inner: Rc<RefCell<Viewer<WebHost>>>,
}

#[wasm_bindgen(js_class = ImageViewer)]
impl JsViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str, options: JsValue) -> Result<JsViewer, JsError> {
        let options = parse_options(options)?;
        let host = WebHost::new()?;
        let mailbox = host.mailbox();
        let viewer = Viewer::new(host, ViewerTarget::Selector(selector.to_string()), options)?;
        let inner = Rc::new(RefCell::new(viewer));
        connect(&mailbox, &inner);
        Ok(JsViewer { inner })
    }

    pub fn load(&self, src: &str, hi_res: Option<String>) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.load(src, hi_res.as_deref())?)
    }

    /// Zoom to `percent`, keeping the container point (`x`, `y`) fixed when
    /// both are given. Coordinates are relative to the container's top-left.
    pub fn zoom(&self, percent: f64, x: Option<f64>, y: Option<f64>) -> Result<(), JsError> {
        let focal = x.zip(y).map(|(x, y)| Point::new(x, y));
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.zoom(percent, focal)?)
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self, animate: Option<bool>) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.reset_zoom(animate.unwrap_or(true))?)
    }

    pub fn refresh(&self) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.refresh()?)
    }

    #[wasm_bindgen(js_name = showSnapView)]
    pub fn show_snap_view(&self, no_timeout: Option<bool>) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.show_snap_view(no_timeout.unwrap_or(false))?)
    }

    #[wasm_bindgen(js_name = hideSnapView)]
    pub fn hide_snap_view(&self) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.hide_snap_view()?)
    }

    #[wasm_bindgen(getter, js_name = zoomValue)]
    pub fn zoom_value(&self) -> f64 {
        self.inner
            .try_borrow()
            .map(|v| v.state().zoom())
            .unwrap_or(0.0)
    }

    pub fn destroy(&self) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        viewer.destroy();
        Ok(())
    }
}

/// `new FullScreenViewer({ snapView: false }).show("a.jpg", "a-hd.jpg")`
#[wasm_bindgen(js_name = FullScreenViewer)]
pub struct JsFullscreenViewer {
    inner: Rc<RefCell<FullscreenViewer<WebHost>>>,
}

#[wasm_bindgen(js_class = FullScreenViewer)]
impl JsFullscreenViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsFullscreenViewer, JsError> {
        let options = parse_options(options)?;
        let host = WebHost::new()?;
        let mailbox = host.mailbox();
        let inner = Rc::new(RefCell::new(FullscreenViewer::new(host, options)?));
        connect(&mailbox, &inner);
        Ok(JsFullscreenViewer { inner })
    }

    pub fn show(&self, src: Option<String>, hi_res: Option<String>) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.show(src.as_deref(), hi_res.as_deref())?)
    }

    pub fn hide(&self) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(viewer.hide()?)
    }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.inner.try_borrow().map(|v| v.is_visible()).unwrap_or(false)
    }

    pub fn destroy(&self) -> Result<(), JsError> {
        let mut viewer = self.inner.try_borrow_mut().map_err(|_| busy())?;
        viewer.destroy();
        Ok(())
    }
}
