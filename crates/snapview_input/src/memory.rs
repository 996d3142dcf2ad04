//! An in-memory [`Host`] for headless runs and tests.
//!
//! Elements are plain records with classes, attributes and inline styles.
//! Layout is not computed: sizes are whatever the driver configures, with
//! inline `width`/`height` pixel styles taking precedence like a browser's
//! computed style would. Time is virtual and only moves through
//! [`MemoryHost::advance`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use web_time::Instant;

use crate::event::EventKind;
use crate::host::{ElementId, ElementSpec, EventTarget, FrameId, Host, ListenerId, TimerId};
use crate::layout::{Point, Rect, Size};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    size: Size,
    client_size: Option<Size>,
    offset_width: f64,
    rect: Rect,
    attached: bool,
}

impl Node {
    fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    fn set_style(&mut self, property: &str, value: String) {
        match self.style.iter_mut().find(|(k, _)| k == property) {
            Some(entry) => entry.1 = value,
            None => self.style.push((property.to_string(), value)),
        }
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            return self.attributes.get("id").map(String::as_str) == Some(id);
        }
        let mut parts = selector.split('.');
        let tag = parts.next().unwrap_or_default();
        if !tag.is_empty() && tag != self.tag {
            return false;
        }
        parts.all(|class| self.classes.iter().any(|c| c == class))
    }
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Duration,
    period: Option<Duration>,
}

/// Headless host backed by plain data structures.
#[derive(Debug)]
pub struct MemoryHost {
    nodes: Vec<Node>,
    html: ElementId,
    body: ElementId,
    image_sizes: HashMap<String, Size>,
    scroll: Point,
    next_handle: u64,
    listeners: BTreeMap<ListenerId, (EventTarget, Vec<EventKind>)>,
    frames: BTreeSet<FrameId>,
    timers: BTreeMap<TimerId, Timer>,
    loads: BTreeSet<ElementId>,
    epoch: Instant,
    elapsed: Duration,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create a document containing only `<html><body></body></html>`.
    pub fn new() -> Self {
        let mut host = Self {
            nodes: Vec::new(),
            html: ElementId(0),
            body: ElementId(1),
            image_sizes: HashMap::new(),
            scroll: Point::ZERO,
            next_handle: 1,
            listeners: BTreeMap::new(),
            frames: BTreeSet::new(),
            timers: BTreeMap::new(),
            loads: BTreeSet::new(),
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
        };
        host.nodes.push(Node {
            tag: "html".to_string(),
            attached: true,
            ..Node::default()
        });
        host.nodes.push(Node {
            tag: "body".to_string(),
            parent: Some(host.html),
            attached: true,
            ..Node::default()
        });
        host.nodes[0].children.push(host.body);
        host
    }

    fn handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.0 as usize)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.0 as usize)
    }

    fn insert_node(&mut self, node: Node) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(node);
        id
    }

    fn detach_from_parent(&mut self, element: ElementId) -> Option<(ElementId, usize)> {
        let parent = self.node(element)?.parent?;
        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings.iter().position(|c| *c == element)?;
        siblings.remove(index);
        Some((parent, index))
    }

    fn set_attached(&mut self, element: ElementId, attached: bool) {
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node_mut(id) {
                node.attached = attached;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    fn find_descendant(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        let node = self.node(root)?;
        for child in &node.children {
            let child_node = self.node(*child)?;
            if child_node.matches(selector) {
                return Some(*child);
            }
            if let Some(found) = self.find_descendant(*child, selector) {
                return Some(found);
            }
        }
        None
    }

    /// Create an element under `body`, as page markup would.
    pub fn add_element(&mut self, tag: &str, id: Option<&str>, size: Size) -> ElementId {
        let element = self.create_element(ElementSpec::new(tag, "", self.body));
        if let Some(node) = self.node_mut(element) {
            if let Some(id) = id {
                node.attributes.insert("id".to_string(), id.to_string());
            }
            node.size = size;
        }
        element
    }

    /// Size images created with `src` report once they exist.
    pub fn register_image(&mut self, src: &str, natural: Size) {
        self.image_sizes.insert(src.to_string(), natural);
    }

    /// Set the measured size of an element.
    pub fn set_size(&mut self, element: ElementId, size: Size) {
        if let Some(node) = self.node_mut(element) {
            node.size = size;
        }
    }

    /// Set `clientWidth`/`clientHeight` separately from the computed size.
    pub fn set_client_size(&mut self, element: ElementId, size: Size) {
        if let Some(node) = self.node_mut(element) {
            node.client_size = Some(size);
        }
    }

    /// Set `offsetWidth`.
    pub fn set_offset_width(&mut self, element: ElementId, width: f64) {
        if let Some(node) = self.node_mut(element) {
            node.offset_width = width;
        }
    }

    /// Set the bounding client rect.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(element) {
            node.rect = rect;
        }
    }

    /// Set the document scroll offset.
    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    /// Inline style value, if set.
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.node(element)?.style(property)
    }

    /// Inline style parsed as pixels.
    pub fn style_px(&self, element: ElementId, property: &str) -> Option<f64> {
        self.style(element, property)?
            .trim_end_matches("px")
            .parse()
            .ok()
    }

    /// Check a class on an element.
    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Whether the element is still part of the document.
    pub fn is_attached(&self, element: ElementId) -> bool {
        self.node(element).is_some_and(|n| n.attached)
    }

    /// Parent of an element.
    pub fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.node(element)?.parent
    }

    /// Children of an element, in document order.
    pub fn children_of(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Listeners subscribed to `kind` on `target`, oldest first.
    pub fn listeners_for(&self, target: EventTarget, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, (t, kinds))| *t == target && kinds.contains(&kind))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of live listener subscriptions.
    pub fn active_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of armed timeouts and intervals.
    pub fn active_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of requested, not yet delivered frames.
    pub fn pending_frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Drain all requested frames, oldest first.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    /// Virtual time since the host was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move the clock to the earliest timer due at or before `limit`
    /// and fire it. Intervals re-arm. Returns `None` when nothing is due.
    pub fn fire_next_timer(&mut self, limit: Duration) -> Option<TimerId> {
        let (id, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= limit)
            .min_by_key(|(id, t)| (t.due, **id))
            .map(|(id, t)| (*id, *t))?;
        self.elapsed = self.elapsed.max(timer.due);
        match timer.period {
            Some(period) => {
                if let Some(t) = self.timers.get_mut(&id) {
                    t.due += period.max(Duration::from_millis(1));
                }
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some(id)
    }

    /// Advance the clock by `by`, returning every timer fired on the way.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let limit = self.elapsed + by;
        let mut fired = Vec::new();
        while let Some(id) = self.fire_next_timer(limit) {
            fired.push(id);
        }
        self.elapsed = limit;
        fired
    }

    /// Finish a pending image load. Returns false if no load was watched.
    pub fn complete_load(&mut self, image: ElementId) -> bool {
        self.loads.remove(&image)
    }

    /// Images with a pending load watch.
    pub fn pending_loads(&self) -> Vec<ElementId> {
        self.loads.iter().copied().collect()
    }
}

impl Host for MemoryHost {
    fn resolve(&self, selector: &str) -> Option<ElementId> {
        self.find_descendant(self.html, selector)
    }

    fn query(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        self.find_descendant(root, selector)
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn document_element(&self) -> ElementId {
        self.html
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.node(element).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.remove(name);
        }
    }

    fn create_element(&mut self, spec: ElementSpec) -> ElementId {
        let mut node = Node {
            tag: spec.tag.to_lowercase(),
            classes: spec.class_name.split_whitespace().map(str::to_string).collect(),
            parent: Some(spec.parent),
            ..Node::default()
        };
        if let Some(src) = &spec.src {
            node.attributes.insert("src".to_string(), src.clone());
            if let Some(size) = self.image_sizes.get(src) {
                node.size = *size;
            }
        }
        if let Some(css) = &spec.style {
            for decl in css.split(';') {
                if let Some((k, v)) = decl.split_once(':') {
                    node.set_style(k.trim(), v.trim().to_string());
                }
            }
        }
        let attached = self.is_attached(spec.parent);
        node.attached = attached;
        let id = self.insert_node(node);
        if let Some(parent) = self.node_mut(spec.parent) {
            let index = spec
                .insert_before
                .and_then(|before| parent.children.iter().position(|c| *c == before))
                .unwrap_or(parent.children.len());
            parent.children.insert(index, id);
        }
        id
    }

    fn remove_element(&mut self, element: ElementId) {
        self.detach_from_parent(element);
        if let Some(node) = self.node_mut(element) {
            node.parent = None;
        }
        self.set_attached(element, false);
    }

    fn wrap(&mut self, element: ElementId, spec: ElementSpec) -> ElementId {
        let Some((parent, index)) = self.detach_from_parent(element) else {
            return element;
        };
        let wrapper = self.create_element(ElementSpec { parent, ..spec });
        // create_element appended the wrapper; move it into the old slot
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != wrapper);
            node.children.insert(index, wrapper);
        }
        if let Some(node) = self.node_mut(wrapper) {
            node.children.push(element);
        }
        if let Some(node) = self.node_mut(element) {
            node.parent = Some(wrapper);
        }
        wrapper
    }

    fn unwrap(&mut self, element: ElementId) {
        let Some(parent) = self.node(element).and_then(|n| n.parent) else {
            return;
        };
        if parent == self.body {
            return;
        }
        let Some((grandparent, index)) = self.detach_from_parent(parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != element);
            node.parent = None;
        }
        self.set_attached(parent, false);
        if let Some(node) = self.node_mut(grandparent) {
            node.children.insert(index, element);
        }
        if let Some(node) = self.node_mut(element) {
            node.parent = Some(grandparent);
        }
        self.set_attached(element, true);
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            for c in class.split_whitespace() {
                if !node.classes.iter().any(|existing| existing == c) {
                    node.classes.push(c.to_string());
                }
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            let remove: Vec<&str> = class.split_whitespace().collect();
            node.classes.retain(|c| !remove.contains(&c.as_str()));
        }
    }

    fn set_style(&mut self, element: ElementId, properties: &[(&str, String)]) {
        if let Some(node) = self.node_mut(element) {
            for (k, v) in properties {
                node.set_style(k, v.clone());
            }
        }
    }

    fn remove_style(&mut self, element: ElementId, property: &str) {
        if let Some(node) = self.node_mut(element) {
            node.style.retain(|(k, _)| k != property);
        }
    }

    fn style_text(&self, element: ElementId) -> String {
        self.node(element)
            .map(|n| {
                n.style
                    .iter()
                    .map(|(k, v)| format!("{}: {};", k, v))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    fn computed_style(&self, element: ElementId, property: &str) -> Option<String> {
        let node = self.node(element)?;
        match node.style(property) {
            Some(v) => Some(v.to_string()),
            None if property == "position" => Some("static".to_string()),
            None => None,
        }
    }

    fn computed_size(&self, element: ElementId) -> Size {
        let Some(node) = self.node(element) else {
            return Size::ZERO;
        };
        let parse = |prop: &str| {
            node.style(prop)
                .and_then(|v| v.strip_suffix("px"))
                .and_then(|v| v.parse::<f64>().ok())
        };
        Size::new(
            parse("width").unwrap_or(node.size.w),
            parse("height").unwrap_or(node.size.h),
        )
    }

    fn client_size(&self, element: ElementId) -> Size {
        self.node(element)
            .map(|n| n.client_size.unwrap_or(n.size))
            .unwrap_or_default()
    }

    fn offset_width(&self, element: ElementId) -> f64 {
        self.node(element).map(|n| n.offset_width).unwrap_or_default()
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.node(element).map(|n| n.rect).unwrap_or_default()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn listen(&mut self, target: EventTarget, kinds: &[EventKind]) -> ListenerId {
        let id = ListenerId(self.handle());
        self.listeners.insert(id, (target, kinds.to_vec()));
        id
    }

    fn unlisten(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.handle());
        self.frames.insert(id);
        id
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.remove(&frame);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.handle());
        self.timers.insert(
            id,
            Timer {
                due: self.elapsed + delay,
                period: None,
            },
        );
        id
    }

    fn set_interval(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.handle());
        self.timers.insert(
            id,
            Timer {
                due: self.elapsed + period,
                period: Some(period),
            },
        );
        id
    }

    fn clear_timer(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn watch_load(&mut self, image: ElementId) {
        self.loads.insert(image);
    }

    fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_by_class_id_and_tag() {
        let mut host = MemoryHost::new();
        let root = host.add_element("div", Some("viewer"), Size::new(100.0, 100.0));
        let inner = host.create_element(ElementSpec::new("div", "a b", root));
        let img = host.create_element(ElementSpec::new("img", "c", inner));

        assert_eq!(host.resolve("#viewer"), Some(root));
        assert_eq!(host.query(root, ".b"), Some(inner));
        assert_eq!(host.query(root, "img"), Some(img));
        assert_eq!(host.query(root, "img.c"), Some(img));
        assert_eq!(host.query(root, ".missing"), None);
    }

    #[test]
    fn test_insert_before() {
        let mut host = MemoryHost::new();
        let root = host.add_element("div", None, Size::ZERO);
        let second = host.create_element(ElementSpec::new("div", "second", root));
        let first =
            host.create_element(ElementSpec::new("img", "first", root).insert_before(second));
        assert_eq!(host.children_of(root), vec![first, second]);
    }

    #[test]
    fn test_inline_size_overrides_measured() {
        let mut host = MemoryHost::new();
        let el = host.add_element("div", None, Size::new(40.0, 30.0));
        host.set_style(el, &[("width", "80px".to_string())]);
        assert_eq!(host.computed_size(el), Size::new(80.0, 30.0));
        assert_eq!(host.computed_style(el, "position").as_deref(), Some("static"));
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let mut host = MemoryHost::new();
        let body = host.body();
        let img = host.add_element("img", None, Size::ZERO);
        let wrapper = host.wrap(img, ElementSpec::new("div", "wrap", body));
        assert_eq!(host.parent_of(img), Some(wrapper));
        assert_eq!(host.parent_of(wrapper), Some(body));

        host.unwrap(img);
        assert_eq!(host.parent_of(img), Some(body));
        assert!(!host.is_attached(wrapper));
        assert!(host.is_attached(img));
    }

    #[test]
    fn test_timers_fire_in_order_and_intervals_rearm() {
        let mut host = MemoryHost::new();
        let interval = host.set_interval(Duration::from_millis(50));
        let timeout = host.set_timeout(Duration::from_millis(120));

        let fired = host.advance(Duration::from_millis(150));
        assert_eq!(fired, vec![interval, interval, timeout, interval]);
        assert_eq!(host.active_timer_count(), 1);

        host.clear_timer(interval);
        assert!(host.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_listeners_and_frames() {
        let mut host = MemoryHost::new();
        let a = host.listen(EventTarget::Document, &[EventKind::MouseMove, EventKind::TouchMove]);
        let _b = host.listen(EventTarget::Window, &[EventKind::Resize]);
        assert_eq!(host.listeners_for(EventTarget::Document, EventKind::TouchMove), vec![a]);
        host.unlisten(a);
        assert_eq!(host.active_listener_count(), 1);

        let f1 = host.request_frame();
        let f2 = host.request_frame();
        host.cancel_frame(f1);
        assert_eq!(host.take_frames(), vec![f2]);
        assert_eq!(host.pending_frame_count(), 0);
    }

    #[test]
    fn test_registered_image_size() {
        let mut host = MemoryHost::new();
        host.register_image("a.png", Size::new(800.0, 600.0));
        let body = host.body();
        let img = host.create_element(ElementSpec::new("img", "", body).src("a.png"));
        host.watch_load(img);
        assert_eq!(host.computed_size(img), Size::new(800.0, 600.0));
        assert!(host.complete_load(img));
        assert!(!host.complete_load(img));
    }
}
