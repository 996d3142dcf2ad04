//! Attaching to and detaching from the page.

use snapview_input::{ElementId, ElementSpec, Host, must_query};

use crate::constants::{VIEWER_MARKER, class};
use crate::error::{Result, ViewerError};

/// Where a viewer attaches.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerTarget {
    Element(ElementId),
    Selector(String),
}

impl From<ElementId> for ViewerTarget {
    fn from(element: ElementId) -> Self {
        ViewerTarget::Element(element)
    }
}

impl From<&str> for ViewerTarget {
    fn from(selector: &str) -> Self {
        ViewerTarget::Selector(selector.to_string())
    }
}

impl From<String> for ViewerTarget {
    fn from(selector: String) -> Self {
        ViewerTarget::Selector(selector)
    }
}

/// Low and high resolution sources of the current image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSources {
    pub src: Option<String>,
    pub hi_res: Option<String>,
}

impl ImageSources {
    /// Sources from optional strings; empty strings count as absent.
    pub fn new(src: Option<&str>, hi_res: Option<&str>) -> Self {
        let keep = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            src: keep(src),
            hi_res: keep(hi_res),
        }
    }
}

/// Elements the viewer owns or decorates.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerElements {
    /// The element the viewer was attached to
    pub dom_element: ElementId,
    /// The element holding the markup. Differs from `dom_element` in image mode.
    pub container: ElementId,
    pub wrap: ElementId,
    pub loader: ElementId,
    pub snap_view: ElementId,
    pub snap_image_wrap: ElementId,
    pub snap_handle: ElementId,
    pub zoom_slider: ElementId,
    pub zoom_handle: ElementId,
    pub image_wrap: ElementId,
    /// Main image, once a load has started
    pub image: Option<ElementId>,
    pub snap_image: Option<ElementId>,
    /// `position: relative` was added to the container
    pub(crate) positioned: bool,
}

impl ViewerElements {
    /// Whether the viewer wrapped an `<img>`.
    pub fn is_image_mode(&self) -> bool {
        self.dom_element != self.container
    }
}

/// Resolve the target, wrap it in image mode, build the markup.
pub(super) fn attach<H: Host>(
    host: &mut H,
    target: ViewerTarget,
) -> Result<(ViewerElements, ImageSources)> {
    let dom_element = match target {
        ViewerTarget::Element(element) => element,
        ViewerTarget::Selector(selector) => host
            .resolve(&selector)
            .ok_or(ViewerError::ElementNotFound { selector })?,
    };

    if host.attribute(dom_element, VIEWER_MARKER).is_some() {
        return Err(ViewerError::AlreadyAttached);
    }

    let hi_res = host
        .attribute(dom_element, "high-res-src")
        .or_else(|| host.attribute(dom_element, "data-high-res-src"));

    let (container, sources) = if host.tag_name(dom_element) == "img" {
        let src = host.attribute(dom_element, "src");
        let spec = ElementSpec::new(
            "div",
            format!("{} {}", class::CONTAINER, class::IMAGE_MODE),
            host.body(),
        )
        .style("display: inline-block; overflow: hidden");
        let container = host.wrap(dom_element, spec);
        host.set_style(
            dom_element,
            &[
                ("opacity", "0".to_string()),
                ("position", "relative".to_string()),
                ("zIndex", "-1".to_string()),
            ],
        );
        (container, ImageSources::new(src.as_deref(), hi_res.as_deref()))
    } else {
        let src = host
            .attribute(dom_element, "src")
            .or_else(|| host.attribute(dom_element, "data-src"));
        (dom_element, ImageSources::new(src.as_deref(), hi_res.as_deref()))
    };

    let positioned = build_markup(host, container);
    let elements = ViewerElements {
        dom_element,
        container,
        wrap: must_query(host, container, &format!(".{}", class::WRAP))?,
        loader: must_query(host, container, &format!(".{}", class::LOADER))?,
        snap_view: must_query(host, container, &format!(".{}", class::SNAP_VIEW))?,
        snap_image_wrap: must_query(host, container, &format!(".{}", class::SNAP_IMAGE_WRAP))?,
        snap_handle: must_query(host, container, &format!(".{}", class::SNAP_HANDLE))?,
        zoom_slider: must_query(host, container, &format!(".{}", class::ZOOM_SLIDER))?,
        zoom_handle: must_query(host, container, &format!(".{}", class::ZOOM_HANDLE))?,
        image_wrap: must_query(host, container, &format!(".{}", class::IMAGE_WRAP))?,
        image: None,
        snap_image: None,
        positioned,
    };
    Ok((elements, sources))
}

/// Append the viewer markup to `container`. Returns whether the container
/// had to be made `position: relative`.
fn build_markup<H: Host>(host: &mut H, container: ElementId) -> bool {
    let div = |parent, class_name: &str| ElementSpec::new("div", class_name, parent);

    let wrap = host.create_element(div(container, class::WRAP));
    host.create_element(div(wrap, class::LOADER));
    let snap_view = host.create_element(div(wrap, class::SNAP_VIEW));
    let snap_image_wrap = host.create_element(div(snap_view, class::SNAP_IMAGE_WRAP));
    host.create_element(div(snap_image_wrap, class::SNAP_HANDLE));
    let zoom_slider = host.create_element(div(snap_view, class::ZOOM_SLIDER));
    host.create_element(div(zoom_slider, class::ZOOM_HANDLE));
    let image_view = host.create_element(div(wrap, class::IMAGE_VIEW));
    host.create_element(div(image_view, class::IMAGE_WRAP));

    host.add_class(container, class::CONTAINER);
    if host.computed_style(container, "position").as_deref() == Some("static") {
        host.set_style(container, &[("position", "relative".to_string())]);
        return true;
    }
    false
}

/// Undo [`attach`]: remove the markup and restore the target element.
pub(super) fn detach<H: Host>(host: &mut H, elements: &ViewerElements) {
    host.remove_element(elements.wrap);
    host.remove_class(elements.container, class::CONTAINER);
    if elements.positioned {
        host.remove_style(elements.container, "position");
    }
    if elements.is_image_mode() {
        for property in ["opacity", "position", "zIndex"] {
            host.remove_style(elements.dom_element, property);
        }
        host.unwrap(elements.dom_element);
    }
    host.remove_attribute(elements.dom_element, VIEWER_MARKER);
}
