//! Controller tests, driven through [`Driver`] over a [`MemoryHost`].

use std::time::Duration;

use snapview_input::{
    DomEvent, EventKind, EventResponse, EventTarget, FrameId, Host, HostEvent, MemoryHost, Point,
    Rect, Size,
};

use super::{Viewer, ViewerTarget};
use crate::config::ViewerOptions;
use crate::constants::{VIEWER_MARKER, class};
use crate::error::ViewerError;
use crate::geometry::PanBounds;
use crate::testing::{Driver, Scene};

const EPSILON: f64 = 0.001;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn assert_rect(actual: Option<Rect>, expected: Rect) {
    let actual = actual.expect("rect styles set");
    assert!(
        approx_eq(actual.left, expected.left)
            && approx_eq(actual.top, expected.top)
            && approx_eq(actual.w, expected.w)
            && approx_eq(actual.h, expected.h),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn loaded() -> Driver {
    Driver::loaded(ViewerOptions::default()).unwrap()
}

fn zoomed(percent: f64) -> Driver {
    let mut d = loaded();
    d.controller_mut().zoom(percent, None).unwrap();
    d.run_frames().unwrap();
    d
}

fn assert_covered(d: &Driver) {
    let bounds = PanBounds::new(Size::new(400.0, 300.0), Size::new(400.0, 300.0));
    let rect = d.image_rect().unwrap();
    assert!(
        bounds.is_covered_by(rect.origin(), rect.size(), EPSILON),
        "image {:?} leaves the base rect uncovered",
        rect
    );
}

// ---- attach / detach ----

#[test]
fn test_attach_builds_markup() {
    let d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    let host = d.host();
    let el = d.elements();

    assert!(host.has_class(el.container, class::CONTAINER));
    assert_eq!(host.style(el.container, "position"), Some("relative"));
    assert_eq!(host.attribute(el.dom_element, VIEWER_MARKER).as_deref(), Some("enabled"));
    assert_eq!(host.parent_of(el.wrap), Some(el.container));
    assert_eq!(host.parent_of(el.snap_handle), Some(el.snap_image_wrap));
    assert_eq!(host.parent_of(el.zoom_handle), Some(el.zoom_slider));
    assert!(el.image.is_none());
    assert!(!el.is_image_mode());

    // three slider presses, six viewer routes, window resize
    assert_eq!(host.active_listener_count(), 10);
    assert!(host.pending_loads().is_empty());
}

#[test]
fn test_missing_target() {
    let err = Viewer::new(MemoryHost::new(), "#nope", ViewerOptions::default()).unwrap_err();
    assert!(matches!(err, ViewerError::ElementNotFound { ref selector } if selector == "#nope"));
}

#[test]
fn test_attach_twice_fails() {
    let mut host = MemoryHost::new();
    let div = host.add_element("div", Some("viewer"), Size::new(400.0, 300.0));
    host.set_attribute(div, VIEWER_MARKER, "enabled");
    let err = Viewer::new(host, div, ViewerOptions::default()).unwrap_err();
    assert!(matches!(err, ViewerError::AlreadyAttached));
}

#[test]
fn test_invalid_options_rejected() {
    let mut host = MemoryHost::new();
    host.add_element("div", Some("viewer"), Size::new(400.0, 300.0));
    let options = ViewerOptions {
        max_zoom: 50.0,
        ..ViewerOptions::default()
    };
    let err = Viewer::new(host, "#viewer", options).unwrap_err();
    assert!(matches!(err, ViewerError::InvalidOption { .. }));
}

#[test]
fn test_data_src_loads_on_construction() {
    let mut host = MemoryHost::new();
    host.register_image("photo.jpg", Size::new(800.0, 600.0));
    let div = host.add_element("div", Some("viewer"), Size::new(400.0, 300.0));
    host.set_attribute(div, "data-src", "photo.jpg");

    let viewer = Viewer::new(
        host,
        ViewerTarget::Selector("#viewer".to_string()),
        ViewerOptions::default(),
    )
    .unwrap();
    assert_eq!(viewer.sources().src.as_deref(), Some("photo.jpg"));
    assert_eq!(viewer.sources().hi_res, None);
    assert!(!viewer.state().is_loaded());
    assert_eq!(viewer.host().pending_loads().len(), 1);
}

#[test]
fn test_image_mode_wraps_and_unwraps() {
    let mut host = MemoryHost::new();
    host.register_image("photo.jpg", Size::new(800.0, 600.0));
    let img = host.add_element("img", Some("pic"), Size::new(800.0, 600.0));
    host.set_attribute(img, "src", "photo.jpg");
    host.set_attribute(img, "data-high-res-src", "photo-hd.jpg");
    let body = host.body();

    let mut viewer = Viewer::new(host, "#pic", ViewerOptions::default()).unwrap();
    let el = viewer.elements().clone();
    assert!(el.is_image_mode());
    assert_eq!(el.dom_element, img);
    assert_eq!(viewer.host().parent_of(img), Some(el.container));
    assert_eq!(viewer.host().parent_of(el.container), Some(body));
    assert!(viewer.host().has_class(el.container, class::IMAGE_MODE));
    assert_eq!(viewer.host().style(img, "opacity"), Some("0"));
    assert_eq!(viewer.host().style(img, "zIndex"), Some("-1"));
    assert_eq!(viewer.sources().src.as_deref(), Some("photo.jpg"));
    assert_eq!(viewer.sources().hi_res.as_deref(), Some("photo-hd.jpg"));

    viewer.destroy();
    let host = viewer.host();
    assert_eq!(host.parent_of(img), Some(body));
    assert!(!host.is_attached(el.container));
    assert_eq!(host.style(img, "opacity"), None);
    assert_eq!(host.style(img, "position"), None);
    assert_eq!(host.attribute(img, VIEWER_MARKER), None);
}

// ---- loading ----

#[test]
fn test_loader_until_loaded() {
    let mut d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    d.controller_mut().load("photo.jpg", None).unwrap();

    let el = d.elements().clone();
    let image = el.image.unwrap();
    assert!(!d.viewer().state().is_loaded());
    assert_eq!(d.host().style(el.loader, "display"), Some("block"));
    assert_eq!(d.host().style(image, "visibility"), Some("hidden"));
    assert_eq!(
        d.host().children_of(el.snap_image_wrap),
        vec![el.snap_image.unwrap(), el.snap_handle]
    );

    d.complete_loads().unwrap();
    d.run_frames().unwrap();
    assert!(d.viewer().state().is_loaded());
    assert_eq!(d.host().style(el.loader, "display"), Some("none"));
    assert_eq!(d.host().style(image, "visibility"), Some("visible"));
    assert_eq!(d.host().style(image, "maxWidth"), Some("none"));
    assert_rect(d.image_rect(), Rect::new(0.0, 0.0, 400.0, 300.0));
    assert_rect(d.snap_handle_rect(), Rect::new(0.0, 0.0, 160.0, 120.0));
    assert_eq!(d.viewer().state().zoom_track_length(), 140.0);
}

#[test]
fn test_portrait_image_is_centered() {
    let mut d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    d.load("tall.jpg", None).unwrap();
    assert_rect(d.image_rect(), Rect::new(150.0, 0.0, 100.0, 300.0));
    let snap_image = d.elements().snap_image.unwrap();
    assert_eq!(d.host().style_px(snap_image, "width"), Some(40.0));
    assert_eq!(d.host().style_px(snap_image, "height"), Some(120.0));
}

#[test]
fn test_initial_zoom_value() {
    let options = ViewerOptions {
        zoom_value: 200.0,
        ..ViewerOptions::default()
    };
    let d = Driver::loaded(options).unwrap();
    assert_eq!(d.zoom(), 200.0);
    assert_rect(d.image_rect(), Rect::new(-200.0, -150.0, 800.0, 600.0));
}

#[test]
fn test_reload_replaces_images() {
    let mut d = zoomed(200.0);
    let old = d.elements().image.unwrap();
    let old_snap = d.elements().snap_image.unwrap();

    d.controller_mut().load("tall.jpg", None).unwrap();
    let el = d.elements().clone();
    assert!(!d.host().is_attached(old));
    assert!(!d.host().is_attached(old_snap));
    assert_eq!(d.host().children_of(el.image_wrap).len(), 1);
    assert!(!d.viewer().state().is_loaded());
    assert!(!d.viewer().state().is_snap_view_visible());
    assert_eq!(d.host().style(el.snap_view, "opacity"), Some("0"));

    d.complete_loads().unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);
    assert_rect(d.image_rect(), Rect::new(150.0, 0.0, 100.0, 300.0));
}

#[test]
fn test_hi_res_swap_keeps_zoom() {
    let mut d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    d.controller_mut().load("photo.jpg", Some("photo-hd.jpg")).unwrap();
    let low = d.elements().image.unwrap();
    assert!(d.host_mut().complete_load(low));
    let response = d.dispatch(HostEvent::Loaded(low)).unwrap();
    assert_eq!(response, EventResponse::Handled);
    d.run_frames().unwrap();

    let pending = d.host().pending_loads();
    assert_eq!(pending.len(), 1);
    let hi = pending[0];
    assert!(d.host().has_class(hi, "iv-large-image"));
    assert_eq!(d.host().style(hi, "visibility"), Some("visible"));
    assert_eq!(d.elements().image, Some(low));

    d.controller_mut().zoom(250.0, None).unwrap();
    d.run_frames().unwrap();
    d.complete_loads().unwrap();

    assert_eq!(d.elements().image, Some(hi));
    assert!(!d.host().is_attached(low));
    assert_eq!(d.zoom(), 250.0);
    assert_rect(d.image_rect(), Rect::new(-300.0, -225.0, 1000.0, 750.0));
}

#[test]
fn test_stale_load_ignored() {
    let mut d = loaded();
    let image = d.elements().image.unwrap();
    let response = d.dispatch(HostEvent::Loaded(image)).unwrap();
    assert_eq!(response, EventResponse::Ignored);
}

#[test]
fn test_unmeasurable_image_fails() {
    let mut d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    d.controller_mut().load("missing.jpg", None).unwrap();
    let err = d.complete_loads().unwrap_err();
    assert!(matches!(err, ViewerError::MissingGeometry { what: "image size" }));
}

#[test]
fn test_broken_load_stays_loading() {
    let mut d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    d.controller_mut().load("photo.jpg", None).unwrap();
    d.advance(Duration::from_secs(5)).unwrap();

    assert!(!d.viewer().state().is_loaded());
    assert_eq!(d.host().style(d.elements().loader, "display"), Some("block"));
    assert_eq!(d.wheel(Point::new(100.0, 100.0), 1.0).unwrap(), EventResponse::Ignored);
    assert_eq!(d.click(Point::new(100.0, 100.0)).unwrap(), EventResponse::Ignored);
}

#[test]
fn test_empty_load_source_rejected() {
    let mut d = loaded();
    let err = d.controller_mut().load("", None).unwrap_err();
    assert!(matches!(err, ViewerError::InvalidOption { .. }));
    assert!(d.viewer().state().is_loaded());
}

// ---- zoom ----

#[test]
fn test_zoom_before_load_is_noop() {
    let mut d = Driver::new(Scene::default(), ViewerOptions::default()).unwrap();
    d.controller_mut().zoom(200.0, None).unwrap();
    assert_eq!(d.zoom(), 100.0);
    assert_eq!(d.host().pending_frame_count(), 0);
}

#[test]
fn test_drag_before_load_is_ignored() {
    let mut d = Driver::new(
        Scene::default(),
        ViewerOptions {
            zoom_value: 200.0,
            ..Default::default()
        },
    )
    .unwrap();
    let image_wrap = d.elements().image_wrap;

    let down = d.mouse_down(image_wrap, Point::new(100.0, 100.0)).unwrap();
    assert_ne!(down, EventResponse::PreventDefault);
    let _ = d.mouse_move(image_wrap, Point::new(60.0, 80.0)).unwrap();

    assert!(!d.viewer().image_slider.is_active());
    assert_eq!(d.host().active_timer_count(), 0);
}

#[test]
fn test_zoom_clamped_and_rounded() {
    let mut d = zoomed(1000.0);
    assert_eq!(d.zoom(), 500.0);

    d.controller_mut().zoom(50.0, None).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);

    d.controller_mut().zoom(150.4, None).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 150.0);
}

#[test]
fn test_zoom_first_tick_is_synchronous() {
    let mut d = loaded();
    d.controller_mut().zoom(300.0, None).unwrap();
    assert!(d.zoom() > 100.0 && d.zoom() < 300.0);
    assert!(d.viewer().is_animating());
    assert_eq!(d.host().pending_frame_count(), 1);

    assert_eq!(d.run_frames().unwrap(), 15);
    assert_eq!(d.zoom(), 300.0);
    assert!(!d.viewer().is_animating());
}

#[test]
fn test_zoom_about_center() {
    let d = zoomed(200.0);
    assert_rect(d.image_rect(), Rect::new(-200.0, -150.0, 800.0, 600.0));
    assert_rect(d.snap_handle_rect(), Rect::new(40.0, 30.0, 80.0, 60.0));
    assert_eq!(d.host().style_px(d.elements().zoom_handle, "left"), Some(35.0));
}

#[test]
fn test_zoom_keeps_focal_point() {
    let mut d = loaded();
    d.controller_mut().zoom(200.0, Some(Point::new(100.0, 100.0))).unwrap();
    d.run_frames().unwrap();
    assert_rect(d.image_rect(), Rect::new(-100.0, -100.0, 800.0, 600.0));
}

#[test]
fn test_zoom_handle_follows_zoom() {
    let d = zoomed(300.0);
    assert_eq!(d.host().style_px(d.elements().zoom_handle, "left"), Some(70.0));
}

#[test]
fn test_every_zoom_frame_covers_base() {
    let mut d = zoomed(250.0);
    d.controller_mut().zoom(120.0, Some(Point::new(400.0, 300.0))).unwrap();
    loop {
        assert_covered(&d);
        let frames = d.host_mut().take_frames();
        if frames.is_empty() {
            break;
        }
        for frame in frames {
            let _ = d.dispatch(HostEvent::Frame(frame)).unwrap();
        }
    }
    assert_eq!(d.zoom(), 120.0);
}

#[test]
fn test_new_zoom_replaces_running_one() {
    let mut d = loaded();
    d.controller_mut().zoom(400.0, None).unwrap();
    d.controller_mut().zoom(200.0, None).unwrap();
    assert_eq!(d.host().pending_frame_count(), 1);
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 200.0);
}

#[test]
fn test_reset_zoom_without_animation() {
    let mut d = zoomed(300.0);
    d.controller_mut().reset_zoom(false).unwrap();
    assert_eq!(d.zoom(), 100.0);
    assert_eq!(d.host().pending_frame_count(), 0);
    assert_rect(d.image_rect(), Rect::new(0.0, 0.0, 400.0, 300.0));
}

#[test]
fn test_unknown_frame_ignored() {
    let mut d = loaded();
    let response = d.dispatch(HostEvent::Frame(FrameId(9999))).unwrap();
    assert_eq!(response, EventResponse::Ignored);
}

// ---- panning ----

#[test]
fn test_image_drag_pans() {
    let mut d = zoomed(200.0);
    let image_wrap = d.elements().image_wrap;
    d.drag(
        image_wrap,
        Point::new(200.0, 150.0),
        Point::new(150.0, 150.0),
        10,
        Duration::from_millis(100),
    )
    .unwrap();

    assert!(!d.viewer().is_animating());
    assert_rect(d.image_rect(), Rect::new(-250.0, -150.0, 800.0, 600.0));
    assert_rect(d.snap_handle_rect(), Rect::new(50.0, 30.0, 80.0, 60.0));
    assert_covered(&d);
}

#[test]
fn test_image_drag_clamped() {
    let mut d = zoomed(200.0);
    let image_wrap = d.elements().image_wrap;
    d.drag(
        image_wrap,
        Point::new(200.0, 150.0),
        Point::new(1200.0, 150.0),
        10,
        Duration::from_millis(100),
    )
    .unwrap();

    assert_rect(d.image_rect(), Rect::new(0.0, -150.0, 800.0, 600.0));
    assert_covered(&d);
}

#[test]
fn test_image_drag_disabled_at_base_zoom() {
    let mut d = loaded();
    let image_wrap = d.elements().image_wrap;
    let response = d.mouse_down(image_wrap, Point::new(200.0, 150.0)).unwrap();
    assert_eq!(response, EventResponse::Ignored);
    assert!(d.host().listeners_for(EventTarget::Document, EventKind::MouseMove).is_empty());
    assert!(!d.viewer().image_slider.is_active());
}

#[test]
fn test_press_prevents_default() {
    let mut d = zoomed(200.0);
    let image_wrap = d.elements().image_wrap;
    let response = d.mouse_down(image_wrap, Point::new(200.0, 150.0)).unwrap();
    assert_eq!(response, EventResponse::PreventDefault);
    assert!(d.viewer().image_slider.is_active());

    // context menu ends the drag
    let response = d.emit(EventTarget::Document, DomEvent::ContextMenu).unwrap();
    assert_eq!(response, EventResponse::Handled);
    assert!(!d.viewer().image_slider.is_active());
}

#[test]
fn test_fast_drag_launches_momentum() {
    let mut d = zoomed(300.0);
    let image_wrap = d.elements().image_wrap;
    d.drag(
        image_wrap,
        Point::new(300.0, 150.0),
        Point::new(100.0, 150.0),
        4,
        Duration::from_millis(25),
    )
    .unwrap();

    assert!(d.viewer().is_animating());
    let released = d.image_rect().unwrap();
    assert!(released.left < -600.0 + EPSILON);

    let ran = d.run_frames().unwrap();
    assert!(ran > 0 && ran < 60);
    assert!(!d.viewer().is_animating());
    // carried to the right edge and clamped there
    assert_rect(d.image_rect(), Rect::new(-800.0, -300.0, 1200.0, 900.0));
    assert_covered(&d);
}

#[test]
fn test_press_stops_momentum() {
    let mut d = zoomed(300.0);
    let image_wrap = d.elements().image_wrap;
    d.drag(
        image_wrap,
        Point::new(300.0, 150.0),
        Point::new(100.0, 150.0),
        4,
        Duration::from_millis(25),
    )
    .unwrap();
    assert!(d.viewer().is_animating());

    let _ = d.mouse_down(image_wrap, Point::new(200.0, 150.0)).unwrap();
    assert!(!d.viewer().is_animating());
    assert_eq!(d.host().pending_frame_count(), 0);
}

#[test]
fn test_zoom_stops_momentum() {
    let mut d = zoomed(300.0);
    let image_wrap = d.elements().image_wrap;
    d.drag(
        image_wrap,
        Point::new(300.0, 150.0),
        Point::new(100.0, 150.0),
        4,
        Duration::from_millis(25),
    )
    .unwrap();
    assert!(d.viewer().momentum.is_some());

    d.controller_mut().zoom(200.0, None).unwrap();
    assert!(d.viewer().momentum.is_none());
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 200.0);
}

#[test]
fn test_snap_handle_drag_moves_image() {
    let mut d = zoomed(200.0);
    let handle = d.elements().snap_handle;
    d.drag(
        handle,
        Point::new(50.0, 50.0),
        Point::new(70.0, 50.0),
        2,
        Duration::from_millis(16),
    )
    .unwrap();

    assert_rect(d.snap_handle_rect(), Rect::new(60.0, 30.0, 80.0, 60.0));
    assert_rect(d.image_rect(), Rect::new(-300.0, -150.0, 800.0, 600.0));
}

#[test]
fn test_snap_handle_stays_in_snap_image() {
    let mut d = zoomed(200.0);
    let handle = d.elements().snap_handle;
    d.drag(
        handle,
        Point::new(50.0, 50.0),
        Point::new(550.0, -450.0),
        2,
        Duration::from_millis(16),
    )
    .unwrap();

    assert_rect(d.snap_handle_rect(), Rect::new(80.0, 0.0, 80.0, 60.0));
    assert_rect(d.image_rect(), Rect::new(-400.0, 0.0, 800.0, 600.0));
    assert_covered(&d);
}

#[test]
fn test_zoom_track_press_and_drag() {
    let mut d = loaded();
    let track = d.elements().zoom_slider;
    // track starts at x = 10, handle is 20 wide: x = 90 centers it 70px in
    let response = d.mouse_down(track, Point::new(90.0, 140.0)).unwrap();
    assert_eq!(response, EventResponse::PreventDefault);
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 300.0);
    assert_eq!(d.host().style_px(d.elements().zoom_handle, "left"), Some(70.0));

    let _ = d.mouse_move(track, Point::new(500.0, 140.0)).unwrap();
    let _ = d.mouse_up(track, Point::new(500.0, 140.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 500.0);
}

#[test]
fn test_zoom_track_respects_scroll() {
    let mut d = loaded();
    d.host_mut().set_scroll(Point::new(30.0, 0.0));
    let track = d.elements().zoom_slider;
    let _ = d.mouse_down(track, Point::new(120.0, 140.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 300.0);
}

// ---- recognizers ----

#[test]
fn test_wheel_zooms_about_pointer() {
    let mut d = loaded();
    let response = d.wheel(Point::new(100.0, 100.0), 1.0).unwrap();
    assert_eq!(response, EventResponse::PreventDefault);
    assert!(d.viewer().state().is_snap_view_visible());
    d.run_frames().unwrap();

    assert_eq!(d.zoom(), 115.0);
    assert_rect(d.image_rect(), Rect::new(-15.0, -15.0, 460.0, 345.0));
}

#[test]
fn test_wheel_delta_clamped() {
    let mut d = loaded();
    let _ = d.wheel(Point::new(200.0, 150.0), 40.0).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 115.0);
}

#[test]
fn test_wheel_disabled_by_option() {
    let options = ViewerOptions {
        zoom_on_mouse_wheel: false,
        ..ViewerOptions::default()
    };
    let mut d = Driver::loaded(options).unwrap();
    let response = d.wheel(Point::new(100.0, 100.0), 1.0).unwrap();
    assert_eq!(response, EventResponse::Ignored);
    assert_eq!(d.host().pending_frame_count(), 0);
    assert_eq!(d.zoom(), 100.0);
}

#[test]
fn test_wheel_rejects_after_five_out_of_range() {
    let mut d = zoomed(500.0);
    let at = Point::new(200.0, 150.0);

    for _ in 0..5 {
        let _ = d.wheel(at, 1.0).unwrap();
        assert_eq!(d.host().pending_frame_count(), 1);
    }
    let _ = d.wheel(at, 1.0).unwrap();
    assert_eq!(d.viewer().wheel.rejections(), 6.0);
    assert_eq!(d.host().pending_frame_count(), 0);

    // back in range resets the counter
    let _ = d.wheel(at, -1.0).unwrap();
    assert_eq!(d.viewer().wheel.rejections(), 0.0);
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 425.0);
}

#[test]
fn test_double_tap_toggles() {
    let mut d = loaded();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.advance(Duration::from_millis(100)).unwrap();
    let _ = d.click(Point::new(110.0, 105.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 200.0);

    d.advance(Duration::from_millis(600)).unwrap();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.advance(Duration::from_millis(100)).unwrap();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);
}

#[test]
fn test_late_tap_starts_new_sequence() {
    let mut d = loaded();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.advance(Duration::from_millis(600)).unwrap();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);

    d.advance(Duration::from_millis(100)).unwrap();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 200.0);
}

#[test]
fn test_diagonal_double_tap() {
    let mut d = loaded();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.advance(Duration::from_millis(100)).unwrap();
    let _ = d.click(Point::new(140.0, 140.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 200.0);
}

#[test]
fn test_double_tap_with_fractional_zoom_value() {
    let mut d = Driver::loaded(ViewerOptions {
        zoom_value: 150.5,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(d.zoom(), 151.0);

    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.advance(Duration::from_millis(100)).unwrap();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 200.0);
}

#[test]
fn test_far_taps_do_not_zoom() {
    let mut d = loaded();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.advance(Duration::from_millis(100)).unwrap();
    let _ = d.click(Point::new(200.0, 100.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);
}

#[test]
fn test_reload_forgets_pending_tap() {
    let mut d = loaded();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.load("photo.jpg", None).unwrap();
    let _ = d.click(Point::new(100.0, 100.0)).unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);
}

#[test]
fn test_pinch_zoom() {
    let mut d = zoomed(150.0);
    let image_wrap = d.elements().image_wrap;
    let listeners = d.host().active_listener_count();

    let response = d
        .touch_start(image_wrap, &[Point::new(150.0, 150.0), Point::new(250.0, 150.0)])
        .unwrap();
    assert_eq!(response, EventResponse::PreventDefault);
    assert!(d.viewer().state().is_zooming());
    assert!(!d.viewer().image_slider.is_active());
    assert_eq!(d.host().active_timer_count(), 0);

    let _ = d
        .touch_move(image_wrap, &[Point::new(130.0, 150.0), Point::new(270.0, 150.0)])
        .unwrap();
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 170.0);

    let _ = d.touch_end(image_wrap, &[]).unwrap();
    assert!(!d.viewer().state().is_zooming());
    assert_eq!(d.host().active_listener_count(), listeners);
}

#[test]
fn test_single_touch_is_not_a_pinch() {
    let mut d = loaded();
    let image_wrap = d.elements().image_wrap;
    let _ = d.touch_start(image_wrap, &[Point::new(150.0, 150.0)]).unwrap();
    assert!(!d.viewer().state().is_zooming());
    assert!(!d.viewer().pinch.is_active());
}

// ---- snap view ----

#[test]
fn test_snap_view_auto_hides() {
    let mut d = zoomed(200.0);
    let snap_view = d.elements().snap_view;
    let image_wrap = d.elements().image_wrap;

    let _ = d.mouse_move(image_wrap, Point::new(100.0, 100.0)).unwrap();
    assert_eq!(d.host().style(snap_view, "opacity"), Some("1"));
    assert_eq!(d.host().style(snap_view, "pointerEvents"), Some("inherit"));

    d.advance(Duration::from_millis(1499)).unwrap();
    assert!(d.viewer().state().is_snap_view_visible());
    d.advance(Duration::from_millis(2)).unwrap();
    assert!(!d.viewer().state().is_snap_view_visible());
    assert_eq!(d.host().style(snap_view, "opacity"), Some("0"));
    assert_eq!(d.host().style(snap_view, "pointerEvents"), Some("none"));
}

#[test]
fn test_snap_view_needs_zoom() {
    let mut d = loaded();
    let image_wrap = d.elements().image_wrap;
    let _ = d.mouse_move(image_wrap, Point::new(100.0, 100.0)).unwrap();
    assert!(!d.viewer().state().is_snap_view_visible());
}

#[test]
fn test_snap_view_stays_while_hovered() {
    let mut d = zoomed(200.0);
    let snap_view = d.elements().snap_view;

    let _ = d.emit(EventTarget::Element(snap_view), DomEvent::MouseEnter).unwrap();
    assert!(d.viewer().state().is_snap_view_visible());
    assert_eq!(d.host().active_timer_count(), 0);
    d.advance(Duration::from_secs(3)).unwrap();
    assert!(d.viewer().state().is_snap_view_visible());

    let _ = d.emit(EventTarget::Element(snap_view), DomEvent::MouseLeave).unwrap();
    d.advance(Duration::from_millis(1600)).unwrap();
    assert!(!d.viewer().state().is_snap_view_visible());
}

#[test]
fn test_snap_view_disabled_by_option() {
    let options = ViewerOptions {
        snap_view: false,
        ..ViewerOptions::default()
    };
    let mut d = Driver::loaded(options).unwrap();
    d.controller_mut().zoom(200.0, None).unwrap();
    d.run_frames().unwrap();
    let image_wrap = d.elements().image_wrap;
    let _ = d.mouse_move(image_wrap, Point::new(100.0, 100.0)).unwrap();
    assert!(!d.viewer().state().is_snap_view_visible());
    d.controller_mut().show_snap_view(true).unwrap();
    assert!(!d.viewer().state().is_snap_view_visible());
}

// ---- refresh / destroy ----

#[test]
fn test_refresh_remeasures() {
    let mut d = zoomed(300.0);
    let container = d.elements().container;
    d.host_mut().set_size(container, Size::new(200.0, 150.0));
    d.controller_mut().refresh().unwrap();
    d.run_frames().unwrap();

    assert_eq!(d.zoom(), 100.0);
    assert_rect(d.image_rect(), Rect::new(0.0, 0.0, 200.0, 150.0));
}

#[test]
fn test_window_resize_refreshes() {
    let mut d = zoomed(300.0);
    let response = d.emit(EventTarget::Window, DomEvent::Resize).unwrap();
    assert_eq!(response, EventResponse::Handled);
    d.run_frames().unwrap();
    assert_eq!(d.zoom(), 100.0);
}

#[test]
fn test_no_resize_listener_when_disabled() {
    let options = ViewerOptions {
        refresh_on_resize: false,
        ..ViewerOptions::default()
    };
    let d = Driver::loaded(options).unwrap();
    assert!(d.host().listeners_for(EventTarget::Window, EventKind::Resize).is_empty());
}

#[test]
fn test_destroy_releases_everything() {
    let mut d = zoomed(300.0);
    let el = d.elements().clone();
    // momentum running, sampler cleared, snap view timeout armed
    d.drag(
        el.image_wrap,
        Point::new(300.0, 150.0),
        Point::new(100.0, 150.0),
        4,
        Duration::from_millis(25),
    )
    .unwrap();
    assert!(d.viewer().is_animating());
    assert!(d.host().active_timer_count() > 0);

    d.controller_mut().destroy();
    let host = d.host();
    assert_eq!(host.active_listener_count(), 0);
    assert_eq!(host.active_timer_count(), 0);
    assert_eq!(host.pending_frame_count(), 0);
    assert!(!host.is_attached(el.wrap));
    assert!(!host.has_class(el.container, class::CONTAINER));
    assert_eq!(host.style(el.container, "position"), None);
    assert_eq!(host.attribute(el.dom_element, VIEWER_MARKER), None);

    d.controller_mut().destroy();
    assert!(d.viewer().is_destroyed());
    let response = d.dispatch(HostEvent::Frame(FrameId(1))).unwrap();
    assert_eq!(response, EventResponse::Ignored);
    assert!(matches!(d.controller_mut().zoom(200.0, None), Err(ViewerError::Destroyed)));
    assert!(matches!(d.controller_mut().load("photo.jpg", None), Err(ViewerError::Destroyed)));
}

#[test]
fn test_destroy_keeps_author_position() {
    let mut host = MemoryHost::new();
    let div = host.add_element("div", Some("viewer"), Size::new(400.0, 300.0));
    host.set_style(div, &[("position", "absolute".to_string())]);
    let mut viewer = Viewer::new(host, div, ViewerOptions::default()).unwrap();
    viewer.destroy();
    assert_eq!(viewer.host().style(div, "position"), Some("absolute"));
}
