//! Image loading and measurement.

use snapview_input::{ElementId, ElementSpec, EventResponse, Host, px};

use super::Viewer;
use super::dom::ImageSources;
use crate::constants::{MIN_ZOOM, class};
use crate::error::{Result, ViewerError};
use crate::geometry;

impl<H: Host> Viewer<H> {
    /// Replace the displayed image. `hi_res`, when given, is swapped in once
    /// the low resolution image has loaded.
    pub fn load(&mut self, src: &str, hi_res: Option<&str>) -> Result<()> {
        self.ensure_alive()?;
        let sources = ImageSources::new(Some(src), hi_res);
        if sources.src.is_none() {
            return Err(ViewerError::invalid_option("image source must not be empty"));
        }
        self.sources = sources;
        self.load_images();
        Ok(())
    }

    /// Drop the current images and start loading `sources.src`.
    pub(super) fn load_images(&mut self) {
        let Some(src) = self.sources.src.clone() else {
            return;
        };
        log::info!("Loading image {}", src);

        self.stop_animations();
        self.wheel.reset();
        self.taps.reset();
        for old in [self.elements.image.take(), self.elements.snap_image.take()]
            .into_iter()
            .flatten()
        {
            self.host.remove_element(old);
        }
        if let Some(hi_res) = self.pending.hi_res.take() {
            self.host.remove_element(hi_res);
        }

        let snap_image = self.host.create_element(
            ElementSpec::new("img", class::SNAP_IMAGE, self.elements.snap_image_wrap)
                .src(src.as_str())
                .insert_before(self.elements.snap_handle),
        );
        let image = self.host.create_element(
            ElementSpec::new("img", class::SMALL_IMAGE, self.elements.image_wrap).src(src.as_str()),
        );
        self.elements.image = Some(image);
        self.elements.snap_image = Some(snap_image);
        self.state.loaded = false;

        self.host
            .set_style(self.elements.loader, &[("display", "block".to_string())]);
        self.host
            .set_style(image, &[("visibility", "hidden".to_string())]);
        self.hide_snap_view_now();

        self.pending.image = Some(image);
        self.host.watch_load(image);
    }

    pub(super) fn on_loaded(&mut self, element: ElementId) -> Result<EventResponse> {
        if self.pending.image == Some(element) {
            self.pending.image = None;
            self.image_loaded(element)?;
            return Ok(EventResponse::Handled);
        }
        if self.pending.hi_res == Some(element) {
            self.pending.hi_res = None;
            self.hi_res_loaded(element)?;
            return Ok(EventResponse::Handled);
        }
        log::debug!("Load of {:?} is stale, ignoring", element);
        Ok(EventResponse::Ignored)
    }

    fn image_loaded(&mut self, image: ElementId) -> Result<()> {
        self.host
            .set_style(self.elements.loader, &[("display", "none".to_string())]);
        self.host
            .set_style(image, &[("visibility", "visible".to_string())]);

        if let Some(hi_res) = self.sources.hi_res.clone() {
            self.load_hi_res(&hi_res, image);
        }

        self.state.loaded = true;
        self.calculate_dimensions()?;
        log::info!("Image loaded, base size {:?}", self.state.image);
        self.zoom_to(self.options.zoom_value, None, true)
    }

    /// Start the high resolution image behind the low one, with its styles.
    fn load_hi_res(&mut self, src: &str, low_res: ElementId) {
        let style = self.host.style_text(low_res);
        let mut spec =
            ElementSpec::new("img", class::LARGE_IMAGE, self.elements.image_wrap).src(src);
        if !style.is_empty() {
            spec = spec.style(style);
        }
        let hi_res = self.host.create_element(spec);
        self.pending.hi_res = Some(hi_res);
        self.host.watch_load(hi_res);
    }

    /// The high resolution image becomes the image; the zoom carries over.
    fn hi_res_loaded(&mut self, hi_res: ElementId) -> Result<()> {
        if let Some(low_res) = self.elements.image.replace(hi_res) {
            self.host.remove_element(low_res);
        }
        let zoom = self.state.zoom;
        self.calculate_dimensions()?;
        log::debug!("High resolution image in place at {}%", zoom);
        self.zoom_to(zoom, None, false)
    }

    /// Measure the container, fit the image into it and size the snap view.
    /// Leaves the image centred at zoom 100.
    pub(super) fn calculate_dimensions(&mut self) -> Result<()> {
        let Some(image) = self.elements.image else {
            return Ok(());
        };
        let natural = self.host.computed_size(image);
        if natural.is_empty() {
            return Err(ViewerError::missing_geometry("image size"));
        }
        let container = self.host.computed_size(self.elements.container);
        let snap_view = self.host.client_size(self.elements.snap_view);

        let fitted = geometry::fit_image_to_container(natural, container);
        let pos = geometry::centered(fitted, container);
        self.host.set_style(
            image,
            &[
                ("width", px(fitted.w)),
                ("height", px(fitted.h)),
                ("left", px(pos.x)),
                ("top", px(pos.y)),
                ("maxWidth", "none".to_string()),
                ("maxHeight", "none".to_string()),
            ],
        );

        let snap_image = geometry::snap_image_size(fitted, snap_view);
        if let Some(element) = self.elements.snap_image {
            self.host.set_style(
                element,
                &[("width", px(snap_image.w)), ("height", px(snap_image.h))],
            );
        }

        self.state.container = Some(container);
        self.state.image = Some(fitted);
        self.state.snap_image = Some(snap_image);
        self.state.image_pos = pos;
        self.state.zoom = MIN_ZOOM;
        self.state.zoom_track_length =
            snap_view.w - self.host.offset_width(self.elements.zoom_handle);
        log::debug!(
            "Measured container {:?}, image {:?}, snap image {:?}",
            container,
            fitted,
            snap_image
        );
        Ok(())
    }
}
