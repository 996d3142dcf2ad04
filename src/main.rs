// Native entry point: a scripted headless session
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = demo::run() {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::Duration;

    use snapview::input::Point;
    use snapview::testing::Driver;
    use snapview::{Result, ViewerOptions};

    fn report(d: &Driver, step: &str) {
        let state = d.viewer().state();
        log::info!(
            "{:<28} zoom {:>6.1}%  image {:?}  snap view {}",
            step,
            state.zoom(),
            d.image_rect(),
            if state.is_snap_view_visible() { "shown" } else { "hidden" }
        );
    }

    /// Walk a viewer through every gesture it understands.
    pub fn run() -> Result<()> {
        let mut d = Driver::loaded(ViewerOptions::default())?;
        report(&d, "loaded photo.jpg");

        d.load("photo.jpg", Some("photo-hd.jpg"))?;
        report(&d, "swapped in photo-hd.jpg");

        let _ = d.wheel(Point::new(100.0, 100.0), 1.0)?;
        d.run_frames()?;
        report(&d, "wheel at (100, 100)");

        d.controller_mut().zoom(300.0, None)?;
        d.run_frames()?;
        report(&d, "zoom(300)");

        let image_wrap = d.elements().image_wrap;
        d.drag(
            image_wrap,
            Point::new(300.0, 150.0),
            Point::new(100.0, 150.0),
            4,
            Duration::from_millis(25),
        )?;
        report(&d, "fast drag released");
        let frames = d.run_frames()?;
        report(&d, &format!("momentum ({} frames)", frames));

        let snap_handle = d.elements().snap_handle;
        let handle = d.snap_handle_rect().unwrap_or_default().origin();
        d.drag(
            snap_handle,
            handle.offset(10.0, 10.0),
            handle.offset(-20.0, 10.0),
            3,
            Duration::from_millis(100),
        )?;
        report(&d, "snap handle dragged");

        let _ = d.click(Point::new(200.0, 150.0))?;
        d.advance(Duration::from_millis(100))?;
        let _ = d.click(Point::new(200.0, 150.0))?;
        d.run_frames()?;
        report(&d, "double tap");

        let _ = d.touch_start(image_wrap, &[Point::new(150.0, 150.0), Point::new(250.0, 150.0)])?;
        let _ = d.touch_move(image_wrap, &[Point::new(100.0, 150.0), Point::new(300.0, 150.0)])?;
        d.run_frames()?;
        let _ = d.touch_end(image_wrap, &[])?;
        report(&d, "pinch out");

        d.advance(Duration::from_millis(2000))?;
        report(&d, "after 2s idle");

        d.controller_mut().destroy();
        log::info!(
            "destroyed: {} listeners, {} timers, {} frames left",
            d.host().active_listener_count(),
            d.host().active_timer_count(),
            d.host().pending_frame_count()
        );
        Ok(())
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
