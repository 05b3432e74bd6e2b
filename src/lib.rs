//! pagestitch
//!
//! Full-page screenshots for browsers whose native capture only covers the
//! visible viewport. The page is measured, cut into viewport-sized rects,
//! scrolled to and captured rect by rect, and the captures are stitched onto a
//! single canvas.
//!
//! # Features
//!
//! - **Backend agnostic**: the pipeline runs against the [`Driver`] trait
//! - **CDP Backend** (`cdp` feature): [`cdp::CdpDriver`] over headless Chrome
//! - **Scoped side effects**: scrollbars are hidden during capture and restored
//!   on every exit path
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pagestitch::cdp::{CdpConfig, CdpDriver};
//! use pagestitch::{CaptureConfig, FullPageScreenshot};
//!
//! let driver = CdpDriver::launch(CdpConfig::default())?;
//! let mut shot = FullPageScreenshot::new(driver, CaptureConfig::default())?;
//! shot.navigate("https://example.com")?;
//! shot.prepare_document()?;
//! shot.screenshot_as_file("example.png")?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cdp"))]
//! # fn main() {}
//! ```

use base64::Engine as Base64Engine;
use image::RgbaImage;
use log::info;
use std::path::Path;
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod capture;
pub mod compositor;
pub mod driver;
pub mod geometry;
pub mod scrollbar;
pub mod tiler;

#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly facade over a worker thread that owns the session
pub mod async_api;

pub use async_api::Screenshotter;
pub use capture::{Tile, TileCapturer};
pub use compositor::Compositor;
pub use driver::Driver;
pub use geometry::Dimension;
pub use scrollbar::ScrollbarGuard;
pub use tiler::{Rect, Tiler};

/// Configuration for full-page capture
///
/// The defaults reproduce the classic stitching behaviour:
/// - output is magnified 2x so high-DPI captures keep their detail
/// - each scroll is followed by a 200ms settle delay
/// - `prepare_document` scrolls at most 100 times
///
/// # Examples
///
/// ```
/// let cfg = pagestitch::CaptureConfig::default();
/// assert_eq!(cfg.scale, 2);
/// assert_eq!(cfg.max_prepare_scrolls, 100);
/// ```
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Output magnification applied to canvas size and tile placement
    pub scale: u32,
    /// Pause between scrolling and capturing each tile
    pub settle_delay: Duration,
    /// Scroll ceiling used by `prepare_document`
    pub max_prepare_scrolls: usize,
    /// Id of the injected scrollbar-hiding `<style>` element
    pub scrollbar_style_id: String,
    /// Resample tiles whose pixel size differs from their rect times `scale`
    pub resize_tiles: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            settle_delay: Duration::from_millis(200),
            max_prepare_scrolls: 100,
            scrollbar_style_id: scrollbar::DEFAULT_STYLE_ID.to_string(),
            resize_tiles: true,
        }
    }
}

impl CaptureConfig {
    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(Error::ConfigError("scale must be at least 1".into()));
        }
        if self.scrollbar_style_id.trim().is_empty() {
            return Err(Error::ConfigError("scrollbar_style_id must not be empty".into()));
        }
        Ok(())
    }
}

/// Frozen geometry for one capture: what was measured and how it will be cut.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CapturePlan {
    pub document: Dimension,
    pub viewport: Dimension,
    pub rects: Vec<Rect>,
}

/// Full-page capture over a browser session.
///
/// Owns the driver by value; borrow it back with [`FullPageScreenshot::driver_mut`]
/// or take it with [`FullPageScreenshot::into_driver`].
pub struct FullPageScreenshot<D: Driver> {
    driver: D,
    config: CaptureConfig,
}

impl<D: Driver> FullPageScreenshot<D> {
    pub fn new(driver: D, config: CaptureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { driver, config })
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Navigate the underlying session
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        self.driver.navigate(url)
    }

    /// Close the underlying session
    pub fn close(self) -> Result<()> {
        self.driver.close()
    }

    /// Measure the page and compute the rects a capture would take, without
    /// scrolling or capturing.
    pub fn plan(&mut self) -> Result<CapturePlan> {
        let document = geometry::document_size(&mut self.driver)?;
        let tiler = TileCapturer::new(&mut self.driver, self.config.settle_delay).plan(document)?;
        Ok(CapturePlan {
            document,
            viewport: tiler.viewport(),
            rects: tiler.rects().collect(),
        })
    }

    /// Scroll through the whole page without capturing, so content that only
    /// renders on scroll is present for a later capture. Uses the configured
    /// scroll ceiling.
    pub fn prepare_document(&mut self) -> Result<usize> {
        self.prepare_document_with_limit(self.config.max_prepare_scrolls)
    }

    /// Like [`prepare_document`](Self::prepare_document) with an explicit
    /// ceiling. Returns the number of rects in the plan, which may exceed the
    /// number of scrolls performed.
    pub fn prepare_document_with_limit(&mut self, max_scrolls: usize) -> Result<usize> {
        let document = geometry::document_size(&mut self.driver)?;
        let mut capturer = TileCapturer::new(&mut self.driver, self.config.settle_delay);
        let tiler = capturer.plan(document)?;
        capturer.walk_without_capture(tiler, max_scrolls)
    }

    /// Capture the full page as PNG bytes.
    pub fn screenshot_as_png(&mut self) -> Result<Vec<u8>> {
        let canvas = self.capture_canvas()?;
        compositor::encode_png(&canvas)
    }

    /// Capture the full page as base64-encoded PNG.
    pub fn screenshot_as_base64(&mut self) -> Result<String> {
        let png = self.screenshot_as_png()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(png))
    }

    /// Capture the full page and save it as PNG at `path`.
    ///
    /// The file is written only once the whole page has been stitched and
    /// encoded; a failed capture leaves no file behind.
    pub fn screenshot_as_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let png = self.screenshot_as_png()?;
        std::fs::write(path.as_ref(), png)?;
        info!("saved full-page screenshot to {}", path.as_ref().display());
        Ok(())
    }

    /// Capture the full page as an RGBA canvas of `document * scale` pixels.
    pub fn capture_canvas(&mut self) -> Result<RgbaImage> {
        let settle_delay = self.config.settle_delay;
        let compositor = Compositor::new(self.config.scale, self.config.resize_tiles);

        // Hidden scrollbars change the viewport, so measure after suppressing.
        let mut guard = ScrollbarGuard::suppress(&mut self.driver, &self.config.scrollbar_style_id)?;
        let document = geometry::document_size(&mut *guard)?;
        let mut capturer = TileCapturer::new(&mut *guard, settle_delay);
        let tiler = capturer.plan(document)?;
        info!(
            "capturing {}x{} document in {} tiles of {}x{}",
            document.width,
            document.height,
            tiler.len(),
            tiler.viewport().width,
            tiler.viewport().height
        );
        let canvas = compositor.composite(document, capturer.tiles(tiler))?;
        guard.restore()?;
        Ok(canvas)
    }
}
