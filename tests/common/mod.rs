//! In-memory browser session used by the integration tests.
#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use pagestitch::{compositor, Dimension, Driver, Error, Result};
use serde_json::Value;

pub const SCROLLBAR_GRAY: [u8; 4] = [128, 128, 128, 255];

/// Color of the document at CSS pixel `(x, y)`.
pub fn document_color(x: u32, y: u32) -> [u8; 4] {
    [(x % 256) as u8, (y % 256) as u8, 255, 255]
}

/// Simulates one tab: a scrollable document, a viewport, the scrollbar style
/// element and a viewport screenshot whose pixels encode document coordinates.
pub struct FakeDriver {
    pub document: Dimension,
    pub viewport: Dimension,
    pub device_pixel_ratio: u32,
    pub scroll: (u32, u32),
    pub scrolls: Vec<(u32, u32)>,
    pub captures: usize,
    pub document_measurements: usize,
    pub style_present: bool,
    pub style_inserts: usize,
    /// 1-based capture number that returns bytes which are not a PNG
    pub corrupt_capture_at: Option<usize>,
    /// 1-based capture number that fails while the session stays usable
    pub failed_capture_at: Option<usize>,
    /// 1-based capture number at which the session goes away
    pub disconnect_at_capture: Option<usize>,
    /// Extra document height added after every scroll
    pub grow_per_scroll: u32,
    pub urls: Vec<String>,
    pub closed: bool,
}

impl FakeDriver {
    pub fn new(document: Dimension, viewport: Dimension) -> Self {
        Self {
            document,
            viewport,
            device_pixel_ratio: 2,
            scroll: (0, 0),
            scrolls: Vec::new(),
            captures: 0,
            document_measurements: 0,
            style_present: false,
            style_inserts: 0,
            corrupt_capture_at: None,
            failed_capture_at: None,
            disconnect_at_capture: None,
            grow_per_scroll: 0,
            urls: Vec::new(),
            closed: false,
        }
    }

    fn do_scroll(&mut self, x: u32, y: u32) {
        let max_x = self.document.width.saturating_sub(self.viewport.width);
        let max_y = self.document.height.saturating_sub(self.viewport.height);
        self.scroll = (x.min(max_x), y.min(max_y));
        self.scrolls.push((x, y));
        self.document.height += self.grow_per_scroll;
    }

    fn render_viewport(&self) -> RgbaImage {
        let dpr = self.device_pixel_ratio;
        let (w, h) = (self.viewport.width * dpr, self.viewport.height * dpr);
        let bar = 2 * dpr;
        RgbaImage::from_fn(w, h, |px, py| {
            if !self.style_present && px >= w - bar {
                return Rgba(SCROLLBAR_GRAY);
            }
            Rgba(document_color(self.scroll.0 + px / dpr, self.scroll.1 + py / dpr))
        })
    }
}

fn parse_scroll(script: &str) -> Option<(u32, u32)> {
    let args = script.strip_prefix("window.scrollTo(")?.strip_suffix(')')?;
    let (x, y) = args.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

impl Driver for FakeDriver {
    fn evaluate_script(&mut self, script: &str) -> Result<Value> {
        if self.closed {
            return Err(Error::DriverUnavailable("session closed".into()));
        }
        if script.contains("scrollHeight") {
            self.document_measurements += 1;
            let json = format!(r#"{{"width":{},"height":{}}}"#, self.document.width, self.document.height);
            return Ok(Value::String(json));
        }
        if script.contains("innerWidth") {
            let json = format!(r#"{{"width":{},"height":{}}}"#, self.viewport.width, self.viewport.height);
            return Ok(Value::String(json));
        }
        if script.contains("createElement('style')") {
            if !self.style_present {
                self.style_present = true;
                self.style_inserts += 1;
            }
            return Ok(Value::Null);
        }
        if script.contains("removeChild") {
            self.style_present = false;
            return Ok(Value::Null);
        }
        if let Some((x, y)) = parse_scroll(script.trim()) {
            self.do_scroll(x, y);
            return Ok(Value::Null);
        }
        Ok(Value::Null)
    }

    fn capture_viewport_png(&mut self) -> Result<Vec<u8>> {
        self.captures += 1;
        if self.disconnect_at_capture == Some(self.captures) {
            self.closed = true;
        }
        if self.closed {
            return Err(Error::DriverUnavailable("session closed".into()));
        }
        if self.failed_capture_at == Some(self.captures) {
            return Err(Error::DriverUnavailable("screenshot timed out".into()));
        }
        if self.corrupt_capture_at == Some(self.captures) {
            return Ok(b"\x89PNG garbage".to_vec());
        }
        compositor::encode_png(&self.render_viewport())
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.urls.push(url.to_string());
        self.scroll = (0, 0);
        Ok(())
    }
}
