//! Browser driver capability
//!
//! The capture pipeline never talks to a concrete browser binding. It is written
//! against [`Driver`], a small capability surface that any automation backend
//! (CDP, WebDriver, a test double) can implement.

use crate::Result;
use serde_json::Value;

/// Capabilities the capture pipeline needs from a browser session.
///
/// A session exposes a single viewport and a single scroll position, so every
/// method takes `&mut self`: calls against one session are serialized by the
/// borrow checker.
pub trait Driver {
    /// Evaluate JavaScript in the page context and return its JSON value.
    ///
    /// Implementations should report a dead or unresponsive session as
    /// [`Error::DriverUnavailable`](crate::Error::DriverUnavailable).
    fn evaluate_script(&mut self, script: &str) -> Result<Value>;

    /// Capture the currently visible viewport as PNG bytes.
    fn capture_viewport_png(&mut self) -> Result<Vec<u8>>;

    /// Navigate the session to `url` and wait for the load to finish.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Scroll the document so that `(x, y)` is the top-left corner of the viewport.
    fn scroll_to(&mut self, x: u32, y: u32) -> Result<()> {
        self.evaluate_script(&format!("window.scrollTo({}, {})", x, y))?;
        Ok(())
    }

    /// Close the session and release the browser.
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<D: Driver + ?Sized> Driver for &mut D {
    fn evaluate_script(&mut self, script: &str) -> Result<Value> {
        (**self).evaluate_script(script)
    }

    fn capture_viewport_png(&mut self) -> Result<Vec<u8>> {
        (**self).capture_viewport_png()
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        (**self).navigate(url)
    }

    fn scroll_to(&mut self, x: u32, y: u32) -> Result<()> {
        (**self).scroll_to(x, y)
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn evaluate_script(&mut self, script: &str) -> Result<Value> {
        (**self).evaluate_script(script)
    }

    fn capture_viewport_png(&mut self) -> Result<Vec<u8>> {
        (**self).capture_viewport_png()
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        (**self).navigate(url)
    }

    fn scroll_to(&mut self, x: u32, y: u32) -> Result<()> {
        (**self).scroll_to(x, y)
    }
}
