//! Scroll-and-capture over a tiling plan

use crate::driver::Driver;
use crate::geometry::{self, Dimension};
use crate::tiler::{Rect, Rects, Tiler};
use crate::{Error, Result};
use log::debug;
use std::time::Duration;

/// One viewport capture paired with the document rect it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Encoded PNG exactly as the driver returned it
    pub png: Vec<u8>,
    pub rect: Rect,
    /// CSS size of the viewport the PNG shows; equals the rect's size unless
    /// the document is smaller than the viewport
    pub viewport: Dimension,
}

/// Drives a browser session through a tiling plan.
pub struct TileCapturer<'a, D: Driver + ?Sized> {
    driver: &'a mut D,
    settle_delay: Duration,
}

impl<'a, D: Driver + ?Sized> TileCapturer<'a, D> {
    pub fn new(driver: &'a mut D, settle_delay: Duration) -> Self {
        Self { driver, settle_delay }
    }

    /// Measure the viewport once and build the plan for `document`.
    ///
    /// A zero-sized viewport cannot be scanned and is rejected here.
    pub fn plan(&mut self, document: Dimension) -> Result<Tiler> {
        let viewport = geometry::viewport_size(&mut *self.driver)?;
        if viewport.is_empty() {
            return Err(Error::InvalidGeometry(format!(
                "viewport {}x{} has no area",
                viewport.width, viewport.height
            )));
        }
        Ok(Tiler::new(document, viewport))
    }

    /// Lazily scroll to each rect of `tiler` and capture it.
    ///
    /// The sequence stops after the first error.
    pub fn tiles(self, tiler: Tiler) -> Tiles<'a, D> {
        Tiles {
            driver: self.driver,
            rects: tiler.rects(),
            viewport: tiler.viewport(),
            settle_delay: self.settle_delay,
            index: 0,
            done: false,
        }
    }

    /// Scroll through the plan without capturing, at most `max_scrolls` times.
    ///
    /// Rects past the ceiling are still counted; the return value is the number
    /// of rects in the plan.
    pub fn walk_without_capture(&mut self, tiler: Tiler, max_scrolls: usize) -> Result<usize> {
        let mut count = 0;
        for rect in tiler.rects() {
            if count < max_scrolls {
                self.driver.scroll_to(rect.left, rect.top)?;
            }
            count += 1;
        }
        debug!("walked {} rects ({} scrolls)", count, count.min(max_scrolls));
        Ok(count)
    }
}

/// Iterator returned by [`TileCapturer::tiles`].
pub struct Tiles<'a, D: Driver + ?Sized> {
    driver: &'a mut D,
    rects: Rects,
    viewport: Dimension,
    settle_delay: Duration,
    index: usize,
    done: bool,
}

impl<D: Driver + ?Sized> Tiles<'_, D> {
    fn capture(&mut self, rect: Rect) -> Result<Tile> {
        self.driver.scroll_to(rect.left, rect.top)?;
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        let png = self.driver.capture_viewport_png()?;
        debug!("captured tile {} at {:?} ({} bytes)", self.index, rect, png.len());
        Ok(Tile { png, rect, viewport: self.viewport })
    }
}

impl<D: Driver + ?Sized> Iterator for Tiles<'_, D> {
    type Item = Result<Tile>;

    fn next(&mut self) -> Option<Result<Tile>> {
        if self.done {
            return None;
        }
        let rect = self.rects.next()?;
        let res = self.capture(rect);
        self.index += 1;
        if res.is_err() {
            self.done = true;
        }
        Some(res)
    }
}
