//! Viewport-sized tiling of a document
//!
//! The document is scanned row by row. Every rect has the viewport's size; the
//! last row and column are shifted back inside the document instead of being
//! cut short, so they overlap their neighbours. A document smaller than the
//! viewport yields a single rect equal to the whole document.

use crate::geometry::Dimension;
use serde::Serialize;

/// A capture window in document coordinates. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Tiling plan for one document/viewport pair.
///
/// `Tiler` is `Copy` and holds no iteration state; every call to
/// [`Tiler::rects`] starts a fresh scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tiler {
    document: Dimension,
    viewport: Dimension,
}

impl Tiler {
    pub fn new(document: Dimension, viewport: Dimension) -> Self {
        Self { document, viewport }
    }

    pub fn document(&self) -> Dimension {
        self.document
    }

    pub fn viewport(&self) -> Dimension {
        self.viewport
    }

    /// Row-major sequence of covering rects.
    pub fn rects(&self) -> Rects {
        Rects {
            rows: Spans::new(self.document.height, self.viewport.height),
            columns: Spans::new(self.document.width, self.viewport.width),
            row: None,
            cursor: Spans::new(self.document.width, self.viewport.width),
        }
    }

    /// Number of rects [`Tiler::rects`] yields.
    pub fn len(&self) -> usize {
        span_count(self.document.width, self.viewport.width) * span_count(self.document.height, self.viewport.height)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for Tiler {
    type Item = Rect;
    type IntoIter = Rects;

    fn into_iter(self) -> Rects {
        self.rects()
    }
}

impl IntoIterator for &Tiler {
    type Item = Rect;
    type IntoIter = Rects;

    fn into_iter(self) -> Rects {
        self.rects()
    }
}

fn span_count(extent: u32, step: u32) -> usize {
    if extent == 0 || step == 0 {
        return 0;
    }
    extent.div_ceil(step) as usize
}

/// Clamp-and-shift scan along one axis, yielding `(start, end)` pairs.
#[derive(Debug, Clone)]
struct Spans {
    extent: u32,
    step: u32,
    next: u32,
}

impl Spans {
    fn new(extent: u32, step: u32) -> Self {
        Self { extent, step, next: 0 }
    }
}

impl Iterator for Spans {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.step == 0 || self.next >= self.extent {
            return None;
        }
        let (start, end) = match self.next.checked_add(self.step) {
            Some(end) if end <= self.extent => (self.next, end),
            _ => (self.extent.saturating_sub(self.step), self.extent),
        };
        self.next = start.saturating_add(self.step);
        Some((start, end))
    }
}

/// Iterator returned by [`Tiler::rects`].
#[derive(Debug, Clone)]
pub struct Rects {
    rows: Spans,
    columns: Spans,
    row: Option<(u32, u32)>,
    cursor: Spans,
}

impl Iterator for Rects {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        loop {
            if let Some((top, bottom)) = self.row {
                if let Some((left, right)) = self.cursor.next() {
                    return Some(Rect { left, top, right, bottom });
                }
            }
            self.row = Some(self.rows.next()?);
            self.cursor = self.columns.clone();
        }
    }
}
