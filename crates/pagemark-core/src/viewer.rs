//! Glue between the page renderer and the coordinate transform.

use serde::{Deserialize, Serialize};

use crate::error::PagemarkError;
use crate::geometry::DisplayRect;

/// Scale between page units and surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { zoom: 1.0 }
    }
}

impl Viewport {
    pub fn new(zoom: f64) -> Result<Self, PagemarkError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(PagemarkError::InvalidArgument(format!(
                "zoom must be a positive number, got {zoom}"
            )));
        }
        Ok(Viewport { zoom })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Pixel size of the surface a page of the given size renders to.
    pub fn surface_size(&self, page_width: f64, page_height: f64) -> (u32, u32) {
        let px = |v: f64| (v * self.zoom).max(0.0).ceil() as u32;
        (px(page_width), px(page_height))
    }

    /// Rescale a rectangle drawn on the zoomed surface into unzoomed page units.
    pub fn to_page_units(&self, rect: &DisplayRect) -> DisplayRect {
        self.scale(rect, 1.0 / self.zoom)
    }

    /// Rescale a rectangle in page units onto the zoomed surface.
    pub fn to_surface_units(&self, rect: &DisplayRect) -> DisplayRect {
        self.scale(rect, self.zoom)
    }

    fn scale(&self, rect: &DisplayRect, factor: f64) -> DisplayRect {
        DisplayRect {
            x: rect.x * factor,
            y: rect.y * factor,
            width: rect.width * factor,
            height: rect.height * factor,
        }
    }
}

/// Tracks the visible page and serializes render requests.
///
/// At most one render is in flight. Requests made while rendering collapse
/// into a single pending slot, and the latest request wins.
#[derive(Debug, Clone)]
pub struct PageNavigator {
    current: usize,
    page_count: usize,
    rendering: bool,
    pending: Option<usize>,
}

impl PageNavigator {
    pub fn new(page_count: usize) -> Result<Self, PagemarkError> {
        if page_count == 0 {
            return Err(PagemarkError::InvalidArgument(
                "document has no pages".into(),
            ));
        }
        Ok(PageNavigator {
            current: 1,
            page_count,
            rendering: false,
            pending: None,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    pub fn pending(&self) -> Option<usize> {
        self.pending
    }

    /// Request the first render of the current page.
    pub fn start(&mut self) -> Option<usize> {
        self.queue(self.current)
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.current >= self.page_count {
            return None;
        }
        self.current += 1;
        self.queue(self.current)
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.current <= 1 {
            return None;
        }
        self.current -= 1;
        self.queue(self.current)
    }

    pub fn go_to(&mut self, page: usize) -> Result<Option<usize>, PagemarkError> {
        if page == 0 || page > self.page_count {
            return Err(PagemarkError::PageOutOfRange {
                page,
                count: self.page_count,
            });
        }
        self.current = page;
        Ok(self.queue(page))
    }

    /// Mark the in-flight render done. Returns the pending page to render next, if any.
    pub fn render_finished(&mut self) -> Option<usize> {
        self.rendering = false;
        let next = self.pending.take()?;
        self.rendering = true;
        Some(next)
    }

    /// Returns `Some(page)` when the caller should start rendering now.
    fn queue(&mut self, page: usize) -> Option<usize> {
        if self.rendering {
            self.pending = Some(page);
            None
        } else {
            self.rendering = true;
            Some(page)
        }
    }
}
