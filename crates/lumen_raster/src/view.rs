//! Shared read-only sub-views
//!
//! A [`SurfaceView`] is a rectangle of a surface held behind an [`Arc`].
//! Views never observe later writes: the owner of the backing surface
//! mutates through [`Arc::make_mut`], which copies the pixels if any view is
//! still alive. Callers that want to draw on a view's pixels take a copy
//! with [`SurfaceView::to_surface`].

use std::sync::Arc;

use lumen_core::{Color, Rect, Size};

use crate::surface::Surface;

/// A rectangular window onto a shared surface
#[derive(Clone)]
pub struct SurfaceView {
    source: Arc<Surface>,
    rect: Rect,
}

impl SurfaceView {
    /// Create a view; the rect is clipped to the source bounds
    pub fn new(source: Arc<Surface>, rect: Rect) -> Self {
        let rect = rect.intersection(&source.rect()).unwrap_or(Rect::ZERO);
        Self { source, rect }
    }

    /// A view covering the whole of `surface`
    pub fn whole(surface: Surface) -> Self {
        let rect = surface.rect();
        Self {
            source: Arc::new(surface),
            rect,
        }
    }

    pub fn source(&self) -> &Surface {
        &self.source
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> i32 {
        self.rect.width
    }

    pub fn height(&self) -> i32 {
        self.rect.height
    }

    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Read a pixel in view coordinates
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.rect.width || y >= self.rect.height {
            return None;
        }
        self.source.pixel(self.rect.x + x, self.rect.y + y)
    }

    /// Copy the viewed pixels into a new owned surface
    pub fn to_surface(&self) -> Surface {
        self.source.copy_area(self.rect)
    }
}

impl std::fmt::Debug for SurfaceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceView")
            .field("rect", &self.rect)
            .field("source", &self.source.size())
            .finish()
    }
}
