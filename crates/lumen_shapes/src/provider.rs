//! Collaborator interfaces
//!
//! Shapes never parse themes or load fonts themselves. Whatever owns those
//! resources implements these traits and hands typed values over.

use std::sync::Arc;

use lumen_core::{Color, Size};
use lumen_paint::Paint;
use lumen_raster::Surface;

/// A font able to measure and render a single line of text
pub trait FontHandle: Send + Sync {
    /// Whether the font has finished loading
    ///
    /// Shapes postpone text drawing until this returns true.
    fn is_ready(&self) -> bool {
        true
    }

    /// Pixel extent of `text` when rendered
    fn size_of(&self, text: &str) -> Size;

    /// Render `text` in `color` onto a tightly fitting transparent surface
    fn render(&self, text: &str, color: Color) -> Surface;
}

/// Source of themed values for an element
///
/// `ids` lists the element's identifiers from most to least specific; a
/// provider is expected to walk that hierarchy and fall back to defaults,
/// so every lookup yields something drawable.
pub trait AppearanceProvider {
    fn color_or_gradient(&self, ids: &[&str], key: &str) -> Paint;

    fn font(&self, ids: &[&str]) -> Arc<dyn FontHandle>;

    fn misc(&self, ids: &[&str], key: &str) -> Option<String>;

    /// A themed image, such as `normal_image`
    fn image(&self, _ids: &[&str], _key: &str) -> Option<Arc<Surface>> {
        None
    }

    /// Seconds to cross-fade from state `from` to state `to`, if animated
    fn transition_duration(&self, _ids: &[&str], _from: &str, _to: &str) -> Option<f32> {
        None
    }
}
