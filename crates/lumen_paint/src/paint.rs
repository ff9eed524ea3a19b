//! Solid-color-or-gradient paint

use lumen_core::{Color, Rect};
use lumen_raster::{BlendMode, Surface};

use crate::gradient::Gradient;

/// What a themed color slot holds: a single color or a gradient
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Paint {
    Solid(Color),
    Gradient(Gradient),
}

impl Paint {
    /// Recolor a white stencil, optionally only within `rect`
    pub fn apply_to(&self, surface: &mut Surface, rect: Option<Rect>) {
        match self {
            Paint::Solid(color) => surface.fill_blend(*color, rect, BlendMode::Multiply),
            Paint::Gradient(gradient) => gradient.apply_to(surface, rect),
        }
    }

    /// Canonical string form, used as a cache key fragment
    pub fn cache_key(&self) -> String {
        match self {
            Paint::Solid(c) => format!("{}_{}_{}_{}", c.r, c.g, c.b, c.a),
            Paint::Gradient(gradient) => gradient.cache_key(),
        }
    }

    /// A single color standing in for the paint, for consumers (such as
    /// text rendering) that can only take one
    pub fn primary_color(&self) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Gradient(gradient) => gradient.first(),
        }
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, Paint::Gradient(_))
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::TRANSPARENT)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_cache_key() {
        assert_eq!(Paint::from(Color::from_hex(0x204060FF)).cache_key(), "32_64_96_255");
    }

    #[test]
    fn test_solid_recolors_stencil_in_rect() {
        let mut stencil = Surface::filled(10, 10, Color::WHITE);
        Paint::from(Color::rgba(10, 20, 30, 128)).apply_to(&mut stencil, Some(Rect::new(0, 0, 5, 10)));
        assert_eq!(stencil.get_pixel(2, 2), Color::rgba(10, 20, 30, 128));
        assert_eq!(stencil.get_pixel(7, 2), Color::WHITE);
    }

    #[test]
    fn test_gradient_primary_color() {
        let paint = Paint::from(Gradient::two(0, Color::GREEN, Color::BLUE));
        assert!(paint.is_gradient());
        assert_eq!(paint.primary_color(), Color::GREEN);
    }
}
