//! Linear color gradients
//!
//! A [`Gradient`] keeps its colors as a 2x1 or 3x1 texel strip. Applying it
//! stretches that strip over the target with a smooth filter, so the blend
//! between texels is the resampling filter's ramp.

use std::fmt;

use lumen_core::{Color, Rect, Size};
use lumen_raster::{rotated_size, BlendMode, Surface};
use smallvec::SmallVec;

/// A linear blend of two or three colors along an angle in degrees
///
/// Equality and hashing consider the colors and angle only.
#[derive(Clone)]
pub struct Gradient {
    angle: i32,
    colors: SmallVec<[Color; 3]>,
    bake_rotation: f32,
    baked: Surface,
}

impl Gradient {
    /// Create a gradient from two colors and an optional third
    pub fn new(angle: i32, first: Color, second: Color, third: Option<Color>) -> Self {
        let mut colors = SmallVec::new();
        colors.push(first);
        colors.push(second);
        colors.extend(third);
        let baked = bake_strip(&colors, 0.0);
        Self {
            angle,
            colors,
            bake_rotation: 0.0,
            baked,
        }
    }

    pub fn two(angle: i32, first: Color, second: Color) -> Self {
        Self::new(angle, first, second, None)
    }

    pub fn three(angle: i32, first: Color, second: Color, third: Color) -> Self {
        Self::new(angle, first, second, Some(third))
    }

    /// Rotate the baked strip before it is ever stretched
    ///
    /// Older themes were tuned against strips pre-rotated by 30 degrees;
    /// passing `30.0` reproduces that look.
    pub fn with_bake_rotation(mut self, degrees: f32) -> Self {
        self.bake_rotation = degrees;
        self.baked = bake_strip(&self.colors, degrees);
        self
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn first(&self) -> Color {
        self.colors[0]
    }

    pub fn second(&self) -> Color {
        self.colors[1]
    }

    pub fn third(&self) -> Option<Color> {
        self.colors.get(2).copied()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The baked texel strip
    pub fn baked(&self) -> &Surface {
        &self.baked
    }

    /// Canonical string form, used as a cache key fragment
    ///
    /// `{angle}_{r}_{g}_{b}_{a}` for each color in order, then `_{rotation}`
    /// when the strip was baked rotated.
    pub fn cache_key(&self) -> String {
        let mut key = self.angle.to_string();
        for color in &self.colors {
            key.push_str(&format!("_{}_{}_{}_{}", color.r, color.g, color.b, color.a));
        }
        if self.bake_rotation != 0.0 {
            key.push_str(&format!("_{}", self.bake_rotation));
        }
        key
    }

    /// Multiply the gradient over `target`, or over `rect` within it
    ///
    /// Meant for white stencils: multiplying white by the gradient leaves the
    /// gradient, and the stencil's alpha survives as the shape mask.
    pub fn apply_to(&self, target: &mut Surface, rect: Option<Rect>) {
        let area = rect.unwrap_or_else(|| target.rect());
        if area.is_empty() {
            return;
        }

        // Stretch the strip across the area as seen from the gradient's
        // own axis, then turn it back to the requested angle
        let unrotated = rotated_size(area.size(), -(self.angle as f32));
        let expanded = self
            .baked
            .smooth_scaled(unrotated.width.max(1), unrotated.height.max(1));
        let rotated = expanded.rotated(self.angle as f32);

        let placement = Rect::centered_on(area.center(), rotated.size());
        let Some(visible) = placement.intersection(&area) else {
            return;
        };
        let source = Rect::new(
            visible.x - placement.x,
            visible.y - placement.y,
            visible.width,
            visible.height,
        );
        target.blit_area(&rotated, source, (visible.x, visible.y), BlendMode::Multiply);
    }
}

fn bake_strip(colors: &[Color], rotation: f32) -> Surface {
    let mut strip = Surface::from_size(Size::new(colors.len() as i32, 1));
    for (x, color) in colors.iter().enumerate() {
        strip.set_pixel(x as i32, 0, *color);
    }
    if rotation != 0.0 {
        strip = strip.rotated(rotation);
    }
    strip
}

impl PartialEq for Gradient {
    fn eq(&self, other: &Self) -> bool {
        self.angle == other.angle && self.colors == other.colors
    }
}

impl Eq for Gradient {}

impl std::hash::Hash for Gradient {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.angle.hash(state);
        self.colors.hash(state);
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

impl fmt::Debug for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gradient")
            .field("angle", &self.angle)
            .field("colors", &self.colors)
            .field("bake_rotation", &self.bake_rotation)
            .finish()
    }
}
