//! Colorless shape stencils
//!
//! Stencils are opaque white where the shape is and transparent elsewhere.
//! A [`Paint`](crate::Paint) multiplied over a stencil recolors the shape
//! while keeping the mask, so one stencil serves every color and gradient.

use lumen_core::{Color, Corner, CornerRadii, Point, Rect, Size};
use lumen_raster::{BlendMode, Surface};
use rustc_hash::FxHashMap;

/// A solid white rectangle
pub fn rect(size: Size) -> Surface {
    Surface::filled(size.width, size.height, Color::WHITE)
}

/// A white ellipse inscribed in `size`
pub fn ellipse(size: Size) -> Surface {
    let mut surface = Surface::from_size(size);
    surface.fill_ellipse(size.to_rect(), Color::WHITE, BlendMode::Replace);
    surface
}

/// A white rounded rectangle with independent corner radii
///
/// Each distinct radius is stamped once as a top-left quarter circle and
/// mirrored into whichever corners use it; the straight runs between the
/// corners are plain fill. Radii larger than half the short side are the
/// caller's problem: corner squares would overlap.
pub fn rounded_rect(size: Size, radii: CornerRadii) -> Surface {
    let mut surface = rect(size);
    if radii.is_zero() {
        return surface;
    }

    let mut stamps: FxHashMap<i32, Surface> = FxHashMap::default();
    for (corner, radius) in radii.iter() {
        if radius <= 0 {
            continue;
        }
        let stamp = stamps
            .entry(radius)
            .or_insert_with(|| quarter_circle(radius));
        let mirrored = stamp.flipped(!corner.is_left(), !corner.is_top());

        let x = if corner.is_left() { 0 } else { size.width - radius };
        let y = if corner.is_top() { 0 } else { size.height - radius };
        surface.blit(&mirrored, (x, y), BlendMode::Replace);
    }
    surface
}

/// A `radius x radius` top-left quarter circle, centred on its bottom-right
fn quarter_circle(radius: i32) -> Surface {
    let mut stamp = Surface::new(radius, radius);
    stamp.fill_circle(
        Point::new(radius as f32, radius as f32),
        radius as f32,
        Color::WHITE,
        BlendMode::Replace,
    );
    stamp
}

/// The rect covered by one corner's stamp inside a stencil of `size`
pub fn corner_square(size: Size, corner: Corner, radius: i32) -> Rect {
    Rect::new(
        if corner.is_left() { 0 } else { size.width - radius },
        if corner.is_top() { 0 } else { size.height - radius },
        radius,
        radius,
    )
}
