//! Rounded rectangles with independently radiused corners

use lumen_core::{CornerRadii, Point, Rect, Size};
use lumen_paint::{stencil, ShadowShape};
use lumen_raster::draw::rounded_rect_contains;
use lumen_raster::Surface;

pub(crate) fn stencil(size: Size, radii: CornerRadii) -> Surface {
    stencil::rounded_rect(size, radii)
}

pub(crate) fn shadow_shape(radii: CornerRadii) -> ShadowShape {
    ShadowShape::Rectangle(radii)
}

/// Hit test the central band, the edge bands and each corner's arc
pub(crate) fn collide_point(click_area: &Rect, radii: &CornerRadii, point: Point) -> bool {
    rounded_rect_contains(click_area, radii, point)
}

/// Radii for the background inside the border, shrunk in proportion to the
/// background so the two outlines nest
pub(crate) fn background_radii(radii: CornerRadii, border: Size, background: Size) -> CornerRadii {
    let outer = border.min_dimension();
    if outer <= 0 {
        return CornerRadii::ZERO;
    }
    let inner = background.min_dimension().max(0);
    CornerRadii::from(radii.to_array().map(|radius| radius * inner / outer))
}
