//! Plain rectangles

use lumen_core::{CornerRadii, Point, Rect, Size};
use lumen_paint::{stencil, ShadowShape};
use lumen_raster::Surface;

pub(crate) fn stencil(size: Size) -> Surface {
    stencil::rect(size)
}

pub(crate) fn shadow_shape() -> ShadowShape {
    ShadowShape::Rectangle(CornerRadii::ZERO)
}

pub(crate) fn collide_point(click_area: &Rect, point: Point) -> bool {
    click_area.contains(point)
}
