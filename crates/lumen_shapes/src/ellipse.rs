//! Ellipses

use lumen_core::{Point, Rect, Size};
use lumen_paint::{stencil, ShadowShape};
use lumen_raster::Surface;

pub(crate) fn stencil(size: Size) -> Surface {
    stencil::ellipse(size)
}

pub(crate) fn shadow_shape() -> ShadowShape {
    ShadowShape::Ellipse
}

/// Implicit ellipse test over the click area
pub(crate) fn collide_point(click_area: &Rect, point: Point) -> bool {
    if click_area.is_empty() {
        return false;
    }
    let center = click_area.center();
    let rx = click_area.width as f32 / 2.0;
    let ry = click_area.height as f32 / 2.0;
    let nx = (point.x - center.x) / rx;
    let ny = (point.y - center.y) / ry;
    nx * nx + ny * ny < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collide_ellipse() {
        let area = Rect::new(0, 0, 40, 20);
        assert!(collide_point(&area, Point::new(20.0, 10.0)));
        assert!(collide_point(&area, Point::new(1.0, 10.0)));
        assert!(!collide_point(&area, Point::new(0.0, 10.0)));
        // Inside the bounding box, outside the ellipse
        assert!(!collide_point(&area, Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_collide_empty_area() {
        assert!(!collide_point(&Rect::new(5, 5, 0, 0), Point::new(5.0, 5.0)));
    }
}
