//! Filled primitives
//!
//! Coverage is decided at pixel centres with no anti-aliasing of its own;
//! callers wanting smooth edges draw at a multiple of the final size and
//! [`downsample`](Surface::downsampled) afterwards.

use lumen_core::{Color, Corner, CornerRadii, Point, Rect};

use crate::blend::BlendMode;
use crate::surface::Surface;

impl Surface {
    /// Fill a circle; pixels whose centre lies strictly inside are covered
    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color, mode: BlendMode) {
        if radius <= 0.0 {
            return;
        }
        let bounds = Rect::new(
            (center.x - radius).floor() as i32,
            (center.y - radius).floor() as i32,
            (radius * 2.0).ceil() as i32 + 2,
            (radius * 2.0).ceil() as i32 + 2,
        );
        let Some(area) = bounds.intersection(&self.rect()) else {
            return;
        };

        let r2 = radius * radius;
        let channels = color.to_array();
        for y in area.y..area.bottom() {
            let dy = y as f32 + 0.5 - center.y;
            for x in area.x..area.right() {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy < r2 {
                    self.blend_pixel(x, y, channels, mode);
                }
            }
        }
    }

    /// Fill the ellipse inscribed in `rect`
    pub fn fill_ellipse(&mut self, rect: Rect, color: Color, mode: BlendMode) {
        if rect.is_empty() {
            return;
        }
        let Some(area) = rect.intersection(&self.rect()) else {
            return;
        };

        let center = rect.center();
        let rx = rect.width as f32 / 2.0;
        let ry = rect.height as f32 / 2.0;
        let channels = color.to_array();
        for y in area.y..area.bottom() {
            let ny = (y as f32 + 0.5 - center.y) / ry;
            for x in area.x..area.right() {
                let nx = (x as f32 + 0.5 - center.x) / rx;
                if nx * nx + ny * ny < 1.0 {
                    self.blend_pixel(x, y, channels, mode);
                }
            }
        }
    }

    /// Fill a rect whose corners are rounded with independent radii
    pub fn fill_rounded_rect(
        &mut self,
        rect: Rect,
        radii: CornerRadii,
        color: Color,
        mode: BlendMode,
    ) {
        let Some(area) = rect.intersection(&self.rect()) else {
            return;
        };

        let channels = color.to_array();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if rounded_rect_contains(&rect, &radii, p) {
                    self.blend_pixel(x, y, channels, mode);
                }
            }
        }
    }
}

/// Whether `point` lies inside `rect` once its corners are rounded
///
/// Points in a corner's square are inside only when strictly closer than the
/// radius to that corner's arc centre.
pub fn rounded_rect_contains(rect: &Rect, radii: &CornerRadii, point: Point) -> bool {
    if !rect.contains(point) {
        return false;
    }

    for (corner, radius) in radii.iter() {
        if radius <= 0 {
            continue;
        }
        let r = radius as f32;
        let cx = if corner.is_left() {
            rect.x as f32 + r
        } else {
            rect.right() as f32 - r
        };
        let cy = if corner.is_top() {
            rect.y as f32 + r
        } else {
            rect.bottom() as f32 - r
        };

        let in_corner_x = if corner.is_left() {
            point.x < cx
        } else {
            point.x > cx
        };
        let in_corner_y = if corner.is_top() {
            point.y < cy
        } else {
            point.y > cy
        };

        if in_corner_x && in_corner_y {
            return point.distance_squared(Point::new(cx, cy)) < r * r;
        }
    }
    true
}

/// The arc centre of one corner of a rounded rect
pub fn corner_arc_center(rect: &Rect, corner: Corner, radius: i32) -> Point {
    let r = radius as f32;
    Point::new(
        if corner.is_left() {
            rect.x as f32 + r
        } else {
            rect.right() as f32 - r
        },
        if corner.is_top() {
            rect.y as f32 + r
        } else {
            rect.bottom() as f32 - r
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_circle_coverage() {
        let mut surface = Surface::new(10, 10);
        surface.fill_circle(Point::new(5.0, 5.0), 3.0, Color::WHITE, BlendMode::Replace);
        assert_eq!(surface.get_pixel(5, 5), Color::WHITE);
        assert_eq!(surface.get_pixel(0, 0), Color::TRANSPARENT);
        // (7.5, 5.5) is 2.55 away from the centre
        assert_eq!(surface.get_pixel(7, 5), Color::WHITE);
        // (8.5, 5.5) is 3.54 away
        assert_eq!(surface.get_pixel(8, 5), Color::TRANSPARENT);
    }

    #[test]
    fn test_fill_ellipse_stays_inside_rect() {
        let mut surface = Surface::new(20, 10);
        surface.fill_ellipse(Rect::new(0, 0, 20, 10), Color::WHITE, BlendMode::Replace);
        assert_eq!(surface.get_pixel(10, 5), Color::WHITE);
        assert_eq!(surface.get_pixel(0, 0), Color::TRANSPARENT);
        assert_eq!(surface.get_pixel(19, 9), Color::TRANSPARENT);
        assert_eq!(surface.get_pixel(0, 5), Color::WHITE);
    }

    #[test]
    fn test_rounded_rect_contains_corner_boundary() {
        let rect = Rect::new(0, 0, 40, 20);
        let radii = CornerRadii::uniform(5);
        let center = corner_arc_center(&rect, Corner::TopLeft, 5);
        assert_eq!(center, Point::new(5.0, 5.0));
        // A 3-4-5 offset lands exactly on the arc, which counts as outside
        let on_arc = Point::new(center.x - 3.0, center.y - 4.0);
        assert!(!rounded_rect_contains(&rect, &radii, on_arc));
        let inside_arc = Point::new(center.x - 2.0, center.y - 2.0);
        assert!(rounded_rect_contains(&rect, &radii, inside_arc));
        assert!(rounded_rect_contains(&rect, &radii, Point::new(20.0, 0.5)));
    }

    #[test]
    fn test_fill_rounded_rect_per_corner() {
        let mut surface = Surface::new(20, 20);
        surface.fill_rounded_rect(
            Rect::new(0, 0, 20, 20),
            CornerRadii::new(0, 10, 0, 0),
            Color::WHITE,
            BlendMode::Replace,
        );
        assert_eq!(surface.get_pixel(0, 0), Color::WHITE);
        assert_eq!(surface.get_pixel(19, 0), Color::TRANSPARENT);
        assert_eq!(surface.get_pixel(19, 19), Color::WHITE);
    }
}
