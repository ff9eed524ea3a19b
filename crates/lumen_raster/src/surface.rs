//! Owned RGBA surfaces

use image::{Rgba, RgbaImage};
use lumen_core::{Color, Rect, Size};

use crate::blend::BlendMode;
use crate::view::SurfaceView;

/// An owned, straight-alpha RGBA pixel buffer
///
/// A zero-sized surface is valid and is what "nothing drawn yet" looks like
/// to callers.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Create a fully transparent surface; negative sizes are treated as zero
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            image: RgbaImage::new(width.max(0) as u32, height.max(0) as u32),
        }
    }

    /// Create a 0x0 surface
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    /// Create a surface filled with a single color
    pub fn filled(width: i32, height: i32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(
                width.max(0) as u32,
                height.max(0) as u32,
                Rgba(color.to_array()),
            ),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn width(&self) -> i32 {
        self.image.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Read a pixel, `None` when out of bounds
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(Color::from_array(self.image.get_pixel(x as u32, y as u32).0))
    }

    /// Read a pixel, transparent when out of bounds
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.pixel(x, y).unwrap_or(Color::TRANSPARENT)
    }

    /// Write a pixel; out-of-bounds writes are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, Rgba(color.to_array()));
    }

    /// Blend a single pixel into place
    #[inline]
    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 4], mode: BlendMode) {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        mode.apply(&mut px.0, color);
    }

    /// Overwrite every pixel
    pub fn fill(&mut self, color: Color) {
        let channels = color.to_array();
        for px in self.image.pixels_mut() {
            px.0 = channels;
        }
    }

    /// Overwrite every pixel inside `rect` (clipped to the surface)
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_blend(color, Some(rect), BlendMode::Replace);
    }

    /// Combine a solid color into the surface, optionally restricted to a rect
    pub fn fill_blend(&mut self, color: Color, rect: Option<Rect>, mode: BlendMode) {
        let area = match rect {
            Some(rect) => match rect.intersection(&self.rect()) {
                Some(area) => area,
                None => return,
            },
            None => self.rect(),
        };

        let channels = color.to_array();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let px = self.image.get_pixel_mut(x as u32, y as u32);
                mode.apply(&mut px.0, channels);
            }
        }
    }

    /// Draw all of `src` with its top-left at `dest`
    pub fn blit(&mut self, src: &Surface, dest: (i32, i32), mode: BlendMode) {
        self.blit_area(src, src.rect(), dest, mode);
    }

    /// Draw the `area` part of `src` with its top-left at `dest`
    pub fn blit_area(&mut self, src: &Surface, area: Rect, dest: (i32, i32), mode: BlendMode) {
        let Some(area) = area.intersection(&src.rect()) else {
            return;
        };

        // Clip against the destination so the inner loop never bounds-checks
        let target = Rect::new(dest.0, dest.1, area.width, area.height);
        let Some(visible) = target.intersection(&self.rect()) else {
            return;
        };
        let src_x = area.x + (visible.x - target.x);
        let src_y = area.y + (visible.y - target.y);

        for row in 0..visible.height {
            for col in 0..visible.width {
                let s = src.image.get_pixel((src_x + col) as u32, (src_y + row) as u32).0;
                let d = self
                    .image
                    .get_pixel_mut((visible.x + col) as u32, (visible.y + row) as u32);
                mode.apply(&mut d.0, s);
            }
        }
    }

    /// Draw a shared view with its top-left at `dest`
    pub fn blit_view(&mut self, view: &SurfaceView, dest: (i32, i32), mode: BlendMode) {
        self.blit_area(view.source(), view.rect(), dest, mode);
    }

    /// Copy a region into a new surface
    pub fn copy_area(&self, area: Rect) -> Surface {
        let Some(area) = area.intersection(&self.rect()) else {
            return Surface::empty();
        };
        Surface::from_image(
            image::imageops::crop_imm(
                &self.image,
                area.x as u32,
                area.y as u32,
                area.width as u32,
                area.height as u32,
            )
            .to_image(),
        )
    }

    /// Iterate over pixels as colors, row by row
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.image.pixels().map(|px| Color::from_array(px.0))
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let surface = Surface::new(4, 3);
        assert_eq!(surface.size(), Size::new(4, 3));
        assert!(surface.pixels().all(|c| c == Color::TRANSPARENT));
    }

    #[test]
    fn test_negative_size_is_empty() {
        let surface = Surface::new(-5, 10);
        assert!(surface.is_empty());
        assert_eq!(surface.pixel(0, 0), None);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut surface = Surface::new(4, 4);
        surface.fill_rect(Rect::new(2, 2, 10, 10), Color::RED);
        assert_eq!(surface.get_pixel(3, 3), Color::RED);
        assert_eq!(surface.get_pixel(1, 1), Color::TRANSPARENT);
    }

    #[test]
    fn test_blit_clips_negative_destination() {
        let src = Surface::filled(4, 4, Color::BLUE);
        let mut dst = Surface::new(4, 4);
        dst.blit(&src, (-2, -2), BlendMode::Normal);
        assert_eq!(dst.get_pixel(0, 0), Color::BLUE);
        assert_eq!(dst.get_pixel(1, 1), Color::BLUE);
        assert_eq!(dst.get_pixel(2, 2), Color::TRANSPARENT);
    }

    #[test]
    fn test_blit_area() {
        let mut src = Surface::new(4, 4);
        src.fill_rect(Rect::new(2, 0, 2, 4), Color::GREEN);
        let mut dst = Surface::new(2, 2);
        dst.blit_area(&src, Rect::new(2, 1, 2, 2), (0, 0), BlendMode::Replace);
        assert!(dst.pixels().all(|c| c == Color::GREEN));
    }

    #[test]
    fn test_copy_area() {
        let mut src = Surface::new(10, 10);
        src.set_pixel(5, 5, Color::RED);
        let copy = src.copy_area(Rect::new(4, 4, 3, 3));
        assert_eq!(copy.size(), Size::new(3, 3));
        assert_eq!(copy.get_pixel(1, 1), Color::RED);
    }
}
