//! Geometric transforms
//!
//! Every transform returns a new surface; sources are never mutated.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use lumen_core::Size;

use crate::surface::Surface;

/// The size [`Surface::rotated`] produces for a surface of `size`
pub fn rotated_size(size: Size, degrees: f32) -> Size {
    let normalized = degrees.rem_euclid(360.0);
    if size.width <= 0 || size.height <= 0 || normalized == 0.0 || normalized == 180.0 {
        return size;
    }
    if normalized == 90.0 || normalized == 270.0 {
        return Size::new(size.height, size.width);
    }
    let (sin, cos) = normalized.to_radians().sin_cos();
    let w = size.width as f32;
    let h = size.height as f32;
    Size::new(
        (w * cos.abs() + h * sin.abs()).ceil().max(1.0) as i32,
        (w * sin.abs() + h * cos.abs()).ceil().max(1.0) as i32,
    )
}

impl Surface {
    /// Mirror horizontally and/or vertically
    pub fn flipped(&self, horizontal: bool, vertical: bool) -> Surface {
        let mut image = self.as_image().clone();
        if horizontal {
            imageops::flip_horizontal_in_place(&mut image);
        }
        if vertical {
            imageops::flip_vertical_in_place(&mut image);
        }
        Surface::from_image(image)
    }

    /// Rotate counter-clockwise by `degrees`
    ///
    /// The result grows to the bounding box of the rotated surface and the
    /// uncovered corners are transparent. Quarter turns are exact; any other
    /// angle samples the nearest source pixel.
    pub fn rotated(&self, degrees: f32) -> Surface {
        let normalized = degrees.rem_euclid(360.0);
        if self.is_empty() || normalized == 0.0 {
            return self.clone();
        }
        if normalized == 90.0 {
            return Surface::from_image(imageops::rotate270(self.as_image()));
        }
        if normalized == 180.0 {
            return Surface::from_image(imageops::rotate180(self.as_image()));
        }
        if normalized == 270.0 {
            return Surface::from_image(imageops::rotate90(self.as_image()));
        }

        let (sin, cos) = normalized.to_radians().sin_cos();
        let w = self.width() as f32;
        let h = self.height() as f32;
        let out_size = rotated_size(self.size(), degrees);
        let (out_w, out_h) = (out_size.width as u32, out_size.height as u32);

        let src = self.as_image();
        let mut out = RgbaImage::new(out_w, out_h);
        let half_out_w = out_w as f32 / 2.0;
        let half_out_h = out_h as f32 / 2.0;

        for (x, y, px) in out.enumerate_pixels_mut() {
            // Map the destination pixel centre back into source space
            let dx = x as f32 + 0.5 - half_out_w;
            let dy = y as f32 + 0.5 - half_out_h;
            let sx = dx * cos - dy * sin + w / 2.0;
            let sy = dx * sin + dy * cos + h / 2.0;
            if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                continue;
            }
            *px = *src.get_pixel(sx as u32, sy as u32);
        }

        Surface::from_image(out)
    }

    /// Resize with nearest-neighbour sampling
    pub fn scaled(&self, width: i32, height: i32) -> Surface {
        self.resized(width, height, FilterType::Nearest)
    }

    /// Resize with a smooth (linear) filter
    pub fn smooth_scaled(&self, width: i32, height: i32) -> Surface {
        self.resized(width, height, FilterType::Triangle)
    }

    fn resized(&self, width: i32, height: i32, filter: FilterType) -> Surface {
        if width <= 0 || height <= 0 {
            return Surface::empty();
        }
        if self.is_empty() {
            return Surface::new(width, height);
        }
        if width == self.width() && height == self.height() {
            return self.clone();
        }
        Surface::from_image(imageops::resize(
            self.as_image(),
            width as u32,
            height as u32,
            filter,
        ))
    }

    /// Shrink by an integer factor, averaging each `factor x factor` block
    ///
    /// Color is averaged weighted by alpha so transparent pixels do not
    /// darken anti-aliased edges. Trailing rows and columns that do not fill
    /// a whole block are dropped.
    pub fn downsampled(&self, factor: i32) -> Surface {
        if factor <= 1 {
            return self.clone();
        }
        let out_w = self.width() / factor;
        let out_h = self.height() / factor;
        if out_w == 0 || out_h == 0 {
            return Surface::empty();
        }

        let src = self.as_image();
        let block = (factor * factor) as u32;
        let mut out = RgbaImage::new(out_w as u32, out_h as u32);

        for (x, y, px) in out.enumerate_pixels_mut() {
            let mut alpha_sum = 0u32;
            let mut color_sum = [0u32; 3];
            for by in 0..factor as u32 {
                for bx in 0..factor as u32 {
                    let s = src.get_pixel(x * factor as u32 + bx, y * factor as u32 + by).0;
                    let a = s[3] as u32;
                    alpha_sum += a;
                    for i in 0..3 {
                        color_sum[i] += s[i] as u32 * a;
                    }
                }
            }
            if alpha_sum == 0 {
                continue;
            }
            let mut channels = [0u8; 4];
            for i in 0..3 {
                channels[i] = ((color_sum[i] + alpha_sum / 2) / alpha_sum) as u8;
            }
            channels[3] = ((alpha_sum + block / 2) / block) as u8;
            *px = Rgba(channels);
        }

        Surface::from_image(out)
    }
}
