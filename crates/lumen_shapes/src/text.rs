//! Text and image compositing at final resolution

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lumen_core::{Color, Rect, Size};
use lumen_paint::Paint;
use lumen_raster::{BlendMode, Surface};

use crate::provider::FontHandle;
use crate::theming::{HorizontalAlign, ThemingParameters, VerticalAlign};

/// Top-left position of `content` aligned inside `container`
///
/// Left/top and right/bottom placements keep `inset` pixels from their edge;
/// centered content ignores the inset.
pub fn aligned_position(
    container: Size,
    content: Size,
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    inset: (i32, i32),
) -> (i32, i32) {
    let x = match horizontal {
        HorizontalAlign::Left => inset.0,
        HorizontalAlign::Center => (container.width - content.width) / 2,
        HorizontalAlign::Right => container.width - inset.0 - content.width,
    };
    let y = match vertical {
        VerticalAlign::Top => inset.1,
        VerticalAlign::Center => (container.height - content.height) / 2,
        VerticalAlign::Bottom => container.height - inset.1 - content.height,
    };
    (x, y)
}

/// Draw the state's image centered on the surface
pub(crate) fn compose_image(surface: &mut Surface, image: &Surface) {
    let (x, y) = aligned_position(
        surface.size(),
        image.size(),
        HorizontalAlign::Center,
        VerticalAlign::Center,
        (0, 0),
    );
    surface.blit(image, (x, y), BlendMode::Normal);
}

/// Draw the shape's text, and its shadow, for `state`
///
/// `edge_inset` is the shadow plus border width; theme padding is added on
/// top of it.
pub(crate) fn compose_text(
    surface: &mut Surface,
    theming: &ThemingParameters,
    state: &str,
    edge_inset: i32,
) {
    let (Some(text), Some(font)) = (theming.text.as_deref(), theming.font.as_ref()) else {
        return;
    };
    if text.is_empty() {
        return;
    }

    let paint = theming
        .paint(state, "text")
        .cloned()
        .unwrap_or(Paint::Solid(Color::WHITE));
    let rendered = render_text(font.as_ref(), text, &paint);
    let (x, y) = aligned_position(
        surface.size(),
        rendered.size(),
        theming.text_horiz_alignment,
        theming.text_vert_alignment,
        (
            edge_inset + theming.text_horiz_padding,
            edge_inset + theming.text_vert_padding,
        ),
    );

    if let Some(shadow) = theming.text_shadow {
        let shadow_paint = theming
            .paint(state, "text_shadow")
            .cloned()
            .unwrap_or(Paint::Solid(Color::BLACK));
        let shadow_text = render_text(font.as_ref(), text, &shadow_paint);
        let (ox, oy) = (x + shadow.offset.0, y + shadow.offset.1);
        let size = shadow.size.max(0);
        for dy in -size..=size {
            for dx in -size..=size {
                surface.blit(&shadow_text, (ox + dx, oy + dy), BlendMode::Normal);
            }
        }
    }

    surface.blit(&rendered, (x, y), BlendMode::Normal);
}

fn render_text(font: &dyn FontHandle, text: &str, paint: &Paint) -> Surface {
    match paint {
        Paint::Solid(color) => font.render(text, *color),
        Paint::Gradient(gradient) => {
            let mut surface = font.render(text, Color::WHITE);
            gradient.apply_to(&mut surface, None);
            surface
        }
    }
}

/// A fixed-advance font that draws every visible character as a solid box
///
/// Useful headless and as a stand-in while a real font loads.
#[derive(Clone, Debug)]
pub struct BlockFont {
    advance: i32,
    line_height: i32,
    ready: Arc<AtomicBool>,
}

impl BlockFont {
    pub fn new(advance: i32, line_height: i32) -> Self {
        Self {
            advance: advance.max(1),
            line_height: line_height.max(1),
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A font that reports itself as still loading until [`set_ready`](Self::set_ready)
    pub fn loading(advance: i32, line_height: i32) -> Self {
        let font = Self::new(advance, line_height);
        font.ready.store(false, Ordering::Release);
        font
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }
}

impl Default for BlockFont {
    fn default() -> Self {
        Self::new(8, 14)
    }
}

impl FontHandle for BlockFont {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn size_of(&self, text: &str) -> Size {
        Size::new(text.chars().count() as i32 * self.advance, self.line_height)
    }

    fn render(&self, text: &str, color: Color) -> Surface {
        let mut surface = Surface::from_size(self.size_of(text));
        let glyph_width = (self.advance - 1).max(1);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            surface.fill_rect(
                Rect::new(i as i32 * self.advance, 0, glyph_width, self.line_height),
                color,
            );
        }
        surface
    }
}
