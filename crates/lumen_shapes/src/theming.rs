//! Typed theming parameters for one shape

use std::fmt;
use std::sync::Arc;

use lumen_core::CornerRadii;
use lumen_paint::Paint;
use lumen_raster::Surface;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::provider::{AppearanceProvider, FontHandle};

/// Horizontal text placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlign {
    /// Parse a theme value; anything unrecognized is centered
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            "center" | "centre" => Self::Center,
            other => {
                debug!("unknown horizontal alignment '{}', centering", other);
                Self::Center
            }
        }
    }
}

/// Vertical text placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlign {
    /// Parse a theme value; anything unrecognized is centered
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "center" | "centre" => Self::Center,
            other => {
                debug!("unknown vertical alignment '{}', centering", other);
                Self::Center
            }
        }
    }
}

/// A text shadow: the text redrawn in the shadow color, dilated by `size`
/// pixels and displaced by `offset`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextShadow {
    pub size: i32,
    pub offset: (i32, i32),
}

/// How much of the background a progress-style bar covers, from the left
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilledBar {
    /// Width in pixels
    Width(i32),
    /// Fraction of the background width, 0.0 to 1.0
    Fraction(f32),
}

impl FilledBar {
    /// Covered pixels out of `total`
    pub fn width_of(&self, total: i32) -> i32 {
        match *self {
            FilledBar::Width(width) => width.clamp(0, total.max(0)),
            FilledBar::Fraction(fraction) => {
                ((total as f32 * fraction.clamp(0.0, 1.0)).round() as i32).clamp(0, total.max(0))
            }
        }
    }
}

/// Everything that decides how a shape looks
///
/// Paints and images are keyed `<state>_<part>` (`hovered_bg`,
/// `normal_border`, `selected_text`, `normal_image`...). Lookups for a state
/// without its own entry fall back to the `normal` entry.
#[derive(Clone, Default)]
pub struct ThemingParameters {
    pub shadow_width: i32,
    pub border_width: i32,
    pub corner_radii: CornerRadii,
    pub text: Option<String>,
    pub font: Option<Arc<dyn FontHandle>>,
    pub text_horiz_alignment: HorizontalAlign,
    pub text_vert_alignment: VerticalAlign,
    pub text_horiz_padding: i32,
    pub text_vert_padding: i32,
    pub text_shadow: Option<TextShadow>,
    pub filled_bar: Option<FilledBar>,
    paints: FxHashMap<String, Paint>,
    images: FxHashMap<String, Arc<Surface>>,
    transitions: FxHashMap<(String, String), f32>,
}

impl ThemingParameters {
    pub fn new(shadow_width: i32, border_width: i32, corner_radii: impl Into<CornerRadii>) -> Self {
        Self {
            shadow_width,
            border_width,
            corner_radii: corner_radii.into(),
            ..Default::default()
        }
    }

    pub fn with_paint(mut self, key: impl Into<String>, paint: impl Into<Paint>) -> Self {
        self.set_paint(key, paint);
        self
    }

    pub fn set_paint(&mut self, key: impl Into<String>, paint: impl Into<Paint>) {
        self.paints.insert(key.into(), paint.into());
    }

    pub fn with_image(mut self, key: impl Into<String>, image: Arc<Surface>) -> Self {
        self.images.insert(key.into(), image);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>, font: Arc<dyn FontHandle>) -> Self {
        self.text = Some(text.into());
        self.font = Some(font);
        self
    }

    pub fn with_alignment(mut self, horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        self.text_horiz_alignment = horizontal;
        self.text_vert_alignment = vertical;
        self
    }

    pub fn with_padding(mut self, horizontal: i32, vertical: i32) -> Self {
        self.text_horiz_padding = horizontal;
        self.text_vert_padding = vertical;
        self
    }

    pub fn with_text_shadow(mut self, shadow: TextShadow) -> Self {
        self.text_shadow = Some(shadow);
        self
    }

    pub fn with_filled_bar(mut self, bar: FilledBar) -> Self {
        self.filled_bar = Some(bar);
        self
    }

    /// Cross-fade for `duration` seconds whenever `from` switches to `to`
    pub fn with_transition(mut self, from: &str, to: &str, duration: f32) -> Self {
        self.transitions
            .insert((from.to_string(), to.to_string()), duration.max(0.0));
        self
    }

    /// The paint for `part` of `state`, falling back to the normal state
    pub fn paint(&self, state: &str, part: &str) -> Option<&Paint> {
        self.paints
            .get(&format!("{state}_{part}"))
            .or_else(|| self.paints.get(&format!("normal_{part}")))
    }

    /// A paint stored under an exact key, with no state fallback
    pub fn paint_by_key(&self, key: &str) -> Option<&Paint> {
        self.paints.get(key)
    }

    /// The image for `state`, falling back to the normal state's image
    pub fn image(&self, state: &str) -> Option<&Arc<Surface>> {
        self.images
            .get(&format!("{state}_image"))
            .or_else(|| self.images.get("normal_image"))
    }

    pub fn transition_duration(&self, from: &str, to: &str) -> Option<f32> {
        self.transitions
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .filter(|d| *d > 0.0)
    }

    /// Whether any text will be drawn
    pub fn has_text(&self) -> bool {
        self.font.is_some() && self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Read every themed value for an element from a provider
    ///
    /// Numeric values that fail to parse are logged and read as zero.
    /// Text itself is widget content, not theme, and is left unset.
    pub fn from_provider<P>(provider: &P, ids: &[&str], states: &[&str]) -> Self
    where
        P: AppearanceProvider + ?Sized,
    {
        let misc_int = |key: &str| -> i32 {
            provider
                .misc(ids, key)
                .map(|value| parse_int(key, &value))
                .unwrap_or(0)
        };

        let mut params = Self::new(
            misc_int("shadow_width"),
            misc_int("border_width"),
            provider
                .misc(ids, "shape_corner_radius")
                .map(|value| parse_radii(&value))
                .unwrap_or_default(),
        );

        for state in states {
            for part in ["bg", "border", "text", "text_shadow"] {
                let key = format!("{state}_{part}");
                params.set_paint(key.clone(), provider.color_or_gradient(ids, &key));
            }
            let image_key = format!("{state}_image");
            if let Some(image) = provider.image(ids, &image_key) {
                params.images.insert(image_key, image);
            }
        }
        params.set_paint("filled_bar", provider.color_or_gradient(ids, "filled_bar"));

        for from in states {
            for to in states {
                if from == to {
                    continue;
                }
                if let Some(duration) = provider.transition_duration(ids, from, to) {
                    params = params.with_transition(from, to, duration);
                }
            }
        }

        if let Some(value) = provider.misc(ids, "text_horiz_alignment") {
            params.text_horiz_alignment = HorizontalAlign::parse(&value);
        }
        if let Some(value) = provider.misc(ids, "text_vert_alignment") {
            params.text_vert_alignment = VerticalAlign::parse(&value);
        }
        params.text_horiz_padding = misc_int("text_horiz_alignment_padding");
        params.text_vert_padding = misc_int("text_vert_alignment_padding");

        let shadow_size = misc_int("text_shadow_size");
        if shadow_size > 0 {
            let offset = provider
                .misc(ids, "text_shadow_offset")
                .and_then(|value| parse_pair(&value))
                .unwrap_or((0, 0));
            params.text_shadow = Some(TextShadow {
                size: shadow_size,
                offset,
            });
        }

        params.font = Some(provider.font(ids));
        params
    }
}

impl fmt::Debug for ThemingParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemingParameters")
            .field("shadow_width", &self.shadow_width)
            .field("border_width", &self.border_width)
            .field("corner_radii", &self.corner_radii)
            .field("text", &self.text)
            .field("has_font", &self.font.is_some())
            .field("paints", &self.paints.len())
            .field("images", &self.images.len())
            .field("transitions", &self.transitions.len())
            .field("filled_bar", &self.filled_bar)
            .finish()
    }
}

fn parse_int(key: &str, value: &str) -> i32 {
    value.trim().parse().unwrap_or_else(|_| {
        warn!("theme value {} = '{}' is not an integer, using 0", key, value);
        0
    })
}

/// `"8"` for all corners or `"tl,tr,bl,br"`
fn parse_radii(value: &str) -> CornerRadii {
    let parts: Vec<i32> = value
        .split(',')
        .map(|part| parse_int("shape_corner_radius", part))
        .collect();
    match parts.as_slice() {
        [uniform] => CornerRadii::uniform(*uniform),
        [tl, tr, bl, br] => CornerRadii::new(*tl, *tr, *bl, *br),
        _ => {
            warn!("shape_corner_radius '{}' needs 1 or 4 values", value);
            CornerRadii::ZERO
        }
    }
}

fn parse_pair(value: &str) -> Option<(i32, i32)> {
    let (x, y) = value.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}
