//! Color and gradient strings

use lumen_core::Color;
use lumen_paint::{Gradient, Paint};

use crate::{Result, ThemeError};

/// Parse `#RRGGBB` or `#RRGGBBAA`
pub fn parse_color(value: &str) -> Result<Color> {
    let invalid = || ThemeError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    match hex.len() {
        6 => Ok(Color::from_hex((packed << 8) | 0xFF)),
        8 => Ok(Color::from_hex(packed)),
        _ => Err(invalid()),
    }
}

/// Parse a solid color, or a gradient written `color,color[,color],angle`
pub fn parse_paint(value: &str) -> Result<Paint> {
    if !value.contains(',') {
        return parse_color(value).map(Paint::Solid);
    }

    let invalid = |reason: &str| ThemeError::InvalidGradient {
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let (angle, colors) = parts
        .split_last()
        .ok_or_else(|| invalid("empty gradient"))?;
    let angle: i32 = angle
        .parse()
        .map_err(|_| invalid("last value must be an integer angle"))?;
    let colors = colors
        .iter()
        .map(|c| parse_color(c))
        .collect::<Result<Vec<_>>>()?;

    match colors.as_slice() {
        [first, second] => Ok(Paint::Gradient(Gradient::two(angle, *first, *second))),
        [first, second, third] => Ok(Paint::Gradient(Gradient::three(angle, *first, *second, *third))),
        _ => Err(invalid("needs two or three colors")),
    }
}
