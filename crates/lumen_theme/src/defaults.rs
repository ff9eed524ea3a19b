//! Built-in theme values, used when neither an element nor the theme's
//! `defaults` block provides a key

use lumen_core::Color;

/// Color shown for keys nothing can resolve
pub const MISSING_COLOR: Color = Color::from_hex(0xFF00FFFF);

const COLORS: &[(&str, u32)] = &[
    ("normal_bg", 0x25292EFF),
    ("hovered_bg", 0x35393EFF),
    ("disabled_bg", 0x25292EFF),
    ("selected_bg", 0x193754FF),
    ("active_bg", 0x193754FF),
    ("normal_border", 0xDDDDDDFF),
    ("hovered_border", 0xB0B0B0FF),
    ("disabled_border", 0x808080FF),
    ("selected_border", 0x8080B0FF),
    ("active_border", 0x8080B0FF),
    ("normal_text", 0xC5CBD8FF),
    ("hovered_text", 0xFFFFFFFF),
    ("disabled_text", 0x6D736FFF),
    ("selected_text", 0xFFFFFFFF),
    ("active_text", 0xFFFFFFFF),
    ("normal_text_shadow", 0x777777FF),
    ("filled_bar", 0xF4251BFF),
    ("unfilled_bar", 0xCCCCCCFF),
];

const MISC: &[(&str, &str)] = &[
    ("shadow_width", "2"),
    ("border_width", "1"),
    ("shape_corner_radius", "2"),
    ("text_horiz_alignment", "center"),
    ("text_vert_alignment", "center"),
    ("text_horiz_alignment_padding", "0"),
    ("text_vert_alignment_padding", "0"),
    ("text_shadow_size", "0"),
    ("text_shadow_offset", "0,0"),
];

pub fn color(key: &str) -> Option<Color> {
    COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, hex)| Color::from_hex(*hex))
}

pub fn misc(key: &str) -> Option<&'static str> {
    MISC.iter().find(|(name, _)| *name == key).map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        assert_eq!(color("normal_bg"), Some(Color::rgb(0x25, 0x29, 0x2E)));
        assert_eq!(color("pressed_bg"), None);
        assert_eq!(misc("border_width"), Some("1"));
        assert_eq!(misc("nope"), None);
    }
}
