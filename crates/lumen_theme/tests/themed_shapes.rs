//! Shapes themed from JSON

use std::sync::Once;

use lumen_core::{Color, CornerRadii, Rect, Size};
use lumen_shapes::{DrawableShape, EngineHandle, HorizontalAlign, ShapeKind, ThemingParameters};
use lumen_theme::Theme;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const THEME: &str = r##"{
    "defaults": {
        "colours": { "normal_bg": "#202020", "normal_border": "#FFFFFF" },
        "misc": { "shadow_width": 0, "border_width": 1 }
    },
    "button": {
        "colours": { "hovered_bg": "#4080C0" },
        "misc": {
            "shape_corner_radius": "6,6,0,0",
            "text_horiz_alignment": "left",
            "text_horiz_alignment_padding": 3
        },
        "transitions": { "normal_hovered": 0.5 }
    }
}"##;

const IDS: [&str; 2] = ["#ok_button", "button"];
const STATES: [&str; 2] = ["normal", "hovered"];

#[test]
fn test_theming_parameters_from_theme() {
    init_tracing();
    let theme = Theme::from_json_str(THEME).unwrap();
    let theming = ThemingParameters::from_provider(&theme, &IDS, &STATES);

    assert_eq!(theming.shadow_width, 0);
    assert_eq!(theming.border_width, 1);
    assert_eq!(theming.corner_radii, CornerRadii::new(6, 6, 0, 0));
    assert_eq!(theming.text_horiz_alignment, HorizontalAlign::Left);
    assert_eq!(theming.text_horiz_padding, 3);
    assert_eq!(theming.transition_duration("normal", "hovered"), Some(0.5));
    assert_eq!(theming.transition_duration("hovered", "normal"), None);
    assert!(theming.font.is_some());
}

#[test]
fn test_themed_shape_draws_theme_colors() {
    init_tracing();
    let theme = Theme::from_json_str(THEME).unwrap();
    let theming = ThemingParameters::from_provider(&theme, &IDS, &STATES);
    let mut shape = DrawableShape::new(
        ShapeKind::RoundedRectangle,
        Rect::new(0, 0, 80, 40),
        theming,
        &STATES,
        EngineHandle::default(),
    )
    .unwrap();

    let normal = shape.get_surface("normal");
    assert_eq!(normal.size(), Size::new(80, 40));
    assert!(normal.get_pixel(40, 20).max_channel_difference(&Color::rgb(32, 32, 32)) <= 2);

    shape.update(0.0);
    let hovered = shape.get_surface("hovered");
    assert!(hovered.get_pixel(40, 20).max_channel_difference(&Color::rgb(64, 128, 192)) <= 2);
}
