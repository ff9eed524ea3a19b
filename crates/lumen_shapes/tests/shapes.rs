//! End-to-end drawable shape tests

use std::sync::{Arc, Once};

use lumen_core::{Color, CornerRadii, Point, Rect, Size};
use lumen_paint::{Gradient, Paint};
use lumen_raster::Surface;
use lumen_shapes::{
    build_cache_id, BlockFont, DrawableShape, EngineHandle, FilledBar, ShapeConfig, ShapeError,
    ShapeKind, ThemingParameters,
};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const BG: Color = Color::from_hex(0x204060FF);

fn button_theming() -> ThemingParameters {
    ThemingParameters::new(2, 2, 8)
        .with_paint("normal_bg", BG)
        .with_paint("normal_border", Color::WHITE)
        .with_paint("hovered_bg", Color::rgb(60, 100, 140))
}

fn button(engine: &EngineHandle) -> DrawableShape {
    DrawableShape::rounded_rectangle(
        Rect::new(0, 0, 100, 50),
        button_theming(),
        &["normal", "hovered"],
        engine.clone(),
    )
    .expect("normal state declared")
}

#[test]
fn test_rounded_rectangle_end_to_end() {
    init_tracing();
    let engine = EngineHandle::default();
    let shape = button(&engine);

    let surface = shape.get_surface("normal");
    assert_eq!(surface.size(), Size::new(100, 50));
    assert!(surface.get_pixel(50, 25).max_channel_difference(&BG) <= 2);

    // A 2px shadow adds round(20 / 2^1.5 * n) alpha per ring: 7 then 14
    assert_eq!(surface.get_pixel(50, 0), Color::rgba(0, 0, 0, 7));
    assert_eq!(surface.get_pixel(50, 1), Color::rgba(0, 0, 0, 21));
    assert_eq!(surface.get_pixel(0, 25), Color::rgba(0, 0, 0, 7));
    assert_eq!(surface.get_pixel(1, 25), Color::rgba(0, 0, 0, 21));
    assert_eq!(surface.get_pixel(50, 48), Color::rgba(0, 0, 0, 21));
    // Outside the outer ring's quarter circle around (10, 10)
    assert_eq!(surface.get_pixel(1, 1).a, 0);

    assert!(!shape.collide_point(Point::new(1.0, 1.0)));
    assert!(shape.collide_point(Point::new(50.0, 25.0)));

    // The shadow shows below the body's bottom edge
    assert_eq!(surface.get_pixel(50, 49), Color::rgba(0, 0, 0, 7));
    // The border sits just inside the click area
    assert_eq!(surface.get_pixel(50, 3), Color::WHITE);
}

#[test]
fn test_missing_normal_state_is_fatal() {
    let result = DrawableShape::rectangle(
        Rect::new(0, 0, 10, 10),
        ThemingParameters::default(),
        &["hovered"],
        EngineHandle::default(),
    );
    assert!(matches!(result, Err(ShapeError::MissingNormalState(states)) if states == ["hovered"]));
}

#[test]
fn test_first_state_drawn_rest_queued() {
    let engine = EngineHandle::default();
    let mut shape = DrawableShape::rectangle(
        Rect::new(0, 0, 30, 20),
        button_theming(),
        &["normal", "hovered", "selected", "disabled"],
        engine,
    )
    .unwrap();

    assert!(shape.state("normal").unwrap().is_generated());
    assert_eq!(shape.queued_states().collect::<Vec<_>>(), ["hovered", "selected"]);

    shape.update(0.016);
    assert!(shape.state("hovered").unwrap().is_generated());
    assert!(!shape.state("selected").unwrap().is_generated());

    shape.update(0.016);
    assert_eq!(shape.queued_states().count(), 0);
    assert!(!shape.state("disabled").unwrap().is_generated());

    // Never shown blank: switching draws on demand
    assert!(shape.set_active_state("disabled"));
    assert!(shape.state("disabled").unwrap().is_generated());
    assert!(!shape.set_active_state("pressed"));
    assert_eq!(shape.active_state(), "disabled");
}

#[test]
fn test_surface_fallbacks() {
    let shape = button(&EngineHandle::default());
    assert_eq!(shape.get_surface("hovered"), shape.get_surface("normal"));
    assert_eq!(shape.get_surface("missing"), shape.get_surface("normal"));
}

#[test]
fn test_clamp_invariants() {
    init_tracing();
    let engine = EngineHandle::new(ShapeConfig {
        cache_enabled: false,
        ..Default::default()
    });

    for (w, h) in [(1, 1), (9, 4), (40, 12)] {
        for shadow in [-3, 0, 2, 40] {
            for border in [-1, 0, 3] {
                for radius in [-2, 5, 100] {
                    let theming = ThemingParameters::new(shadow, border, radius);
                    let shape = DrawableShape::rounded_rectangle(
                        Rect::new(0, 0, w, h),
                        theming,
                        &["normal"],
                        engine.clone(),
                    )
                    .unwrap();

                    let min = w.min(h);
                    let sw = shape.shadow_width();
                    let bw = shape.border_width();
                    let click = shape.click_area();
                    assert!((0..=min / 2).contains(&sw), "shadow {sw} for {w}x{h}");
                    assert!((0..=(min - 2 * sw) / 2).contains(&bw), "border {bw} for {w}x{h}");
                    for r in shape.corner_radii().to_array() {
                        assert!((0..=click.width.min(click.height) / 2).contains(&r));
                    }
                    assert_eq!(shape.get_surface("normal").size(), Size::new(w, h));
                }
            }
        }
    }
}

#[test]
fn test_degenerate_rect_coerced() {
    let shape = DrawableShape::ellipse(
        Rect::new(5, 5, 0, -4),
        ThemingParameters::default(),
        &["normal"],
        EngineHandle::default(),
    )
    .unwrap();
    assert_eq!(shape.containing_rect(), Rect::new(5, 5, 1, 1));
    assert_eq!(shape.get_surface("normal").size(), Size::new(1, 1));
}

#[test]
fn test_identical_shapes_share_cached_bitmap() {
    let engine = EngineHandle::default();
    let first = button(&engine);
    let second = button(&engine);

    assert_eq!(first.stats().rasterizations, 1);
    assert_eq!(second.stats().rasterizations, 0);
    assert_eq!(second.stats().cache_hits, 1);
    assert_eq!(first.get_surface("normal"), second.get_surface("normal"));

    // Still identical once the entry moves into the atlas
    engine.update();
    let third = button(&engine);
    assert_eq!(third.stats().rasterizations, 0);
    assert_eq!(third.get_surface("normal"), first.get_surface("normal"));
    assert_eq!(engine.cache_stats().pages, 1);
}

#[test]
fn test_drop_releases_cache_entry() {
    let engine = EngineHandle::default();
    let key = build_cache_id(
        ShapeKind::RoundedRectangle,
        Size::new(100, 50),
        2,
        2,
        &Paint::from(Color::WHITE),
        &Paint::from(BG),
        Some(CornerRadii::uniform(8)),
    );

    let shape = button(&engine);
    assert_eq!(engine.with_cache(|cache| cache.users(&key)), 1);
    drop(shape);
    assert_eq!(engine.with_cache(|cache| cache.users(&key)), 0);

    engine.update();
    assert!(!engine.with_cache(|cache| cache.contains(&key)));
}

#[test]
fn test_resize_is_debounced() {
    let engine = EngineHandle::default();
    let mut shape = DrawableShape::rounded_rectangle(
        Rect::new(0, 0, 100, 50),
        button_theming(),
        &["normal", "hovered", "disabled"],
        engine.clone(),
    )
    .unwrap();
    shape.update(0.016);
    assert!(shape.state("hovered").unwrap().is_generated());

    assert!(!shape.set_dimensions(Size::new(100, 50)));
    assert!(shape.state("normal").unwrap().is_generated());

    assert!(shape.set_dimensions(Size::new(160, 60)));
    assert!(shape.is_resizing());
    assert!(shape.state_names().all(|name| !shape.state(name).unwrap().is_generated()));
    assert_eq!(shape.queued_states().collect::<Vec<_>>(), ["normal", "hovered"]);
    assert_eq!(shape.click_area(), Rect::new(2, 2, 156, 56));

    // Stale surfaces stay up while the drag continues
    shape.update(0.1);
    assert_eq!(shape.queued_states().count(), 2);
    assert_eq!(shape.get_surface("normal").size(), Size::new(100, 50));

    // Drawn mid-resize, so not offered to the cache
    let stored = engine.cache_stats().stored;
    shape.set_active_state("disabled");
    assert_eq!(shape.get_surface("disabled").size(), Size::new(160, 60));
    assert_eq!(engine.cache_stats().stored, stored);

    shape.update(0.3);
    assert!(!shape.is_resizing());
    assert_eq!(shape.get_surface("normal").size(), Size::new(160, 60));
    shape.update(0.016);
    assert!(shape.state("hovered").unwrap().is_generated());
    assert_eq!(shape.queued_states().count(), 0);
}

#[test]
fn test_set_position_moves_hit_area_only() {
    let mut shape = button(&EngineHandle::default());
    let redraws = shape.stats().redraws;

    shape.set_position(200, 100);
    assert_eq!(shape.containing_rect(), Rect::new(200, 100, 100, 50));
    assert_eq!(shape.click_area(), Rect::new(202, 102, 96, 46));
    assert!(shape.collide_point(Point::new(250.0, 125.0)));
    assert!(!shape.collide_point(Point::new(50.0, 25.0)));
    assert_eq!(shape.stats().redraws, redraws);
}

#[test]
fn test_ellipse_hit_test_ignores_corners() {
    let shape = DrawableShape::ellipse(
        Rect::new(0, 0, 60, 40),
        ThemingParameters::new(0, 1, 0).with_paint("normal_bg", Color::RED),
        &["normal"],
        EngineHandle::default(),
    )
    .unwrap();
    assert!(shape.collide_point(Point::new(30.0, 20.0)));
    assert!(!shape.collide_point(Point::new(2.0, 2.0)));
    assert_eq!(shape.get_surface("normal").get_pixel(0, 0).a, 0);
    assert_eq!(shape.get_surface("normal").get_pixel(30, 20), Color::RED);
}

#[test]
fn test_filled_bar_splits_background_and_skips_cache() {
    let engine = EngineHandle::default();
    let theming = ThemingParameters::new(0, 0, 0)
        .with_paint("normal_bg", Color::BLUE)
        .with_paint("filled_bar", Color::RED)
        .with_filled_bar(FilledBar::Fraction(0.5));
    let mut shape =
        DrawableShape::rectangle(Rect::new(0, 0, 100, 20), theming, &["normal"], engine.clone())
            .unwrap();

    let surface = shape.get_surface("normal");
    assert_eq!(surface.get_pixel(10, 10), Color::RED);
    assert_eq!(surface.get_pixel(90, 10), Color::BLUE);
    assert_eq!(engine.cache_stats().stored, 0);

    shape.set_filled_bar(Some(FilledBar::Width(80)));
    assert_eq!(shape.get_surface("normal").get_pixel(70, 10), Color::RED);
}

#[test]
fn test_gradient_background() {
    let theming = ThemingParameters::new(0, 0, 0)
        .with_paint("normal_bg", Gradient::two(0, Color::RED, Color::BLUE));
    let shape = DrawableShape::rectangle(
        Rect::new(0, 0, 64, 16),
        theming,
        &["normal"],
        EngineHandle::default(),
    )
    .unwrap();
    let surface = shape.get_surface("normal");
    let left = surface.get_pixel(1, 8);
    let right = surface.get_pixel(62, 8);
    assert!(left.r > 200 && left.b < 60);
    assert!(right.b > 200 && right.r < 60);
}

#[test]
fn test_text_waits_for_font() {
    let font = BlockFont::loading(8, 14);
    let theming = ThemingParameters::new(0, 0, 0)
        .with_paint("normal_bg", BG)
        .with_paint("normal_text", Color::WHITE)
        .with_text("abc", Arc::new(font.clone()));
    let mut shape = DrawableShape::rectangle(
        Rect::new(0, 0, 100, 40),
        theming,
        &["normal", "hovered"],
        EngineHandle::default(),
    )
    .unwrap();

    // Body drawn at once, text postponed and the state queued again
    assert_eq!(shape.get_surface("normal").get_pixel(38, 13), BG);
    assert_eq!(shape.queued_states().collect::<Vec<_>>(), ["hovered", "normal"]);

    shape.update(0.016);
    assert_eq!(shape.stats().font_deferrals, 1);
    assert!(!shape.state("hovered").unwrap().is_generated());

    font.set_ready(true);
    shape.update(0.016);
    assert_eq!(shape.get_surface("normal").get_pixel(38, 13), Color::WHITE);
    shape.update(0.016);
    assert_eq!(shape.get_surface("hovered").get_pixel(38, 13), Color::WHITE);
}

#[test]
fn test_state_image_centered() {
    let image = Arc::new(Surface::filled(4, 4, Color::GREEN));
    let theming = ThemingParameters::new(0, 0, 0)
        .with_paint("normal_bg", Color::BLUE)
        .with_image("normal_image", image);
    let shape = DrawableShape::rectangle(
        Rect::new(0, 0, 20, 20),
        theming,
        &["normal"],
        EngineHandle::default(),
    )
    .unwrap();
    let surface = shape.get_surface("normal");
    assert_eq!(surface.get_pixel(8, 8), Color::GREEN);
    assert_eq!(surface.get_pixel(11, 11), Color::GREEN);
    assert_eq!(surface.get_pixel(12, 12), Color::BLUE);
}

#[test]
fn test_rebuild_theming_is_immediate() {
    let mut shape = button(&EngineHandle::default());
    shape.rebuild_theming(button_theming().with_paint("normal_bg", Color::RED));
    assert!(!shape.is_resizing());
    assert_eq!(shape.get_surface("normal").get_pixel(50, 25), Color::RED);
}

#[test]
fn test_bake_rotation_gets_its_own_cache_entry() {
    let engine = EngineHandle::default();
    let gradient_rect = |gradient: Gradient| {
        DrawableShape::rectangle(
            Rect::new(0, 0, 64, 16),
            ThemingParameters::new(0, 0, 0).with_paint("normal_bg", gradient),
            &["normal"],
            engine.clone(),
        )
        .unwrap()
    };

    let plain = gradient_rect(Gradient::two(0, Color::RED, Color::BLUE));
    let rotated = gradient_rect(Gradient::two(0, Color::RED, Color::BLUE).with_bake_rotation(30.0));

    assert_eq!(rotated.stats().cache_hits, 0);
    assert_eq!(rotated.stats().rasterizations, 1);
    assert_eq!(engine.cache_stats().stored, 2);

    let uncached = DrawableShape::rectangle(
        Rect::new(0, 0, 64, 16),
        ThemingParameters::new(0, 0, 0)
            .with_paint("normal_bg", Gradient::two(0, Color::RED, Color::BLUE).with_bake_rotation(30.0)),
        &["normal"],
        EngineHandle::new(ShapeConfig {
            cache_enabled: false,
            ..ShapeConfig::default()
        }),
    )
    .unwrap();
    assert_eq!(rotated.get_surface("normal"), uncached.get_surface("normal"));
    assert_ne!(rotated.get_surface("normal"), plain.get_surface("normal"));
}

#[test]
fn test_oversized_shape_refused_once() {
    init_tracing();
    let engine = EngineHandle::new(ShapeConfig {
        atlas_page_size: 64,
        ..ShapeConfig::default()
    });
    let first = button(&engine);
    assert_eq!(first.stats().rasterizations, 1);
    assert_eq!(engine.cache_stats().refused, 1);
    assert_eq!(engine.cache_stats().stored, 0);

    // The same key is turned away without a second diagnostic
    let second = button(&engine);
    assert_eq!(second.stats().rasterizations, 1);
    assert_eq!(engine.cache_stats().refused, 1);
    assert_eq!(first.get_surface("normal"), second.get_surface("normal"));
}
