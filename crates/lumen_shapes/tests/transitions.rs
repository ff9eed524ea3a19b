//! State transition tests

use lumen_core::{Color, Rect};
use lumen_shapes::{DrawableShape, EngineHandle, ThemingParameters};

const NORMAL: Color = Color::rgb(20, 40, 60);
const HOVERED: Color = Color::rgb(220, 140, 60);

fn fading_button(duration: f32) -> DrawableShape {
    button_with(
        ThemingParameters::new(0, 1, 4).with_transition("normal", "hovered", duration),
    )
}

fn button_with(theming: ThemingParameters) -> DrawableShape {
    let theming = theming
        .with_paint("normal_bg", NORMAL)
        .with_paint("hovered_bg", HOVERED)
        .with_paint("normal_border", Color::WHITE);
    DrawableShape::rounded_rectangle(
        Rect::new(0, 0, 60, 30),
        theming,
        &["normal", "hovered"],
        EngineHandle::default(),
    )
    .unwrap()
}

#[test]
fn test_transition_blends_then_settles() {
    let mut shape = fading_button(0.2);
    assert!(shape.set_active_state("hovered"));
    assert!(shape.transition().is_some());

    shape.update(0.1);
    let mid = shape.get_active_state_surface().get_pixel(30, 15);
    assert_ne!(mid, NORMAL);
    assert_ne!(mid, HOVERED);
    assert!(mid.max_channel_difference(&Color::lerp(&NORMAL, &HOVERED, 0.5)) <= 1);

    shape.update(0.2);
    assert!(shape.transition().is_none());
    assert_eq!(
        shape.get_active_state_surface().as_ref(),
        shape.get_surface("hovered")
    );
}

#[test]
fn test_no_transition_without_duration() {
    let mut shape = fading_button(0.2);
    shape.set_active_state("hovered");
    shape.update(1.0);

    // Only normal -> hovered is timed
    shape.set_active_state("normal");
    assert!(shape.transition().is_none());
    assert_eq!(shape.get_active_state_surface().get_pixel(30, 15), NORMAL);
}

#[test]
fn test_reversal_continues_from_current_blend() {
    let mut shape = button_with(
        ThemingParameters::new(0, 1, 4)
            .with_transition("normal", "hovered", 1.0)
            .with_transition("hovered", "normal", 1.0),
    );
    shape.set_active_state("hovered");
    shape.update(0.3);
    let before = shape.get_active_state_surface().get_pixel(30, 15);

    shape.set_active_state("normal");
    let transition = shape.transition().expect("reversed, not dropped");
    assert_eq!(transition.from_state(), "hovered");
    assert!((transition.elapsed() - 0.7).abs() < 1e-5);

    let after = shape.get_active_state_surface().get_pixel(30, 15);
    assert!(before.max_channel_difference(&after) <= 1);

    shape.update(0.5);
    assert!(shape.transition().is_none());
    assert_eq!(shape.get_active_state_surface().get_pixel(30, 15), NORMAL);
}

#[test]
fn test_reversal_uses_reverse_pair_duration() {
    let mut shape = button_with(
        ThemingParameters::new(0, 1, 4)
            .with_transition("normal", "hovered", 1.0)
            .with_transition("hovered", "normal", 4.0),
    );
    shape.set_active_state("hovered");
    shape.update(0.3);
    let before = shape.get_active_state_surface().get_pixel(30, 15);

    shape.set_active_state("normal");
    let transition = shape.transition().expect("reverse pair is timed");
    assert_eq!(transition.from_state(), "hovered");
    assert_eq!(transition.to_state(), "normal");
    assert_eq!(transition.duration(), 4.0);
    assert!((transition.progress() - 0.7).abs() < 1e-5);

    let after = shape.get_active_state_surface().get_pixel(30, 15);
    assert!(before.max_channel_difference(&after) <= 1);

    // 1.2s remain of the slower fade back
    shape.update(1.0);
    assert!(shape.transition().is_some());
    shape.update(0.5);
    assert!(shape.transition().is_none());
    assert_eq!(shape.get_active_state_surface().get_pixel(30, 15), NORMAL);
}

#[test]
fn test_untimed_reversal_drops_fade() {
    let mut shape = fading_button(1.0);
    shape.set_active_state("hovered");
    shape.update(0.3);
    assert!(shape.transition().is_some());

    // Only normal -> hovered is timed, so switching back snaps
    shape.set_active_state("normal");
    assert!(shape.transition().is_none());
    assert_eq!(shape.get_active_state_surface().get_pixel(30, 15), NORMAL);
}

#[test]
fn test_fresh_surface_protocol() {
    let mut shape = fading_button(0.2);
    assert!(shape.has_fresh_surface());
    assert!(shape.take_fresh_surface().is_some());
    assert!(!shape.has_fresh_surface());
    assert!(shape.take_fresh_surface().is_none());

    // A running fade produces a new frame every update
    shape.set_active_state("hovered");
    shape.update(0.05);
    assert!(shape.has_fresh_surface());
    shape.take_fresh_surface();
    assert!(shape.has_fresh_surface());

    shape.update(0.5);
    assert!(shape.take_fresh_surface().is_some());
    assert!(!shape.has_fresh_surface());
}
