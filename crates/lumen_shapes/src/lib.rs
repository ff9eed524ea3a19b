//! Lumen Shapes
//!
//! Themed widget bodies drawn in software and cached across instances:
//!
//! - **Drawable shapes**: rectangles, rounded rectangles and ellipses with a
//!   border, background, optional filled bar, drop shadow, image and text,
//!   rendered once per named visual state (`normal`, `hovered`, ...)
//! - **Deferred redraws**: one queued state is rasterized per
//!   [`DrawableShape::update`] call, and interactive resizes are debounced
//! - **State transitions**: timed cross-fades between state surfaces that
//!   reverse mid-flight without jumping
//! - **Shape cache**: finished bitmaps keyed by their visual parameters,
//!   packed into shared atlas pages so identical widgets rasterize once
//!
//! Shapes never touch global state. Everything they share lives in a
//! [`ShapeEngine`] reached through a cloneable [`EngineHandle`].
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{Color, CornerRadii, Rect};
//! use lumen_shapes::{DrawableShape, EngineHandle, ShapeKind, ThemingParameters};
//!
//! let engine = EngineHandle::default();
//! let theming = ThemingParameters::new(2, 1, CornerRadii::uniform(6))
//!     .with_paint("normal_bg", Color::rgb(40, 60, 90))
//!     .with_paint("normal_border", Color::WHITE)
//!     .with_paint("hovered_bg", Color::rgb(60, 90, 130));
//!
//! let mut shape = DrawableShape::new(
//!     ShapeKind::RoundedRectangle,
//!     Rect::new(0, 0, 120, 40),
//!     theming,
//!     &["normal", "hovered"],
//!     engine.clone(),
//! )
//! .unwrap();
//!
//! // The first state is ready immediately, the rest arrive one per frame
//! assert_eq!(shape.get_surface("normal").width(), 120);
//! shape.update(1.0 / 60.0);
//! engine.update();
//!
//! shape.set_active_state("hovered");
//! assert!(shape.collide_point((60.0, 20.0).into()));
//! ```

pub mod cache;
pub mod config;
pub mod engine;
mod ellipse;
pub mod provider;
mod rectangle;
mod rounded_rectangle;
mod session;
pub mod shape;
pub mod state;
pub mod text;
pub mod theming;
pub mod transition;

pub use cache::{build_cache_id, CacheStats, ShapeCache};
pub use config::ShapeConfig;
pub use engine::{EngineHandle, ShapeEngine};
pub use provider::{AppearanceProvider, FontHandle};
pub use shape::{DrawableShape, ShapeKind, ShapeStats};
pub use state::ShapeState;
pub use text::{aligned_position, BlockFont};
pub use theming::{FilledBar, HorizontalAlign, TextShadow, ThemingParameters, VerticalAlign};
pub use transition::{blend_surfaces, StateTransition};

use thiserror::Error;

/// Shape engine errors
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Shape declares no 'normal' state (declared: {0:?})")]
    MissingNormalState(Vec<String>),

    #[error("Invalid shape configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShapeError>;
