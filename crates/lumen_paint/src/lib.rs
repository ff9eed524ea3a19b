//! Lumen Paint
//!
//! The paint layer between raw surfaces and themed shapes:
//!
//! - **Gradients**: two or three color linear blends at an angle, baked to a
//!   tiny texel strip and stretched over a stencil by multiplication
//! - **Paint**: the solid-color-or-gradient value every themed color slot holds
//! - **Stencils**: colorless white masks of rects, rounded rects and ellipses,
//!   recolored afterwards by a [`Paint`]
//! - **Shadows**: procedurally generated drop shadows assembled from memoized
//!   corner and edge tiles
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{Color, CornerRadii, Size};
//! use lumen_paint::{stencil, Paint};
//!
//! let mut body = stencil::rounded_rect(Size::new(40, 20), CornerRadii::uniform(6));
//! Paint::from(Color::rgb(32, 64, 96)).apply_to(&mut body, None);
//! assert_eq!(body.get_pixel(20, 10), Color::rgb(32, 64, 96));
//! assert_eq!(body.get_pixel(0, 0).a, 0);
//! ```

pub mod gradient;
pub mod paint;
pub mod shadow;
pub mod stencil;

pub use gradient::Gradient;
pub use paint::Paint;
pub use shadow::{ShadowCorners, ShadowGenerator, ShadowShape, ShadowStats};
