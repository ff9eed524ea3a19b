//! Lumen Raster Surfaces
//!
//! The software raster layer every Lumen shape is drawn with. A [`Surface`]
//! is an owned straight-alpha RGBA buffer supporting:
//!
//! - Solid fills over the whole surface or a rect, with any [`BlendMode`]
//! - Blits with normal, replace, multiply, additive, subtractive and
//!   alpha-subtractive blending
//! - Rotation by arbitrary angles, nearest and smooth scaling, box
//!   downsampling (for supersampled anti-aliasing) and flips
//! - Filled circle, ellipse and rect primitives
//! - Shared read-only sub-views via [`SurfaceView`]
//!
//! Pixels outside a surface are silently clipped, never an error.
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{Color, Rect};
//! use lumen_raster::{BlendMode, Surface};
//!
//! let mut stencil = Surface::filled(8, 8, Color::WHITE);
//! stencil.fill_blend(Color::rgba(32, 64, 96, 255), None, BlendMode::Multiply);
//! assert_eq!(stencil.get_pixel(3, 3), Color::rgba(32, 64, 96, 255));
//!
//! let mut target = Surface::new(16, 16);
//! target.blit(&stencil, (4, 4), BlendMode::Normal);
//! assert_eq!(target.get_pixel(4, 4).a, 255);
//! assert_eq!(target.get_pixel(0, 0).a, 0);
//! ```

pub mod blend;
pub mod draw;
pub mod surface;
pub mod transform;
pub mod view;

pub use blend::BlendMode;
pub use surface::Surface;
pub use transform::rotated_size;
pub use view::SurfaceView;
