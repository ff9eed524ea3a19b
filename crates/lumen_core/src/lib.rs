//! Lumen Core Types
//!
//! The foundational value types shared by every Lumen crate:
//!
//! - **Geometry**: integer pixel rectangles and sizes, plus a floating-point
//!   [`Point`] for hit testing
//! - **Color**: 8-bit straight-alpha RGBA, the unit every surface stores
//! - **Corner radii**: per-corner radii for rounded shapes and shadows
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{Color, Rect};
//!
//! let rect = Rect::new(0, 0, 100, 50);
//! let inner = rect.inset(2);
//! assert_eq!(inner, Rect::new(2, 2, 96, 46));
//!
//! let bg = Color::from_hex(0x204060FF);
//! assert_eq!(bg.to_array(), [0x20, 0x40, 0x60, 0xFF]);
//! ```

pub mod color;
pub mod corners;
pub mod geometry;

pub use color::Color;
pub use corners::{Corner, CornerRadii};
pub use geometry::{Point, Rect, Size};
