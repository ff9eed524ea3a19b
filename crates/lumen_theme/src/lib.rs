//! Lumen Theme
//!
//! A JSON-backed [`AppearanceProvider`](lumen_shapes::AppearanceProvider).
//!
//! Themes are blocks of colors, misc values and transition timings keyed by
//! element id. Lookups walk an element's ids from most to least specific,
//! then the theme's `defaults` block, then built-in defaults, and finally
//! try looser spellings of the key, so every lookup yields a value.
//!
//! Color values are `#RRGGBB` or `#RRGGBBAA`; gradients are two or three
//! colors and an angle in degrees: `"#FF0000,#0000FF,90"`.
//!
//! # Example
//!
//! ```rust
//! use lumen_core::Color;
//! use lumen_paint::Paint;
//! use lumen_shapes::AppearanceProvider;
//! use lumen_theme::Theme;
//!
//! let theme = Theme::from_json_str(r##"{
//!     "defaults": { "colours": { "normal_bg": "#202020" } },
//!     "button": {
//!         "colours": { "hovered_bg": "#3060A0FF" },
//!         "misc": { "shape_corner_radius": 6 }
//!     }
//! }"##).unwrap();
//!
//! let ids = ["#ok_button", "button"];
//! assert_eq!(theme.color_or_gradient(&ids, "hovered_bg"), Paint::from(Color::rgb(48, 96, 160)));
//! assert_eq!(theme.color_or_gradient(&ids, "normal_bg"), Paint::from(Color::rgb(32, 32, 32)));
//! assert_eq!(theme.misc(&ids, "shape_corner_radius").as_deref(), Some("6"));
//! ```

pub mod color;
pub mod defaults;
pub mod theme;

pub use color::{parse_color, parse_paint};
pub use theme::{ElementTheme, Theme};

use thiserror::Error;

/// Theme loading errors
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Invalid gradient '{value}': {reason}")]
    InvalidGradient { value: String, reason: String },

    #[error("Invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ThemeError>;
