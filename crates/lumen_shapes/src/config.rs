//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::{Result, ShapeError};

/// Tunables shared by every shape drawn through one engine
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes:
///
/// ```rust
/// use lumen_shapes::ShapeConfig;
///
/// let config = ShapeConfig::from_toml_str("rebuild_delay = 0.5").unwrap();
/// assert_eq!(config.rebuild_delay, 0.5);
/// assert_eq!(config.atlas_page_size, 1024);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Linear supersampling factor for anti-aliased edges
    pub supersample: i32,
    /// Seconds a resize must settle before the full rebuild starts
    pub rebuild_delay: f32,
    /// Side length of one square atlas page in pixels
    pub atlas_page_size: i32,
    /// Whether finished shapes are looked up in and offered to the cache
    pub cache_enabled: bool,
    /// Whole shadows kept per shape family before the oldest is evicted
    pub shadow_cache_capacity: usize,
    /// Fraction of a dimension an ellipse shadow may differ by and still be
    /// rescaled instead of re-rendered
    pub ellipse_shadow_tolerance: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            supersample: 4,
            rebuild_delay: 0.35,
            atlas_page_size: 1024,
            cache_enabled: true,
            shadow_cache_capacity: 64,
            ellipse_shadow_tolerance: 0.05,
        }
    }
}

impl ShapeConfig {
    /// Parse a configuration from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| ShapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no shape could be drawn with
    pub fn validate(&self) -> Result<()> {
        if self.supersample < 1 {
            return Err(ShapeError::Config(format!(
                "supersample must be at least 1, got {}",
                self.supersample
            )));
        }
        if self.atlas_page_size < 1 {
            return Err(ShapeError::Config(format!(
                "atlas_page_size must be positive, got {}",
                self.atlas_page_size
            )));
        }
        if !(self.rebuild_delay >= 0.0) {
            return Err(ShapeError::Config(format!(
                "rebuild_delay must be non-negative, got {}",
                self.rebuild_delay
            )));
        }
        Ok(())
    }
}
