//! Per-state surfaces

use lumen_raster::Surface;

/// States drawn only when first shown rather than ahead of time
pub const ON_DEMAND_STATES: &[&str] = &["disabled"];

/// One named visual state of a shape and its rasterized surface
#[derive(Clone, Debug)]
pub struct ShapeState {
    name: String,
    pub(crate) surface: Option<Surface>,
    pub(crate) generated: bool,
    pub(crate) has_fresh_surface: bool,
    pub(crate) auto_pregenerate: bool,
    pub(crate) cache_key: Option<String>,
}

impl ShapeState {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let auto_pregenerate = !ON_DEMAND_STATES.contains(&name.as_str());
        Self {
            name,
            surface: None,
            generated: false,
            has_fresh_surface: false,
            auto_pregenerate,
            cache_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last surface drawn for this state, possibly stale after a resize
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Whether the surface matches the current geometry and theme
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn has_fresh_surface(&self) -> bool {
        self.has_fresh_surface
    }

    /// Whether this state is queued for drawing on every rebuild
    pub fn auto_pregenerate(&self) -> bool {
        self.auto_pregenerate
    }

    /// Mark stale; the old surface is kept until a redraw replaces it.
    /// Returns the cache key the state was registered under, if any.
    pub(crate) fn invalidate(&mut self) -> Option<String> {
        self.generated = false;
        self.has_fresh_surface = false;
        self.cache_key.take()
    }

    pub(crate) fn store(&mut self, surface: Surface) {
        self.surface = Some(surface);
        self.generated = true;
        self.has_fresh_surface = true;
    }
}
