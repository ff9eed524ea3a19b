//! Shared shape services
//!
//! One [`ShapeEngine`] owns the state every shape shares: the shape cache,
//! the shadow generator and the configuration. Shapes hold an
//! [`EngineHandle`] to it, passed in at construction, so separate engines
//! (one per window, or one per test) never see each other's atlas.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lumen_paint::{ShadowGenerator, ShadowStats};

use crate::cache::{CacheStats, ShapeCache};
use crate::config::ShapeConfig;

/// The shape cache, shadow generator and configuration shared by shapes
#[derive(Debug)]
pub struct ShapeEngine {
    config: ShapeConfig,
    cache: ShapeCache,
    shadows: ShadowGenerator,
}

impl ShapeEngine {
    pub fn new(config: ShapeConfig) -> Self {
        Self {
            cache: ShapeCache::new(config.atlas_page_size),
            shadows: ShadowGenerator::new(
                config.supersample,
                config.shadow_cache_capacity,
                config.ellipse_shadow_tolerance,
            ),
            config,
        }
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    pub fn cache(&self) -> &ShapeCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ShapeCache {
        &mut self.cache
    }

    pub fn shadows(&self) -> &ShadowGenerator {
        &self.shadows
    }

    pub fn shadows_mut(&mut self) -> &mut ShadowGenerator {
        &mut self.shadows
    }

    /// Per-frame maintenance: promote one pending cache entry to the atlas
    pub fn update(&mut self) {
        self.cache.update();
    }
}

impl Default for ShapeEngine {
    fn default() -> Self {
        Self::new(ShapeConfig::default())
    }
}

/// Cloneable handle to a shared [`ShapeEngine`]
///
/// Each call locks the engine for its own duration only.
#[derive(Clone, Debug, Default)]
pub struct EngineHandle {
    inner: Arc<Mutex<ShapeEngine>>,
}

impl EngineHandle {
    pub fn new(config: ShapeConfig) -> Self {
        Self::from_engine(ShapeEngine::new(config))
    }

    pub fn from_engine(engine: ShapeEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// A shape panicking mid-draw leaves the engine usable
    fn lock(&self) -> MutexGuard<'_, ShapeEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut ShapeEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn with_cache<R>(&self, f: impl FnOnce(&mut ShapeCache) -> R) -> R {
        f(self.lock().cache_mut())
    }

    pub fn with_shadows<R>(&self, f: impl FnOnce(&mut ShadowGenerator) -> R) -> R {
        f(self.lock().shadows_mut())
    }

    pub fn config(&self) -> ShapeConfig {
        self.lock().config().clone()
    }

    /// See [`ShapeEngine::update`]
    pub fn update(&self) {
        self.lock().update();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock().cache().stats()
    }

    pub fn shadow_stats(&self) -> ShadowStats {
        self.lock().shadows().stats()
    }

    /// Whether two handles share one engine
    pub fn same_engine(&self, other: &EngineHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Color;
    use lumen_raster::Surface;

    #[test]
    fn test_handles_share_one_cache() {
        let engine = EngineHandle::default();
        let other = engine.clone();
        assert!(engine.same_engine(&other));
        assert!(!engine.same_engine(&EngineHandle::default()));

        engine.with_cache(|cache| {
            cache.add_surface_to_cache(Surface::filled(4, 4, Color::RED), "k");
            cache.add_user("k");
        });
        assert!(other.with_cache(|cache| cache.contains("k")));

        other.update();
        assert_eq!(engine.cache_stats().promoted, 1);
        assert_eq!(engine.cache_stats().pages, 1);
    }

    #[test]
    fn test_config_drives_cache() {
        let engine = EngineHandle::new(ShapeConfig {
            atlas_page_size: 256,
            ..Default::default()
        });
        assert_eq!(engine.with_cache(|cache| cache.page_size()), 256);
    }
}
