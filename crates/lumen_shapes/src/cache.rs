//! Shape cache
//!
//! Finished shape bitmaps keyed by everything that decides their pixels.
//! New entries wait in a short-term tier; [`ShapeCache::update`] moves one
//! per call into the long-term tier, which packs them into shared atlas
//! pages with free-rectangle bin packing.
//!
//! Entries are never invalidated: the key is the content. Atlas pages are
//! never reclaimed either, so the long-term tier only grows.

use std::sync::Arc;

use indexmap::IndexMap;
use lumen_core::{CornerRadii, Rect, Size};
use lumen_paint::Paint;
use lumen_raster::{BlendMode, Surface, SurfaceView};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::shape::ShapeKind;

/// Canonical cache key for a finished shape
///
/// `{kind}_{w}_{h}_{shadow}_{border}[_{r0}_{r1}_{r2}_{r3}]_{border paint}_{bg paint}`
pub fn build_cache_id(
    kind: ShapeKind,
    size: Size,
    shadow_width: i32,
    border_width: i32,
    border: &Paint,
    background: &Paint,
    corner_radii: Option<CornerRadii>,
) -> String {
    let mut id = format!(
        "{}_{}_{}_{}_{}",
        kind, size.width, size.height, shadow_width, border_width
    );
    if let Some(radii) = corner_radii {
        for radius in radii.to_array() {
            id.push('_');
            id.push_str(&radius.to_string());
        }
    }
    id.push('_');
    id.push_str(&border.cache_key());
    id.push('_');
    id.push_str(&background.cache_key());
    id
}

/// Cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub stored: usize,
    pub promoted: usize,
    pub purged: usize,
    pub refused: usize,
    pub pages: usize,
}

#[derive(Debug)]
struct ShortTermEntry {
    surface: Arc<Surface>,
    users: usize,
}

#[derive(Debug, Clone, Copy)]
struct AtlasSlot {
    page: usize,
    rect: Rect,
    users: usize,
}

/// Two-tier store of finished shape bitmaps
#[derive(Debug)]
pub struct ShapeCache {
    page_size: i32,
    pages: Vec<Arc<Surface>>,
    /// Free space on the newest page only; older pages are considered full
    free_rects: Vec<Rect>,
    long_term: FxHashMap<String, AtlasSlot>,
    /// Insertion ordered so promotion is first in, first out
    short_term: IndexMap<String, ShortTermEntry>,
    oversized: FxHashSet<String>,
    stats: CacheStats,
}

impl ShapeCache {
    pub fn new(page_size: i32) -> Self {
        Self {
            page_size: page_size.max(1),
            pages: Vec::new(),
            free_rects: Vec::new(),
            long_term: FxHashMap::default(),
            short_term: IndexMap::new(),
            oversized: FxHashSet::default(),
            stats: CacheStats::default(),
        }
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pages: self.pages.len(),
            ..self.stats
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Surface> {
        self.pages.get(index).map(|page| page.as_ref())
    }

    pub fn short_term_len(&self) -> usize {
        self.short_term.len()
    }

    pub fn long_term_len(&self) -> usize {
        self.long_term.len()
    }

    /// Free rectangles left on the newest page
    pub fn free_rects(&self) -> &[Rect] {
        &self.free_rects
    }

    pub fn contains(&self, key: &str) -> bool {
        self.short_term.contains_key(key) || self.long_term.contains_key(key)
    }

    /// Whether a surface of `size` could ever be stored
    pub fn fits(&self, size: Size) -> bool {
        size.width <= self.page_size && size.height <= self.page_size
    }

    /// Users currently registered on `key`
    pub fn users(&self, key: &str) -> usize {
        self.short_term
            .get(key)
            .map(|entry| entry.users)
            .or_else(|| self.long_term.get(key).map(|slot| slot.users))
            .unwrap_or(0)
    }

    /// Look a finished shape up, short-term tier first
    ///
    /// Long-term results view a shared atlas page; copy before drawing on them.
    pub fn find_surface_in_cache(&mut self, key: &str) -> Option<SurfaceView> {
        if let Some(entry) = self.short_term.get(key) {
            self.stats.hits += 1;
            let rect = entry.surface.rect();
            return Some(SurfaceView::new(entry.surface.clone(), rect));
        }
        if let Some(slot) = self.long_term.get(key) {
            if let Some(page) = self.pages.get(slot.page) {
                self.stats.hits += 1;
                return Some(SurfaceView::new(page.clone(), slot.rect));
            }
        }
        self.stats.misses += 1;
        None
    }

    /// Store a finished shape in the short-term tier
    ///
    /// Surfaces larger than a page are refused, and their key is remembered
    /// so later offers are refused without a second diagnostic.
    pub fn add_surface_to_cache(&mut self, surface: Surface, key: &str) -> bool {
        if self.oversized.contains(key) {
            return false;
        }
        if !self.fits(surface.size()) {
            warn!(
                "shape {}x{} exceeds the {}px atlas page and will not be cached",
                surface.width(),
                surface.height(),
                self.page_size
            );
            self.oversized.insert(key.to_string());
            self.stats.refused += 1;
            return false;
        }
        if self.contains(key) {
            return true;
        }

        self.short_term.insert(
            key.to_string(),
            ShortTermEntry {
                surface: Arc::new(surface),
                users: 0,
            },
        );
        self.stats.stored += 1;
        trace!("cached {} in short-term tier", key);
        true
    }

    pub fn add_user(&mut self, key: &str) {
        if let Some(entry) = self.short_term.get_mut(key) {
            entry.users += 1;
        } else if let Some(slot) = self.long_term.get_mut(key) {
            slot.users += 1;
        }
    }

    pub fn remove_user(&mut self, key: &str) {
        if let Some(entry) = self.short_term.get_mut(key) {
            entry.users = entry.users.saturating_sub(1);
        } else if let Some(slot) = self.long_term.get_mut(key) {
            slot.users = slot.users.saturating_sub(1);
        }
    }

    /// Per-frame maintenance
    ///
    /// Drops short-term entries nobody uses any more, then promotes the
    /// oldest remaining one into the atlas.
    pub fn update(&mut self) {
        let before = self.short_term.len();
        self.short_term.retain(|_, entry| entry.users > 0);
        let purged = before - self.short_term.len();
        if purged > 0 {
            self.stats.purged += purged;
            debug!("purged {} unused short-term shapes", purged);
        }

        if let Some((key, entry)) = self.short_term.shift_remove_index(0) {
            if self.add_surface_to_long_term_cache(&entry.surface, &key, entry.users) {
                self.stats.promoted += 1;
            }
        }
    }

    /// Pack a surface into the atlas, allocating a page if nothing fits
    pub fn add_surface_to_long_term_cache(&mut self, surface: &Surface, key: &str, users: usize) -> bool {
        let size = surface.size();
        if !self.fits(size) || size.width == 0 || size.height == 0 {
            return false;
        }

        let placed = match self.find_free_rect(size) {
            Some(free) => Rect::new(free.x, free.y, size.width, size.height),
            None => {
                self.allocate_page();
                Rect::new(0, 0, size.width, size.height)
            }
        };

        let page_index = self.pages.len() - 1;
        let page = Arc::make_mut(&mut self.pages[page_index]);
        page.blit(surface, (placed.x, placed.y), BlendMode::Replace);
        self.split_free_rects(placed);
        self.prune_free_rects();

        self.long_term.insert(
            key.to_string(),
            AtlasSlot {
                page: page_index,
                rect: placed,
                users,
            },
        );
        trace!("packed {} at {:?} on page {}", key, placed, page_index);
        true
    }

    fn find_free_rect(&self, size: Size) -> Option<Rect> {
        self.free_rects
            .iter()
            .find(|free| free.width >= size.width && free.height >= size.height)
            .copied()
    }

    fn allocate_page(&mut self) {
        self.pages
            .push(Arc::new(Surface::new(self.page_size, self.page_size)));
        self.free_rects.clear();
        self.free_rects
            .push(Rect::new(0, 0, self.page_size, self.page_size));
        debug!("allocated shape atlas page {}", self.pages.len());
    }

    /// Replace every free rect overlapping `used` with its uncovered
    /// remainders
    fn split_free_rects(&mut self, used: Rect) {
        let mut next = Vec::with_capacity(self.free_rects.len() + 4);
        for free in self.free_rects.drain(..) {
            if !free.intersects(&used) {
                next.push(free);
                continue;
            }
            let mut pieces: SmallVec<[Rect; 4]> = SmallVec::new();
            if used.right() < free.right() {
                pieces.push(Rect::new(used.right(), free.y, free.right() - used.right(), free.height));
            }
            if used.bottom() < free.bottom() {
                pieces.push(Rect::new(free.x, used.bottom(), free.width, free.bottom() - used.bottom()));
            }
            if used.y > free.y {
                pieces.push(Rect::new(free.x, free.y, free.width, used.y - free.y));
            }
            if used.x > free.x {
                pieces.push(Rect::new(free.x, free.y, used.x - free.x, free.height));
            }
            next.extend(pieces.into_iter().filter(|piece| !piece.is_empty()));
        }
        self.free_rects = next;
    }

    /// Drop free rects wholly contained in another
    fn prune_free_rects(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let current = self.free_rects[i];
            let contained = self
                .free_rects
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.contains_rect(&current) && (current != *other || j < i));
            if contained {
                self.free_rects.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Color;

    fn solid(width: i32, height: i32, color: Color) -> Surface {
        Surface::filled(width, height, color)
    }

    #[test]
    fn test_cache_id_format() {
        let id = build_cache_id(
            ShapeKind::RoundedRectangle,
            Size::new(100, 50),
            2,
            1,
            &Paint::from(Color::WHITE),
            &Paint::from(Color::from_hex(0x204060FF)),
            Some(CornerRadii::uniform(8)),
        );
        assert_eq!(
            id,
            "rounded_rectangle_100_50_2_1_8_8_8_8_255_255_255_255_32_64_96_255"
        );

        let plain = build_cache_id(
            ShapeKind::Rectangle,
            Size::new(10, 10),
            0,
            0,
            &Paint::default(),
            &Paint::default(),
            None,
        );
        assert_eq!(plain, "rectangle_10_10_0_0_0_0_0_0_0_0_0_0");
    }

    #[test]
    fn test_short_term_lookup() {
        let mut cache = ShapeCache::new(64);
        assert!(cache.find_surface_in_cache("a").is_none());
        assert!(cache.add_surface_to_cache(solid(8, 4, Color::RED), "a"));

        let view = cache.find_surface_in_cache("a").expect("cached");
        assert_eq!(view.size(), Size::new(8, 4));
        assert_eq!(view.pixel(7, 3), Some(Color::RED));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_promotion_one_per_update() {
        let mut cache = ShapeCache::new(64);
        for (i, key) in ["a", "b"].iter().enumerate() {
            cache.add_surface_to_cache(solid(10, 10, Color::rgb(i as u8, 0, 0)), key);
            cache.add_user(key);
        }

        cache.update();
        assert_eq!(cache.short_term_len(), 1);
        assert_eq!(cache.long_term_len(), 1);
        assert_eq!(cache.page_count(), 1);

        cache.update();
        assert_eq!(cache.short_term_len(), 0);
        assert_eq!(cache.long_term_len(), 2);

        let b = cache.find_surface_in_cache("b").expect("promoted");
        assert_eq!(b.rect(), Rect::new(10, 0, 10, 10));
        assert_eq!(b.pixel(0, 0), Some(Color::rgb(1, 0, 0)));
        assert_eq!(cache.users("b"), 1);
    }

    #[test]
    fn test_unused_short_term_entries_purged() {
        let mut cache = ShapeCache::new(64);
        cache.add_surface_to_cache(solid(4, 4, Color::RED), "unused");
        cache.add_surface_to_cache(solid(4, 4, Color::BLUE), "used");
        cache.add_user("used");
        cache.update();

        assert!(!cache.contains("unused"));
        assert!(cache.contains("used"));
        assert_eq!(cache.stats().purged, 1);
    }

    #[test]
    fn test_oversized_refused_forever() {
        let mut cache = ShapeCache::new(16);
        assert!(!cache.add_surface_to_cache(solid(17, 4, Color::RED), "big"));
        assert!(!cache.add_surface_to_cache(solid(17, 4, Color::RED), "big"));
        assert_eq!(cache.stats().refused, 1);
        assert!(cache.find_surface_in_cache("big").is_none());
    }

    #[test]
    fn test_new_page_when_full() {
        let mut cache = ShapeCache::new(32);
        assert!(cache.add_surface_to_long_term_cache(&solid(32, 20, Color::RED), "a", 1));
        assert!(cache.add_surface_to_long_term_cache(&solid(32, 12, Color::GREEN), "b", 1));
        assert_eq!(cache.page_count(), 1);
        assert!(cache.free_rects().is_empty());

        assert!(cache.add_surface_to_long_term_cache(&solid(8, 8, Color::BLUE), "c", 1));
        assert_eq!(cache.page_count(), 2);
        let c = cache.find_surface_in_cache("c").expect("packed");
        assert_eq!(c.rect(), Rect::new(0, 0, 8, 8));
        assert_eq!(c.pixel(0, 0), Some(Color::BLUE));

        // Earlier pages stay intact
        let a = cache.find_surface_in_cache("a").expect("packed");
        assert_eq!(a.pixel(0, 0), Some(Color::RED));
    }

    #[test]
    fn test_free_rects_never_overlap_placements() {
        let mut cache = ShapeCache::new(128);
        let sizes = [(40, 30), (20, 50), (60, 10), (30, 30), (100, 20), (15, 15)];
        let mut placed = Vec::new();
        for (i, (w, h)) in sizes.iter().enumerate() {
            let key = format!("s{i}");
            assert!(cache.add_surface_to_long_term_cache(&solid(*w, *h, Color::WHITE), &key, 1));
            placed.push(cache.find_surface_in_cache(&key).expect("packed").rect());
        }
        assert_eq!(cache.page_count(), 1);

        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
            for free in cache.free_rects() {
                assert!(!free.intersects(a), "free {free:?} overlaps {a:?}");
            }
        }
        for (i, a) in cache.free_rects().iter().enumerate() {
            for (j, b) in cache.free_rects().iter().enumerate() {
                assert!(i == j || !b.contains_rect(a), "{a:?} is inside {b:?}");
            }
        }
    }

    #[test]
    fn test_views_survive_later_packing() {
        let mut cache = ShapeCache::new(32);
        cache.add_surface_to_long_term_cache(&solid(8, 8, Color::RED), "a", 1);
        let a = cache.find_surface_in_cache("a").expect("packed");
        cache.add_surface_to_long_term_cache(&solid(8, 8, Color::GREEN), "b", 1);
        assert_eq!(a.pixel(0, 0), Some(Color::RED));
        assert_eq!(a.source().get_pixel(8, 0).a, 0);
    }
}
