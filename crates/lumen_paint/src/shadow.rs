//! Procedural drop shadows
//!
//! A rectangle shadow is assembled from four corner tiles and four edge
//! strips. The tiles depend only on the shadow width and corner radii, so
//! they are built once per profile and stretched to any size afterwards.
//! Ellipse shadows do not decompose that way and are rendered whole, with
//! near-miss sizes rescaled from an existing shadow.
//!
//! Every ring of a shadow adds `20 / width^1.5` more alpha than the ring
//! outside it, which keeps the total opacity roughly independent of width.

use std::num::NonZeroUsize;

use lru::LruCache;
use lumen_core::{Color, Corner, CornerRadii, Point, Rect, Size};
use lumen_raster::{BlendMode, Surface};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

const DEFAULT_SUPERSAMPLE: i32 = 4;
const DEFAULT_CAPACITY: usize = 64;
const DEFAULT_ELLIPSE_TOLERANCE: f32 = 0.05;

/// Which outline a shadow is cast by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowShape {
    Rectangle(CornerRadii),
    Ellipse,
}

/// Counters exposed for instrumentation and tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadowStats {
    pub corner_sets_built: usize,
    pub rectangle_shadows_built: usize,
    pub ellipse_shadows_built: usize,
    pub ellipse_shadows_rescaled: usize,
    pub cache_hits: usize,
}

/// The reusable tiles of one (shadow width, corner radii) profile
#[derive(Clone, Debug)]
pub struct ShadowCorners {
    shadow_width: i32,
    radii: CornerRadii,
    corners: [Surface; 4],
    top: Surface,
    bottom: Surface,
    left: Surface,
    right: Surface,
    plateau: u8,
}

impl ShadowCorners {
    pub fn shadow_width(&self) -> i32 {
        self.shadow_width
    }

    pub fn radii(&self) -> CornerRadii {
        self.radii
    }

    /// The tile for one corner, already mirrored into place
    pub fn corner(&self, corner: Corner) -> &Surface {
        &self.corners[corner.index()]
    }

    /// Side length of a corner's square tile
    pub fn extent(&self, corner: Corner) -> i32 {
        self.shadow_width + self.radii.get(corner)
    }

    /// Alpha under the shape itself, where every ring overlaps
    pub fn plateau_alpha(&self) -> u8 {
        self.plateau
    }

    fn fits(&self, width: i32, height: i32) -> bool {
        use Corner::*;
        width >= self.extent(TopLeft) + self.extent(TopRight)
            && width >= self.extent(BottomLeft) + self.extent(BottomRight)
            && height >= self.extent(TopLeft) + self.extent(BottomLeft)
            && height >= self.extent(TopRight) + self.extent(BottomRight)
    }

    fn assemble(&self, width: i32, height: i32) -> Surface {
        use Corner::*;
        let sw = self.shadow_width;
        let mut shadow = Surface::new(width, height);
        shadow.fill_rect(
            Rect::new(sw, sw, width - 2 * sw, height - 2 * sw),
            shadow_color(self.plateau),
        );

        let tl = self.extent(TopLeft);
        let tr = self.extent(TopRight);
        let bl = self.extent(BottomLeft);
        let br = self.extent(BottomRight);

        let top_run = width - tl - tr;
        if top_run > 0 {
            shadow.blit(&self.top.scaled(top_run, sw), (tl, 0), BlendMode::Replace);
        }
        let bottom_run = width - bl - br;
        if bottom_run > 0 {
            shadow.blit(
                &self.bottom.scaled(bottom_run, sw),
                (bl, height - sw),
                BlendMode::Replace,
            );
        }
        let left_run = height - tl - bl;
        if left_run > 0 {
            shadow.blit(&self.left.scaled(sw, left_run), (0, tl), BlendMode::Replace);
        }
        let right_run = height - tr - br;
        if right_run > 0 {
            shadow.blit(
                &self.right.scaled(sw, right_run),
                (width - sw, tr),
                BlendMode::Replace,
            );
        }

        for corner in Corner::ALL {
            let extent = self.extent(corner);
            let x = if corner.is_left() { 0 } else { width - extent };
            let y = if corner.is_top() { 0 } else { height - extent };
            shadow.blit(self.corner(corner), (x, y), BlendMode::Replace);
        }
        shadow
    }
}

/// Builds and memoizes drop shadows
///
/// Corner profiles are kept for the generator's lifetime; whole rectangle
/// and ellipse shadows live in bounded LRU caches.
pub struct ShadowGenerator {
    supersample: i32,
    ellipse_tolerance: f32,
    profiles: FxHashMap<String, ShadowCorners>,
    rectangles: LruCache<String, Surface>,
    ellipses: LruCache<String, Surface>,
    stats: ShadowStats,
}

impl ShadowGenerator {
    pub fn new(supersample: i32, capacity: usize, ellipse_tolerance: f32) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            supersample: supersample.max(1),
            ellipse_tolerance: ellipse_tolerance.max(0.0),
            profiles: FxHashMap::default(),
            rectangles: LruCache::new(capacity),
            ellipses: LruCache::new(capacity),
            stats: ShadowStats::default(),
        }
    }

    pub fn stats(&self) -> ShadowStats {
        self.stats
    }

    /// Build (or fetch) the corner and edge tiles for a profile
    ///
    /// A non-positive width is treated as 1.
    pub fn create_shadow_corners(&mut self, shadow_width: i32, radii: CornerRadii) -> &ShadowCorners {
        let shadow_width = if shadow_width <= 0 {
            warn!("shadow width {} is not positive, using 1", shadow_width);
            1
        } else {
            shadow_width
        };
        let radii = radii.clamped(i32::MAX).0;
        let [r0, r1, r2, r3] = radii.to_array();
        let key = format!("{shadow_width}x{r0}_{r1}_{r2}_{r3}");

        if !self.profiles.contains_key(&key) {
            let profile = build_profile(shadow_width, radii, self.supersample);
            self.stats.corner_sets_built += 1;
            debug!("built shadow profile {}", key);
            self.profiles.insert(key.clone(), profile);
        }
        &self.profiles[&key]
    }

    /// Assemble a rectangle shadow of exactly `width x height`
    ///
    /// Returns `None` when the corner tiles cannot fit side by side.
    pub fn create_new_rectangle_shadow(
        &mut self,
        width: i32,
        height: i32,
        shadow_width: i32,
        radii: CornerRadii,
    ) -> Option<Surface> {
        let [r0, r1, r2, r3] = radii.to_array();
        let key = format!("{width}_{height}_{shadow_width}_{r0}_{r1}_{r2}_{r3}");
        if let Some(shadow) = self.rectangles.get(&key) {
            self.stats.cache_hits += 1;
            return Some(shadow.clone());
        }

        let profile = self.create_shadow_corners(shadow_width, radii);
        if !profile.fits(width, height) {
            warn!(
                "cannot fit a {}px shadow with radii {:?} into {}x{}",
                shadow_width,
                radii.to_array(),
                width,
                height
            );
            return None;
        }
        let shadow = profile.assemble(width, height);
        self.stats.rectangle_shadows_built += 1;
        self.rectangles.put(key, shadow.clone());
        Some(shadow)
    }

    /// Render an ellipse shadow of exactly `width x height`
    pub fn create_new_ellipse_shadow(&mut self, width: i32, height: i32, shadow_width: i32) -> Surface {
        let key = ellipse_key(width, height, shadow_width);
        if let Some(shadow) = self.ellipses.get(&key) {
            self.stats.cache_hits += 1;
            return shadow.clone();
        }

        let shadow = render_ellipse_shadow(width, height, shadow_width.max(1), self.supersample);
        self.stats.ellipse_shadows_built += 1;
        self.ellipses.put(key, shadow.clone());
        shadow
    }

    /// Produce a shadow for `size`, reusing near-miss ellipse shadows
    ///
    /// Ellipse shadows with the same width whose dimensions are within the
    /// configured tolerance (at least 2px) are rescaled instead of rendered.
    /// Rectangle shadows are assembled from tiles and never rescaled; they
    /// return `None` for impossible geometry.
    pub fn find_closest_shadow_scale_to_size(
        &mut self,
        size: Size,
        shadow_width: i32,
        shape: ShadowShape,
    ) -> Option<Surface> {
        match shape {
            ShadowShape::Rectangle(radii) => {
                self.create_new_rectangle_shadow(size.width, size.height, shadow_width, radii)
            }
            ShadowShape::Ellipse => {
                let key = ellipse_key(size.width, size.height, shadow_width);
                if self.ellipses.contains(&key) {
                    return Some(self.create_new_ellipse_shadow(size.width, size.height, shadow_width));
                }
                let tolerance_w = tolerance(size.width, self.ellipse_tolerance);
                let tolerance_h = tolerance(size.height, self.ellipse_tolerance);
                let near = self.ellipses.iter().find_map(|(key, shadow)| {
                    let same_width = key
                        .rsplit('_')
                        .next()
                        .and_then(|w| w.parse::<i32>().ok())
                        == Some(shadow_width);
                    let close = same_width
                        && (shadow.width() - size.width).abs() <= tolerance_w
                        && (shadow.height() - size.height).abs() <= tolerance_h;
                    close.then(|| shadow.smooth_scaled(size.width, size.height))
                });
                match near {
                    Some(shadow) => {
                        self.stats.ellipse_shadows_rescaled += 1;
                        Some(shadow)
                    }
                    None => Some(self.create_new_ellipse_shadow(size.width, size.height, shadow_width)),
                }
            }
        }
    }
}

impl Default for ShadowGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SUPERSAMPLE, DEFAULT_CAPACITY, DEFAULT_ELLIPSE_TOLERANCE)
    }
}

impl std::fmt::Debug for ShadowGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowGenerator")
            .field("supersample", &self.supersample)
            .field("profiles", &self.profiles.len())
            .field("rectangles", &self.rectangles.len())
            .field("ellipses", &self.ellipses.len())
            .field("stats", &self.stats)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn shadow_color(alpha: u8) -> Color {
    Color::BLACK.with_alpha(alpha)
}

fn ellipse_key(width: i32, height: i32, shadow_width: i32) -> String {
    format!("{width}_{height}_{shadow_width}")
}

fn tolerance(dimension: i32, fraction: f32) -> i32 {
    ((dimension as f32 * fraction).round() as i32).max(2)
}

/// Alpha added by each ring, outermost first
fn ring_alphas(shadow_width: i32) -> Vec<u8> {
    let increment = 20.0 / (shadow_width as f32).powf(1.5);
    (0..shadow_width)
        .map(|i| (increment * (i + 1) as f32).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// Running alpha at each depth into the shadow
fn cumulative_alphas(rings: &[u8]) -> Vec<u8> {
    rings
        .iter()
        .scan(0u8, |total, &a| {
            *total = total.saturating_add(a);
            Some(*total)
        })
        .collect()
}

fn build_profile(shadow_width: i32, radii: CornerRadii, supersample: i32) -> ShadowCorners {
    let rings = ring_alphas(shadow_width);
    let depth = cumulative_alphas(&rings);

    let mut tiles: FxHashMap<i32, Surface> = FxHashMap::default();
    let corners = Corner::ALL.map(|corner| {
        let radius = radii.get(corner);
        let tile = tiles
            .entry(radius)
            .or_insert_with(|| render_corner_tile(shadow_width, radius, &rings, supersample));
        tile.flipped(!corner.is_left(), !corner.is_top())
    });

    let mut top = Surface::new(1, shadow_width);
    let mut left = Surface::new(shadow_width, 1);
    for (i, &alpha) in depth.iter().enumerate() {
        top.set_pixel(0, i as i32, shadow_color(alpha));
        left.set_pixel(i as i32, 0, shadow_color(alpha));
    }

    ShadowCorners {
        shadow_width,
        radii,
        corners,
        bottom: top.flipped(false, true),
        right: left.flipped(true, false),
        top,
        left,
        plateau: depth.last().copied().unwrap_or(0),
    }
}

/// A top-left corner tile: concentric quarter circles around the tile's
/// bottom-right, one per ring, added together
fn render_corner_tile(shadow_width: i32, radius: i32, rings: &[u8], supersample: i32) -> Surface {
    let extent = shadow_width + radius;
    let mut tile = Surface::new(extent * supersample, extent * supersample);
    let center = (extent * supersample) as f32;
    for (i, &alpha) in rings.iter().enumerate() {
        tile.fill_circle(
            Point::new(center, center),
            ((extent - i as i32) * supersample) as f32,
            shadow_color(alpha),
            BlendMode::Add,
        );
    }
    tile.downsampled(supersample)
}

fn render_ellipse_shadow(width: i32, height: i32, shadow_width: i32, supersample: i32) -> Surface {
    let mut shadow = Surface::new(width * supersample, height * supersample);
    for (i, alpha) in ring_alphas(shadow_width).into_iter().enumerate() {
        let inset = i as i32;
        let ring = Rect::new(inset, inset, width - 2 * inset, height - 2 * inset);
        if ring.is_empty() {
            break;
        }
        shadow.fill_ellipse(ring.scaled(supersample), shadow_color(alpha), BlendMode::Add);
    }
    shadow.downsampled(supersample)
}
