//! Scratch state for one rebuild cycle
//!
//! Redrawing every state of a shape reuses the same stencils and the same
//! shadow; only the paints differ. A [`RebuildSession`] holds those between
//! the per-state redraws of one cycle and is dropped once the redraw queue
//! drains or the geometry changes.

use lumen_core::{CornerRadii, Size};
use lumen_raster::Surface;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::engine::EngineHandle;
use crate::shape::ShapeKind;

#[derive(Debug, Default)]
pub(crate) struct RebuildSession {
    stencils: FxHashMap<(Size, CornerRadii), Surface>,
    base: Option<Surface>,
}

impl RebuildSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A colorless stencil of the shape at `size`, built once per session
    pub(crate) fn stencil(&mut self, kind: ShapeKind, size: Size, radii: CornerRadii) -> &Surface {
        self.stencils
            .entry((size, radii))
            .or_insert_with(|| kind.stencil(size, radii))
    }

    pub(crate) fn stencil_count(&self) -> usize {
        self.stencils.len()
    }

    /// The layer every state is drawn onto: the drop shadow, or a blank
    /// surface when there is no shadow or it cannot be built
    pub(crate) fn base_surface(
        &mut self,
        engine: &EngineHandle,
        kind: ShapeKind,
        size: Size,
        shadow_width: i32,
        radii: CornerRadii,
    ) -> &Surface {
        self.base.get_or_insert_with(|| {
            if shadow_width <= 0 {
                return Surface::from_size(size);
            }
            let shape = kind.shadow_shape(radii);
            let shadow = engine.with_shadows(|shadows| {
                shadows.find_closest_shadow_scale_to_size(size, shadow_width, shape)
            });
            shadow.unwrap_or_else(|| {
                warn!(
                    "no {}px shadow possible for {} {}x{}, drawing without one",
                    shadow_width, kind, size.width, size.height
                );
                Surface::from_size(size)
            })
        })
    }
}
