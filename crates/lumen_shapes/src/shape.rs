//! Drawable shapes
//!
//! A [`DrawableShape`] turns a containing rect and a set of theming
//! parameters into one finished surface per visual state. Geometry is
//! derived once per size change:
//!
//! - the **click area** is the containing rect inset by the shadow width;
//!   it is the visible body and the only part that responds to hit tests
//! - the **border rect** is the click area in surface-local coordinates
//! - the **background rect** is the border rect inset by the border width
//!
//! Construction draws the first state straight away. The other states are
//! queued and drawn one per [`update`](DrawableShape::update), and a resize
//! waits for the configured delay without further size changes before the
//! queue starts draining again.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use lumen_core::{CornerRadii, Point, Rect, Size};
use lumen_paint::{Paint, ShadowShape};
use lumen_raster::{BlendMode, Surface};
use tracing::{debug, trace, warn};

use crate::cache::build_cache_id;
use crate::config::ShapeConfig;
use crate::engine::EngineHandle;
use crate::session::RebuildSession;
use crate::state::ShapeState;
use crate::text;
use crate::theming::{FilledBar, ThemingParameters};
use crate::transition::{blend_surfaces, StateTransition};
use crate::{ellipse, rectangle, rounded_rectangle, Result, ShapeError};

/// The outline a shape is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::RoundedRectangle => "rounded_rectangle",
            ShapeKind::Ellipse => "ellipse",
        }
    }

    /// Whether corner radii affect this outline
    pub fn uses_corner_radii(self) -> bool {
        matches!(self, ShapeKind::RoundedRectangle)
    }

    pub(crate) fn stencil(self, size: Size, radii: CornerRadii) -> Surface {
        match self {
            ShapeKind::Rectangle => rectangle::stencil(size),
            ShapeKind::RoundedRectangle => rounded_rectangle::stencil(size, radii),
            ShapeKind::Ellipse => ellipse::stencil(size),
        }
    }

    pub(crate) fn shadow_shape(self, radii: CornerRadii) -> ShadowShape {
        match self {
            ShapeKind::Rectangle => rectangle::shadow_shape(),
            ShapeKind::RoundedRectangle => rounded_rectangle::shadow_shape(radii),
            ShapeKind::Ellipse => ellipse::shadow_shape(),
        }
    }

    fn collide_point(self, click_area: &Rect, radii: &CornerRadii, point: Point) -> bool {
        match self {
            ShapeKind::Rectangle => rectangle::collide_point(click_area, point),
            ShapeKind::RoundedRectangle => rounded_rectangle::collide_point(click_area, radii, point),
            ShapeKind::Ellipse => ellipse::collide_point(click_area, point),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-shape counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShapeStats {
    /// State redraws completed
    pub redraws: usize,
    /// Bodies rasterized from scratch
    pub rasterizations: usize,
    /// Bodies copied from the shape cache
    pub cache_hits: usize,
    /// Queued redraws postponed because the font was still loading
    pub font_deferrals: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RedrawMode {
    /// Popped from the queue during `update`
    Queued,
    /// Needed right now; never postponed
    Immediate,
}

/// Everything body rasterization needs, detached from the shape so the
/// rebuild session can be borrowed alongside it
struct BodyLayout {
    kind: ShapeKind,
    size: Size,
    shadow_width: i32,
    border_width: i32,
    border_rect: Rect,
    background_rect: Rect,
    radii: CornerRadii,
    background_radii: CornerRadii,
    supersample: i32,
}

/// A themed, stateful, cached widget body
pub struct DrawableShape {
    kind: ShapeKind,
    engine: EngineHandle,
    config: ShapeConfig,
    theming: ThemingParameters,

    containing_rect: Rect,
    click_area: Rect,
    border_rect: Rect,
    background_rect: Rect,
    shadow_width: i32,
    border_width: i32,
    corner_radii: CornerRadii,

    states: IndexMap<String, ShapeState>,
    active_state: String,
    transition: Option<StateTransition>,
    redraw_queue: VecDeque<String>,
    session: Option<RebuildSession>,

    resizing: bool,
    rebuild_countdown: f32,

    empty: Surface,
    stats: ShapeStats,
}

impl DrawableShape {
    /// Build a shape and draw its first state
    ///
    /// `states` must include `normal`. Out of range widths and radii are
    /// clamped with a warning; a containing rect smaller than 1x1 is grown.
    pub fn new(
        kind: ShapeKind,
        containing_rect: Rect,
        theming: ThemingParameters,
        states: &[&str],
        engine: EngineHandle,
    ) -> Result<Self> {
        if !states.contains(&"normal") {
            return Err(ShapeError::MissingNormalState(
                states.iter().map(|s| s.to_string()).collect(),
            ));
        }

        let containing_rect = coerce_rect(containing_rect);
        let config = engine.config();
        let mut state_map = IndexMap::with_capacity(states.len());
        for name in states {
            state_map
                .entry(name.to_string())
                .or_insert_with(|| ShapeState::new(*name));
        }

        let mut shape = Self {
            kind,
            engine,
            config,
            theming,
            containing_rect,
            click_area: Rect::ZERO,
            border_rect: Rect::ZERO,
            background_rect: Rect::ZERO,
            shadow_width: 0,
            border_width: 0,
            corner_radii: CornerRadii::ZERO,
            states: state_map,
            active_state: "normal".to_string(),
            transition: None,
            redraw_queue: VecDeque::new(),
            session: None,
            resizing: false,
            rebuild_countdown: 0.0,
            empty: Surface::empty(),
            stats: ShapeStats::default(),
        };
        shape.full_rebuild();
        Ok(shape)
    }

    pub fn rectangle(
        containing_rect: Rect,
        theming: ThemingParameters,
        states: &[&str],
        engine: EngineHandle,
    ) -> Result<Self> {
        Self::new(ShapeKind::Rectangle, containing_rect, theming, states, engine)
    }

    pub fn rounded_rectangle(
        containing_rect: Rect,
        theming: ThemingParameters,
        states: &[&str],
        engine: EngineHandle,
    ) -> Result<Self> {
        Self::new(ShapeKind::RoundedRectangle, containing_rect, theming, states, engine)
    }

    pub fn ellipse(
        containing_rect: Rect,
        theming: ThemingParameters,
        states: &[&str],
        engine: EngineHandle,
    ) -> Result<Self> {
        Self::new(ShapeKind::Ellipse, containing_rect, theming, states, engine)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn theming(&self) -> &ThemingParameters {
        &self.theming
    }

    pub fn containing_rect(&self) -> Rect {
        self.containing_rect
    }

    /// The hit-testable body, in the same coordinates as the containing rect
    pub fn click_area(&self) -> Rect {
        self.click_area
    }

    /// Border outline in surface-local coordinates
    pub fn border_rect(&self) -> Rect {
        self.border_rect
    }

    /// Background area in surface-local coordinates
    pub fn background_rect(&self) -> Rect {
        self.background_rect
    }

    pub fn shadow_width(&self) -> i32 {
        self.shadow_width
    }

    pub fn border_width(&self) -> i32 {
        self.border_width
    }

    /// Corner radii of the click area after clamping; zero unless rounded
    pub fn corner_radii(&self) -> CornerRadii {
        self.corner_radii
    }

    /// Corner radii of the background, shrunk to nest inside the border
    pub fn background_radii(&self) -> CornerRadii {
        rounded_rectangle::background_radii(
            self.corner_radii,
            self.border_rect.size(),
            self.background_rect.size(),
        )
    }

    pub fn active_state(&self) -> &str {
        &self.active_state
    }

    pub fn state(&self, name: &str) -> Option<&ShapeState> {
        self.states.get(name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// States waiting to be drawn, next first
    pub fn queued_states(&self) -> impl Iterator<Item = &str> {
        self.redraw_queue.iter().map(String::as_str)
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    pub fn transition(&self) -> Option<&StateTransition> {
        self.transition.as_ref()
    }

    pub fn stats(&self) -> ShapeStats {
        self.stats
    }

    // ─────────────────────────────────────────────────────────────────────
    // Frame loop
    // ─────────────────────────────────────────────────────────────────────

    /// Advance the shape by `time_delta` seconds
    ///
    /// Draws at most one queued state, unless a resize is still settling.
    /// Scratch surfaces are released once the queue is empty. Any running
    /// transition advances regardless.
    pub fn update(&mut self, time_delta: f32) {
        if self.resizing {
            self.rebuild_countdown -= time_delta;
            if self.rebuild_countdown <= 0.0 {
                self.resizing = false;
                debug!("resize settled at {:?}, rebuilding", self.containing_rect.size());
            }
        }

        if !self.resizing {
            if let Some(name) = self.redraw_queue.pop_front() {
                if self.waiting_for_font() {
                    self.stats.font_deferrals += 1;
                    self.redraw_queue.push_back(name);
                } else {
                    self.redraw_state(&name, RedrawMode::Queued);
                }
            }
            if self.redraw_queue.is_empty() && self.session.take().is_some() {
                trace!("released rebuild session");
            }
        }

        if let Some(transition) = &mut self.transition {
            if transition.advance(time_delta) {
                self.transition = None;
                if let Some(state) = self.states.get_mut(&self.active_state) {
                    state.has_fresh_surface = true;
                }
            }
        }
    }

    /// Recompute geometry and redraw every state from scratch
    ///
    /// The first queued state is drawn before returning.
    pub fn full_rebuild(&mut self) {
        self.compute_geometry();
        self.invalidate_states();
        self.session = None;
        self.resizing = false;
        self.rebuild_countdown = 0.0;
        self.fill_redraw_queue();

        if let Some(first) = self.redraw_queue.pop_front() {
            self.redraw_state(&first, RedrawMode::Immediate);
        }
    }

    /// Replace the theming parameters and rebuild straight away
    pub fn rebuild_theming(&mut self, theming: ThemingParameters) {
        self.theming = theming;
        self.full_rebuild();
    }

    /// Change the text and redraw, active state first
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.theming.text = Some(text.into());
        self.rebuild_active_first();
    }

    /// Change the filled bar and redraw, active state first
    pub fn set_filled_bar(&mut self, bar: Option<FilledBar>) {
        self.theming.filled_bar = bar;
        self.rebuild_active_first();
    }

    // ─────────────────────────────────────────────────────────────────────
    // States
    // ─────────────────────────────────────────────────────────────────────

    /// Switch the presented state
    ///
    /// A state never drawn is drawn immediately. If the theme times a fade
    /// from the previous state to this one it starts, or, when switching
    /// back mid-fade, the running fade reverses from its current blend over
    /// the new pair's duration. Without a timed fade any running one is
    /// dropped. Returns false for undeclared states.
    pub fn set_active_state(&mut self, name: &str) -> bool {
        let Some(state) = self.states.get(name) else {
            warn!("shape has no state '{}'", name);
            return false;
        };

        if !state.generated {
            self.redraw_queue.retain(|queued| queued != name);
            self.redraw_state(name, RedrawMode::Immediate);
        }
        if name == self.active_state {
            return true;
        }

        let previous = std::mem::replace(&mut self.active_state, name.to_string());
        let current = self.transition.take();
        self.transition = self
            .theming
            .transition_duration(&previous, name)
            .map(|duration| match current {
                Some(current) if current.is_reversed_by(name) => current.reversed(duration),
                _ => StateTransition::new(previous, name, duration),
            });
        if let Some(state) = self.states.get_mut(name) {
            state.has_fresh_surface = true;
        }
        true
    }

    /// The surface of `state_name`, else of `normal`, else an empty 0x0
    /// surface meaning nothing is ready yet
    pub fn get_surface(&self, state_name: &str) -> &Surface {
        self.states
            .get(state_name)
            .and_then(ShapeState::surface)
            .or_else(|| self.states.get("normal").and_then(ShapeState::surface))
            .unwrap_or(&self.empty)
    }

    /// The surface to present now, blended while a transition runs
    pub fn get_active_state_surface(&self) -> Cow<'_, Surface> {
        let target = self.get_surface(&self.active_state);
        match &self.transition {
            Some(transition) => {
                let from = self.get_surface(transition.from_state());
                blend_surfaces(from, target, transition.progress())
            }
            None => Cow::Borrowed(target),
        }
    }

    /// Whether the presented surface changed since it was last taken
    pub fn has_fresh_surface(&self) -> bool {
        self.transition.is_some()
            || self
                .states
                .get(&self.active_state)
                .is_some_and(|state| state.has_fresh_surface)
    }

    /// Take the presented surface if it changed since the last take
    pub fn take_fresh_surface(&mut self) -> Option<Surface> {
        if !self.has_fresh_surface() {
            return None;
        }
        if let Some(state) = self.states.get_mut(&self.active_state) {
            state.has_fresh_surface = false;
        }
        Some(self.get_active_state_surface().into_owned())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Geometry
    // ─────────────────────────────────────────────────────────────────────

    /// Hit test against the visible outline, never the shadow
    pub fn collide_point(&self, point: Point) -> bool {
        self.kind
            .collide_point(&self.click_area, &self.corner_radii, point)
    }

    /// Move the shape; nothing is redrawn
    pub fn set_position(&mut self, x: i32, y: i32) {
        let dx = x - self.containing_rect.x;
        let dy = y - self.containing_rect.y;
        self.containing_rect = self.containing_rect.moved_to(x, y);
        self.click_area = self.click_area.offset(dx, dy);
    }

    /// Resize the shape, returning false if the size is unchanged
    ///
    /// Every state goes stale and is queued again, but drawing waits until
    /// no further resize has happened for the configured delay. Stale
    /// surfaces keep being presented meanwhile.
    pub fn set_dimensions(&mut self, size: Size) -> bool {
        let size = Size::new(size.width.max(1), size.height.max(1));
        if size == self.containing_rect.size() {
            return false;
        }

        self.containing_rect = Rect::new(
            self.containing_rect.x,
            self.containing_rect.y,
            size.width,
            size.height,
        );
        self.compute_geometry();
        self.invalidate_states();
        self.session = None;
        self.fill_redraw_queue();
        self.resizing = true;
        self.rebuild_countdown = self.config.rebuild_delay;
        true
    }

    fn compute_geometry(&mut self) {
        let size = self.containing_rect.size();
        let min = size.min_dimension();

        let max_shadow = min / 2;
        let shadow = self.theming.shadow_width;
        self.shadow_width = shadow.clamp(0, max_shadow);
        if self.shadow_width != shadow {
            warn!(
                "shadow width {} does not fit a {}x{} shape, using {}",
                shadow, size.width, size.height, self.shadow_width
            );
        }

        let max_border = ((min - 2 * self.shadow_width) / 2).max(0);
        let border = self.theming.border_width;
        self.border_width = border.clamp(0, max_border);
        if self.border_width != border {
            warn!(
                "border width {} does not fit a {}x{} shape, using {}",
                border, size.width, size.height, self.border_width
            );
        }

        self.click_area = self.containing_rect.inset(self.shadow_width);
        self.border_rect = Rect::from_size(size).inset(self.shadow_width);
        self.background_rect = self.border_rect.inset(self.border_width);

        self.corner_radii = if self.kind.uses_corner_radii() {
            let limit = self.click_area.size().min_dimension() / 2;
            let (radii, changed) = self.theming.corner_radii.clamped(limit);
            if changed {
                warn!(
                    "corner radii {:?} do not fit a {}x{} click area, using {:?}",
                    self.theming.corner_radii.to_array(),
                    self.click_area.width,
                    self.click_area.height,
                    radii.to_array()
                );
            }
            radii
        } else {
            CornerRadii::ZERO
        };
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drawing
    // ─────────────────────────────────────────────────────────────────────

    fn fill_redraw_queue(&mut self) {
        self.redraw_queue = self
            .states
            .values()
            .filter(|state| state.auto_pregenerate)
            .map(|state| state.name().to_string())
            .collect();
    }

    fn rebuild_active_first(&mut self) {
        self.invalidate_states();
        self.fill_redraw_queue();
        let active = self.active_state.clone();
        self.redraw_queue.retain(|queued| *queued != active);
        self.redraw_state(&active, RedrawMode::Immediate);
    }

    /// Mark every state stale and release its cache registration
    fn invalidate_states(&mut self) {
        let keys: Vec<String> = self
            .states
            .values_mut()
            .filter_map(ShapeState::invalidate)
            .collect();
        if !keys.is_empty() {
            self.engine.with_cache(|cache| {
                for key in &keys {
                    cache.remove_user(key);
                }
            });
        }
    }

    fn waiting_for_font(&self) -> bool {
        self.theming.has_text()
            && self
                .theming
                .font
                .as_ref()
                .is_some_and(|font| !font.is_ready())
    }

    fn redraw_state(&mut self, name: &str, mode: RedrawMode) {
        if !self.states.contains_key(name) {
            return;
        }

        let draw_text = !self.waiting_for_font();
        if !draw_text && mode == RedrawMode::Immediate && !self.redraw_queue.iter().any(|q| q == name) {
            // Show the body now and add the text once the font arrives
            self.redraw_queue.push_back(name.to_string());
        }

        let mut surface = self.body_surface(name);
        if let Some(image) = self.theming.image(name) {
            text::compose_image(&mut surface, image);
        }
        if draw_text {
            text::compose_text(
                &mut surface,
                &self.theming,
                name,
                self.shadow_width + self.border_width,
            );
        }

        if let Some(state) = self.states.get_mut(name) {
            state.store(surface);
        }
        self.stats.redraws += 1;
        trace!("redrew {} state '{}' ({:?})", self.kind, name, mode);
    }

    /// Shadow, border and background for a state, from the cache if possible
    fn body_surface(&mut self, name: &str) -> Surface {
        let border = self.theming.paint(name, "border").cloned().unwrap_or_default();
        let background = self.theming.paint(name, "bg").cloned().unwrap_or_default();
        let size = self.containing_rect.size();
        let cacheable = self.config.cache_enabled && self.theming.filled_bar.is_none();

        let key = build_cache_id(
            self.kind,
            size,
            self.shadow_width,
            self.border_width,
            &border,
            &background,
            self.kind.uses_corner_radii().then_some(self.corner_radii),
        );

        if cacheable {
            let hit = self.engine.with_cache(|cache| {
                let view = cache.find_surface_in_cache(&key)?;
                cache.add_user(&key);
                Some(view.to_surface())
            });
            if let Some(surface) = hit {
                self.stats.cache_hits += 1;
                self.register_cache_key(name, key);
                return surface;
            }
        }

        let bar = self.theming.filled_bar.map(|bar| {
            let paint = self
                .theming
                .paint_by_key("filled_bar")
                .cloned()
                .unwrap_or_else(|| background.clone());
            (bar.width_of(self.background_rect.width), paint)
        });
        let layout = self.body_layout();
        let session = self.session.get_or_insert_with(RebuildSession::new);
        let surface = rasterize_body(session, &self.engine, &layout, &border, &background, bar.as_ref());
        self.stats.rasterizations += 1;

        if cacheable && !self.resizing {
            // Oversized bodies are refused by the cache, which warns once per key
            let stored = self.engine.with_cache(|cache| {
                let stored = cache.add_surface_to_cache(surface.clone(), &key);
                if stored {
                    cache.add_user(&key);
                }
                stored
            });
            if stored {
                self.register_cache_key(name, key);
            }
        }
        surface
    }

    fn register_cache_key(&mut self, name: &str, key: String) {
        let previous = self
            .states
            .get_mut(name)
            .and_then(|state| state.cache_key.replace(key));
        if let Some(previous) = previous {
            self.engine.with_cache(|cache| cache.remove_user(&previous));
        }
    }

    fn body_layout(&self) -> BodyLayout {
        BodyLayout {
            kind: self.kind,
            size: self.containing_rect.size(),
            shadow_width: self.shadow_width,
            border_width: self.border_width,
            border_rect: self.border_rect,
            background_rect: self.background_rect,
            radii: self.corner_radii,
            background_radii: self.background_radii(),
            supersample: self.config.supersample.max(1),
        }
    }
}

impl Drop for DrawableShape {
    fn drop(&mut self) {
        self.invalidate_states();
    }
}

impl fmt::Debug for DrawableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawableShape")
            .field("kind", &self.kind)
            .field("containing_rect", &self.containing_rect)
            .field("active_state", &self.active_state)
            .field("queued", &self.redraw_queue)
            .field("resizing", &self.resizing)
            .field("stats", &self.stats)
            .finish()
    }
}

fn coerce_rect(rect: Rect) -> Rect {
    if rect.width >= 1 && rect.height >= 1 {
        return rect;
    }
    warn!("shape rect {:?} is smaller than 1x1, growing it", rect);
    Rect::new(rect.x, rect.y, rect.width.max(1), rect.height.max(1))
}

fn shrink_radii(radii: CornerRadii, amount: i32) -> CornerRadii {
    CornerRadii::from(radii.to_array().map(|radius| (radius - amount).max(0)))
}

/// Draw border and background over the shadow base
///
/// Layers are drawn supersampled and box-filtered down. Before the
/// background goes down, the area it covers is cleared from the border
/// layer, minus a half-pixel margin so the two edges overlap instead of
/// leaving a seam.
fn rasterize_body(
    session: &mut RebuildSession,
    engine: &EngineHandle,
    layout: &BodyLayout,
    border: &Paint,
    background: &Paint,
    bar: Option<&(i32, Paint)>,
) -> Surface {
    let mut surface = session
        .base_surface(
            engine,
            layout.kind,
            layout.size,
            layout.shadow_width,
            layout.radii,
        )
        .clone();
    if layout.border_rect.is_empty() {
        return surface;
    }

    let aa = layout.supersample;
    let border_size = layout.border_rect.size().scaled(aa);
    let mut work = Surface::from_size(border_size);

    if layout.border_width > 0 {
        let mut layer = session
            .stencil(layout.kind, border_size, layout.radii.scaled(aa as f32))
            .clone();
        border.apply_to(&mut layer, None);
        work.blit(&layer, (0, 0), BlendMode::Normal);
    }

    if !layout.background_rect.is_empty() {
        let offset = layout.border_width * aa;
        let bg_size = layout.background_rect.size().scaled(aa);
        let bg_radii = layout.background_radii.scaled(aa as f32);

        let overlap = aa / 2;
        let clear_size = Size::new(bg_size.width - 2 * overlap, bg_size.height - 2 * overlap);
        if layout.border_width > 0 && clear_size.width > 0 && clear_size.height > 0 {
            let clear = session.stencil(layout.kind, clear_size, shrink_radii(bg_radii, overlap));
            work.blit(clear, (offset + overlap, offset + overlap), BlendMode::AlphaSubtract);
        }

        let mut layer = session.stencil(layout.kind, bg_size, bg_radii).clone();
        match bar {
            Some((bar_width, bar_paint)) => {
                let split = bar_width * aa;
                bar_paint.apply_to(&mut layer, Some(Rect::new(0, 0, split, bg_size.height)));
                background.apply_to(
                    &mut layer,
                    Some(Rect::new(split, 0, bg_size.width - split, bg_size.height)),
                );
            }
            None => background.apply_to(&mut layer, None),
        }
        work.blit(&layer, (offset, offset), BlendMode::Normal);
    }

    let body = work.downsampled(aa);
    surface.blit(
        &body,
        (layout.border_rect.x, layout.border_rect.y),
        BlendMode::Normal,
    );
    surface
}
