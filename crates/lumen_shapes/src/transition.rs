//! Timed cross-fades between state surfaces

use std::borrow::Cow;

use lumen_core::Color;
use lumen_raster::Surface;

/// An in-flight cross-fade from one state to another
#[derive(Clone, Debug, PartialEq)]
pub struct StateTransition {
    from: String,
    to: String,
    elapsed: f32,
    duration: f32,
}

impl StateTransition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, duration: f32) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn from_state(&self) -> &str {
        &self.from
    }

    pub fn to_state(&self) -> &str {
        &self.to
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Blend factor from 0.0 (all `from`) to 1.0 (all `to`)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` seconds, returning whether the fade has completed
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        self.is_finished()
    }

    /// Whether switching to `state` would run this fade backwards
    pub fn is_reversed_by(&self, state: &str) -> bool {
        !self.is_finished() && self.from == state
    }

    /// Run the fade backwards over `duration` from where it currently shows
    ///
    /// The reversed fade starts at the blend factor this one had reached,
    /// rescaled to the new duration, so the picture does not snap.
    pub fn reversed(&self, duration: f32) -> StateTransition {
        let duration = duration.max(0.0);
        let shown_back = if self.duration > 0.0 {
            self.remaining() / self.duration
        } else {
            1.0
        };
        StateTransition {
            from: self.to.clone(),
            to: self.from.clone(),
            elapsed: shown_back * duration,
            duration,
        }
    }
}

/// Interpolate two surfaces channel by channel, alpha included
///
/// Surfaces of different sizes are blended over their shared top-left area;
/// `to` wins outside it.
pub fn blend_surfaces<'a>(from: &Surface, to: &'a Surface, t: f32) -> Cow<'a, Surface> {
    if t >= 1.0 || from.is_empty() {
        return Cow::Borrowed(to);
    }
    let t = t.max(0.0);
    let mut out = to.clone();
    let width = from.width().min(to.width());
    let height = from.height().min(to.height());
    for y in 0..height {
        for x in 0..width {
            let blended = Color::lerp(&from.get_pixel(x, y), &to.get_pixel(x, y), t);
            out.set_pixel(x, y, blended);
        }
    }
    Cow::Owned(out)
}
