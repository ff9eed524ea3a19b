//! Per-corner radii
//!
//! Rounded shapes and their shadows carry one radius per corner. The order
//! used throughout Lumen is top-left, top-right, bottom-left, bottom-right,
//! which is also the order cache keys and shadow keys spell them in.

use serde::{Deserialize, Serialize};

/// One corner of a rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub const fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    pub const fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub const fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Corner radii in pixels, ordered top-left, top-right, bottom-left, bottom-right
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RadiiRepr", into = "[i32; 4]")]
pub struct CornerRadii {
    radii: [i32; 4],
}

impl CornerRadii {
    pub const ZERO: CornerRadii = CornerRadii { radii: [0; 4] };

    pub const fn new(top_left: i32, top_right: i32, bottom_left: i32, bottom_right: i32) -> Self {
        Self {
            radii: [top_left, top_right, bottom_left, bottom_right],
        }
    }

    pub const fn uniform(radius: i32) -> Self {
        Self { radii: [radius; 4] }
    }

    pub fn get(&self, corner: Corner) -> i32 {
        self.radii[corner.index()]
    }

    pub fn set(&mut self, corner: Corner, radius: i32) {
        self.radii[corner.index()] = radius;
    }

    pub fn to_array(&self) -> [i32; 4] {
        self.radii
    }

    /// Check if all corner radii are the same
    pub fn is_uniform(&self) -> bool {
        self.radii.iter().all(|r| *r == self.radii[0])
    }

    pub fn max(&self) -> i32 {
        self.radii.iter().copied().max().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.radii.iter().all(|r| *r == 0)
    }

    /// Clamp every radius into `0..=limit`, reporting whether anything changed
    pub fn clamped(&self, limit: i32) -> (Self, bool) {
        let limit = limit.max(0);
        let mut changed = false;
        let mut radii = self.radii;
        for radius in radii.iter_mut() {
            let fixed = (*radius).clamp(0, limit);
            if fixed != *radius {
                changed = true;
                *radius = fixed;
            }
        }
        (Self { radii }, changed)
    }

    /// Scale every radius by a factor, rounding down
    pub fn scaled(&self, factor: f32) -> Self {
        let mut radii = self.radii;
        for radius in radii.iter_mut() {
            *radius = ((*radius as f32) * factor).floor().max(0.0) as i32;
        }
        Self { radii }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Corner, i32)> + '_ {
        Corner::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

impl From<i32> for CornerRadii {
    fn from(radius: i32) -> Self {
        Self::uniform(radius)
    }
}

impl From<[i32; 4]> for CornerRadii {
    fn from(radii: [i32; 4]) -> Self {
        Self { radii }
    }
}

impl From<CornerRadii> for [i32; 4] {
    fn from(radii: CornerRadii) -> Self {
        radii.radii
    }
}

/// Theme files may give a single radius or all four
#[derive(Deserialize)]
#[serde(untagged)]
enum RadiiRepr {
    Uniform(i32),
    PerCorner([i32; 4]),
}

impl From<RadiiRepr> for CornerRadii {
    fn from(repr: RadiiRepr) -> Self {
        match repr {
            RadiiRepr::Uniform(r) => CornerRadii::uniform(r),
            RadiiRepr::PerCorner(radii) => CornerRadii::from(radii),
        }
    }
}
