//! Per-pixel blend modes
//!
//! All modes operate on straight-alpha RGBA bytes.

/// How a source pixel combines with the destination pixel beneath it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Porter-Duff source-over
    #[default]
    Normal,
    /// Overwrite the destination, alpha included
    Replace,
    /// Channel-wise multiply, alpha included
    Multiply,
    /// Channel-wise saturating add, alpha included
    Add,
    /// Channel-wise saturating subtract, alpha included
    Subtract,
    /// Subtract the source alpha from the destination alpha only
    AlphaSubtract,
}

impl BlendMode {
    /// Combine `src` into `dst` in place
    #[inline]
    pub fn apply(self, dst: &mut [u8; 4], src: [u8; 4]) {
        match self {
            BlendMode::Normal => blend_over(dst, src),
            BlendMode::Replace => *dst = src,
            BlendMode::Multiply => {
                for i in 0..4 {
                    dst[i] = mul_u8(dst[i], src[i]);
                }
            }
            BlendMode::Add => {
                for i in 0..4 {
                    dst[i] = dst[i].saturating_add(src[i]);
                }
            }
            BlendMode::Subtract => {
                for i in 0..4 {
                    dst[i] = dst[i].saturating_sub(src[i]);
                }
            }
            BlendMode::AlphaSubtract => {
                dst[3] = dst[3].saturating_sub(src[3]);
            }
        }
    }
}

/// `a * b / 255`, rounded to nearest
#[inline]
pub fn mul_u8(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

#[inline]
fn blend_over(dst: &mut [u8; 4], src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }

    let da = dst[3] as u32;
    let dst_weight = da * (255 - sa);
    let total = sa * 255 + dst_weight;
    if total == 0 {
        *dst = [0, 0, 0, 0];
        return;
    }

    for i in 0..3 {
        let c = src[i] as u32 * sa * 255 + dst[i] as u32 * dst_weight;
        dst[i] = ((c + total / 2) / total) as u8;
    }
    dst[3] = ((total + 127) / 255) as u8;
}
