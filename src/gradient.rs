//! Gradient magnitude and direction over the smoothed buffer.
//!
//! Only interior pixels are evaluated. The one-pixel frame of both the magnitude
//! and the direction buffer stays zero, so border pixels never become edges.
//! Directions are folded into `[0, π]`.

use std::f32::consts::PI;

use crate::error::{Error, Result};
use crate::workspace::Workspace;

/// Finite-difference operator used to estimate `dx` and `dy`.
///
/// `dy` is "up minus down" for every operator, so a brightness increase towards
/// the top of the plane gives a positive `dy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `dx = right - left`, `dy = up - down`.
    Central,
    /// Three-row/column sums halved.
    Prewitt,
    /// 1-2-1 weighted 3x3 Sobel.
    Sobel,
}

impl Operator {
    pub fn from_raw(op: i32) -> Result<Self> {
        match op {
            0 => Ok(Operator::Central),
            1 => Ok(Operator::Prewitt),
            2 => Ok(Operator::Sobel),
            other => Err(Error::InvalidOperator(other)),
        }
    }

    /// Partial derivatives at index `i` of a buffer with row pitch `stride`.
    /// `i` must not lie on the plane border.
    #[inline]
    pub fn derivatives(self, s: &[f32], i: usize, stride: usize) -> (f32, f32) {
        let (up, down) = (i - stride, i + stride);
        match self {
            Operator::Central => (s[i + 1] - s[i - 1], s[up] - s[down]),
            Operator::Prewitt => {
                let dx = (s[up + 1] + s[i + 1] + s[down + 1] - s[up - 1] - s[i - 1] - s[down - 1])
                    / 2.0;
                let dy = (s[up - 1] + s[up] + s[up + 1] - s[down - 1] - s[down] - s[down + 1])
                    / 2.0;
                (dx, dy)
            }
            Operator::Sobel => {
                let dx = s[up + 1] + 2.0 * s[i + 1] + s[down + 1]
                    - s[up - 1]
                    - 2.0 * s[i - 1]
                    - s[down - 1];
                let dy = s[up - 1] + 2.0 * s[up] + s[up + 1]
                    - s[down - 1]
                    - 2.0 * s[down]
                    - s[down + 1];
                (dx, dy)
            }
        }
    }
}

/// Gradient angle folded into `[0, π]` by adding π to negative angles.
///
/// `atan2(+0, dx < 0)` is already π and stays there; integer bins wrap it
/// back to 0.
#[inline]
pub fn direction(dx: f32, dy: f32) -> f32 {
    let dr = dy.atan2(dx);
    if dr < 0.0 {
        dr + PI
    } else {
        dr
    }
}

/// Integer direction bin: `round(dir * bins / π)`, wrapping `bins` to 0.
#[inline]
pub fn direction_bin(dir: f32, bins: u32) -> u32 {
    let bin = (dir * (bins as f32 / PI) + 0.5) as u32;
    if bin >= bins {
        0
    } else {
        bin
    }
}

/// Unrounded direction bin for float output, wrapping values past `bins` to 0.
#[inline]
pub fn direction_bin_f32(dir: f32, bins: u32) -> f32 {
    let bin = dir * (bins as f32 / PI);
    if bin > bins as f32 {
        0.0
    } else {
        bin
    }
}

/// Fills the magnitude and direction roles from the smoothed role, then copies
/// magnitude over the smoothed values so the edge role starts as magnitude.
///
/// With `magnitude_only` the direction buffer is left zeroed.
pub(crate) fn gradient_direction(ws: &mut Workspace, op: Operator, magnitude_only: bool) {
    let extent = ws.extent();
    let (smoothed, magnitude, dirs) = ws.edge_magnitude_direction();
    magnitude.fill(0.0);
    dirs.fill(0.0);

    let stride = extent.stride;
    for y in 1..extent.height.saturating_sub(1) {
        for x in 1..extent.width.saturating_sub(1) {
            let i = y * stride + x;
            let (dx, dy) = op.derivatives(smoothed, i, stride);
            magnitude[i] = (dx * dx + dy * dy).sqrt();
            if magnitude_only {
                continue;
            }
            dirs[i] = direction(dx, dy);
        }
    }

    smoothed.copy_from_slice(magnitude);
}
