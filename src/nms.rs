//! Non-maximum suppression.
//!
//! Reads the magnitude and direction roles and writes [`SUPPRESSED`] into the
//! edge role for every interior pixel that is not a ridge along its gradient.
//! Magnitudes themselves are never changed.

use std::f32::consts::PI;

use crate::error::{Error, Result};
use crate::gradient::direction_bin;
use crate::workspace::{Workspace, SUPPRESSED};

/// Which suppression variants run. Bit 1 selects the coarse 4-direction test,
/// bit 2 the interpolated test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nms(u8);

impl Nms {
    pub const NONE: Nms = Nms(0);
    pub const COARSE: Nms = Nms(1);
    pub const FINE: Nms = Nms(2);
    pub const BOTH: Nms = Nms(3);

    pub fn from_raw(nms: i32) -> Result<Self> {
        match nms {
            0..=3 => Ok(Nms(nms as u8)),
            other => Err(Error::InvalidNms(other)),
        }
    }

    pub fn coarse(self) -> bool {
        self.0 & 1 != 0
    }

    pub fn fine(self) -> bool {
        self.0 & 2 != 0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Suppresses non-maximal pixels and returns how many were marked.
///
/// A pixel survives as soon as one enabled variant finds it maximal; it is only
/// marked when every enabled variant rejects it.
pub(crate) fn suppress(ws: &mut Workspace, nms: Nms) -> usize {
    if nms.is_none() {
        return 0;
    }

    let extent = ws.extent();
    let (edge, magnitude, dirs) = ws.edge_magnitude_direction();
    let stride = extent.stride;
    let mut suppressed = 0;

    for y in 1..extent.height.saturating_sub(1) {
        for x in 1..extent.width.saturating_sub(1) {
            let i = y * stride + x;
            let dir = dirs[i];
            let mag = magnitude[i];

            if nms.coarse() && mag >= coarse_ridge(magnitude, i, stride, dir) {
                continue;
            }
            if nms.fine() && mag >= fine_ridge(magnitude, i, stride, dir) {
                continue;
            }
            edge[i] = SUPPRESSED;
            suppressed += 1;
        }
    }

    suppressed
}

/// Larger of the two neighbours along `dir` quantized to the nearest of four
/// compass axes.
#[inline]
fn coarse_ridge(g: &[f32], i: usize, stride: usize, dir: f32) -> f32 {
    let (a, b) = match direction_bin(dir, 4) {
        0 => (i + 1, i - 1),
        1 => (i - stride + 1, i + stride - 1),
        2 => (i - stride, i + stride),
        _ => (i - stride - 1, i + stride + 1),
    };
    g[a].max(g[b])
}

/// Larger of the two magnitudes interpolated at the exact gradient angle on
/// either side of the pixel.
#[inline]
fn fine_ridge(g: &[f32], i: usize, stride: usize, dir: f32) -> f32 {
    let (up, down) = (i - stride, i + stride);
    let sector = (dir * (4.0 / PI)) as u32;
    let (v1, v2) = match sector {
        1 => {
            let w = 1.0 / dir.tan();
            (
                (1.0 - w) * g[up] + w * g[up + 1],
                (1.0 - w) * g[down] + w * g[down - 1],
            )
        }
        2 => {
            let w = 1.0 / (PI - dir).tan();
            (
                (1.0 - w) * g[up] + w * g[up - 1],
                (1.0 - w) * g[down] + w * g[down + 1],
            )
        }
        3 => {
            let h = (PI - dir).tan();
            (
                (1.0 - h) * g[i - 1] + h * g[up - 1],
                (1.0 - h) * g[i + 1] + h * g[down + 1],
            )
        }
        _ => {
            let h = dir.tan();
            (
                (1.0 - h) * g[i + 1] + h * g[up + 1],
                (1.0 - h) * g[i - 1] + h * g[down - 1],
            )
        }
    };
    v1.max(v2)
}
