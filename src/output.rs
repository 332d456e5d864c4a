//! Conversion of working buffers into the destination plane.
//!
//! Integer planes round half up and clamp to `[0, peak]`. Float planes subtract the
//! plane offset and clamp to `[lower, upper]`. Each mode reads a fixed set of roles:
//!
//! | mode | reads |
//! |------|-------|
//! | `Smoothed` | edge (holds the smoothed plane when no gradient ran) |
//! | `Binary` | edge |
//! | `Magnitude` | magnitude |
//! | `ThresholdedDirection` | edge, direction |
//! | `Direction` | direction |

use crate::format::{Quantizer, Sample};
use crate::gradient::{direction_bin, direction_bin_f32};
use crate::params::Mode;
use crate::plane::PlaneMut;
use crate::workspace::{Role, Workspace};

/// Everything the mapper needs besides the buffers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OutputConfig {
    pub mode: Mode,
    pub quantizer: Quantizer,
    pub t_h: f32,
    pub magnitude_scale: f32,
    pub bins: u32,
}

pub(crate) fn write_plane<T: Sample>(
    config: &OutputConfig,
    ws: &Workspace,
    dst: &mut PlaneMut<'_, T>,
) {
    let edge = ws.buffer(Role::Edge);
    let magnitude = ws.buffer(Role::Magnitude);
    let dirs = ws.buffer(Role::Direction);
    let stride = ws.extent().stride;
    let t_h = config.t_h;
    let bins = config.bins;

    match (config.mode, config.quantizer) {
        (Mode::Smoothed, Quantizer::Integer { peak }) => {
            map(dst, stride, |i| round_clamp(edge[i], peak))
        }
        (Mode::Smoothed, Quantizer::Float { offset, lower, upper }) => {
            map(dst, stride, |i| (edge[i] - offset).max(lower).min(upper))
        }

        (Mode::Binary, Quantizer::Integer { peak }) => map(dst, stride, |i| {
            if edge[i] >= t_h {
                peak as f32
            } else {
                0.0
            }
        }),
        (Mode::Binary, Quantizer::Float { lower, upper, .. }) => map(dst, stride, |i| {
            if edge[i] >= t_h {
                upper
            } else {
                lower
            }
        }),

        (Mode::Magnitude, Quantizer::Integer { peak }) => {
            let scale = config.magnitude_scale;
            map(dst, stride, |i| {
                ((magnitude[i] * scale + 0.5) as i64).min(i64::from(peak)) as f32
            })
        }
        (Mode::Magnitude, Quantizer::Float { offset, upper, .. }) => {
            let scale = config.magnitude_scale;
            map(dst, stride, |i| (magnitude[i] * scale - offset).min(upper))
        }

        (Mode::ThresholdedDirection, Quantizer::Integer { .. }) => map(dst, stride, |i| {
            if edge[i] >= t_h {
                direction_bin(dirs[i], bins) as f32
            } else {
                0.0
            }
        }),
        (Mode::ThresholdedDirection, Quantizer::Float { offset, lower, .. }) => {
            map(dst, stride, |i| {
                if edge[i] >= t_h {
                    direction_bin_f32(dirs[i], bins) - offset
                } else {
                    lower
                }
            })
        }

        (Mode::Direction, Quantizer::Integer { .. }) => {
            map(dst, stride, |i| direction_bin(dirs[i], bins) as f32)
        }
        (Mode::Direction, Quantizer::Float { offset, .. }) => {
            map(dst, stride, |i| direction_bin_f32(dirs[i], bins) - offset)
        }
    }
}

/// `trunc(v + 0.5)` clamped to `[0, peak]`.
#[inline]
fn round_clamp(v: f32, peak: u32) -> f32 {
    ((v + 0.5) as i64).clamp(0, i64::from(peak)) as f32
}

fn map<T: Sample>(dst: &mut PlaneMut<'_, T>, stride: usize, f: impl Fn(usize) -> f32) {
    for y in 0..dst.height() {
        let base = y * stride;
        for (x, out) in dst.row_mut(y).iter_mut().enumerate() {
            *out = T::from_f32(f(base + x));
        }
    }
}
