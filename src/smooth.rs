//! Separable Gaussian smoothing with mirrored borders.
//!
//! The vertical pass reads source samples (plus the plane offset) into
//! [`Role::Scratch`]; the horizontal pass reads that into [`Role::Smoothed`].
//! Indices falling outside the plane mirror about the edge sample, so
//! `-1 -> 1` and `n -> n - 2`.

use crate::format::Sample;
use crate::kernel::GaussianKernel;
use crate::plane::{Extent, PlaneRef};
use crate::workspace::{Role, Workspace};

/// Mirrors `i` into `[0, n)`. A single reflection covers every kernel narrower
/// than the plane; wider kernels keep bouncing until the index lands.
#[inline]
pub(crate) fn reflect(i: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let last = n as isize - 1;
    let mut i = i;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

pub(crate) fn smooth_plane<T: Sample>(
    src: &PlaneRef<'_, T>,
    kernel: &GaussianKernel,
    offset: f32,
    ws: &mut Workspace,
) {
    let extent = ws.extent();
    convolve_vertical(src, ws.buffer_mut(Role::Scratch), extent, kernel, offset);
    let (dst, scratch) = ws.split(Role::Smoothed, Role::Scratch);
    convolve_horizontal(scratch, dst, extent, kernel);
}

fn convolve_vertical<T: Sample>(
    src: &PlaneRef<'_, T>,
    dst: &mut [f32],
    extent: Extent,
    kernel: &GaussianKernel,
    offset: f32,
) {
    let radius = kernel.radius() as isize;
    let weights = kernel.weights();
    let rows: Vec<&[T]> = (0..extent.height).map(|y| src.row(y)).collect();

    for y in 0..extent.height {
        let out = &mut dst[y * extent.stride..y * extent.stride + extent.width];
        for (x, value) in out.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for v in -radius..=radius {
                let yc = reflect(y as isize + v, extent.height);
                sum += (rows[yc][x].to_f32() + offset) * weights[(v + radius) as usize];
            }
            *value = sum;
        }
    }
}

fn convolve_horizontal(src: &[f32], dst: &mut [f32], extent: Extent, kernel: &GaussianKernel) {
    let radius = kernel.radius() as isize;
    let weights = kernel.weights();

    for y in 0..extent.height {
        let start = y * extent.stride;
        let row = &src[start..start + extent.width];
        let out = &mut dst[start..start + extent.width];
        for (x, value) in out.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for v in -radius..=radius {
                let xc = reflect(x as isize + v, extent.width);
                sum += row[xc] * weights[(v + radius) as usize];
            }
            *value = sum;
        }
    }
}
