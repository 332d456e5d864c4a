//! # TCanny Edge Detection
//!
//! Canny edge detection over strided sample planes of 8-bit, 9 to 16-bit and 32-bit
//! float depth. Each plane goes through the same pipeline:
//!
//! - Separable Gaussian smoothing with mirrored borders
//! - Central, Prewitt or Sobel gradient magnitude and direction
//! - Coarse and/or interpolated non-maximum suppression
//! - Two-threshold hysteresis linking
//! - Output as the smoothed plane, a binary edge map, a scaled magnitude map or
//!   quantized gradient directions
//!
//! Multi-plane frames are processed plane-parallel with rayon. Optional debug logging
//! is available behind the `logger` feature.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use image::open;
//! use tcanny::{detect_gray8, visualize_edges, CannyParams};
//!
//! let image = open("example.png").unwrap().to_luma8();
//! let params = CannyParams {
//!     mode: 0,
//!     ..CannyParams::default()
//! };
//! let edges = detect_gray8(&image, &params).unwrap();
//!
//! let overlay = visualize_edges(&image, &edges);
//! overlay.save("edges_output.png").unwrap();
//! ```
//!
//! ## Frames
//!
//! ```rust,no_run
//! use tcanny::{Canny, CannyParams, ColorFamily, Frame, FrameFormat, Plane, SampleDepth};
//!
//! let format = FrameFormat::new(SampleDepth::F32, ColorFamily::Yuv);
//! let params: CannyParams = serde_json::from_str(r#"{ "mode": 1, "planes": [0] }"#).unwrap();
//! let canny = Canny::new(&params, format).unwrap();
//!
//! let planes = vec![Plane::<f32>::new(640, 480); 3];
//! let frame = Frame::new(format, planes).unwrap();
//! let magnitude = canny.process_frame(&frame).unwrap();
//! ```
//!
//! ## Logger Feature
//!
//! ```toml
//! [dependencies]
//! tcanny = { version = "0.1.0", features = ["logger"] }
//! env_logger = "0.11"
//! ```
//!
//! With the feature on, configuration and per-plane suppression/linking counts are
//! logged at debug level.

use image::{buffer::ConvertBuffer, GrayImage, ImageBuffer, Luma, Primitive, Rgb, RgbImage};
use imageproc::definitions::HasBlack;
use rayon::prelude::*;

#[cfg(feature = "logger")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(feature = "logger"))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

mod error;
mod format;
mod gradient;
mod hysteresis;
mod kernel;
mod nms;
mod output;
mod params;
mod pipeline;
mod plane;
mod smooth;
mod workspace;

pub use error::{Error, Result};
pub use format::{ColorFamily, FrameFormat, Sample, SampleDepth};
pub use gradient::{direction, direction_bin, direction_bin_f32, Operator};
pub use kernel::GaussianKernel;
pub use nms::Nms;
pub use params::{CannyParams, Mode};
pub use pipeline::Canny;
pub use plane::{Extent, Frame, Plane, PlaneMut, PlaneRef};
pub use workspace::{KEPT, SUPPRESSED};

/// Runs the detector on an 8-bit grayscale image.
///
/// # Examples
///
/// ```rust,no_run
/// use image::open;
/// use tcanny::{detect_gray8, CannyParams};
///
/// let image = open("input.png").unwrap().to_luma8();
/// let params = CannyParams {
///     sigma: 1.0,
///     mode: 0,
///     ..CannyParams::default()
/// };
/// let edges = detect_gray8(&image, &params).unwrap();
/// let count = edges.pixels().filter(|p| p.0[0] == 255).count();
/// println!("{count} edge pixels");
/// ```
pub fn detect_gray8(image: &GrayImage, params: &CannyParams) -> Result<GrayImage> {
    detect_luma(image, params, SampleDepth::U8)
}

/// Runs the detector on a 16-bit grayscale image. Thresholds stay on the 8-bit
/// scale and are multiplied by 256.
pub fn detect_gray16(
    image: &ImageBuffer<Luma<u16>, Vec<u16>>,
    params: &CannyParams,
) -> Result<ImageBuffer<Luma<u16>, Vec<u16>>> {
    detect_luma(image, params, SampleDepth::U16 { bits: 16 })
}

/// Runs the detector on a float grayscale image with samples in `[0, 1]`.
pub fn detect_gray32f(
    image: &ImageBuffer<Luma<f32>, Vec<f32>>,
    params: &CannyParams,
) -> Result<ImageBuffer<Luma<f32>, Vec<f32>>> {
    detect_luma(image, params, SampleDepth::F32)
}

fn detect_luma<T>(
    image: &ImageBuffer<Luma<T>, Vec<T>>,
    params: &CannyParams,
    depth: SampleDepth,
) -> Result<ImageBuffer<Luma<T>, Vec<T>>>
where
    T: Sample + Primitive,
{
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    let canny = Canny::new(params, FrameFormat::gray(depth))?;

    let src = PlaneRef::from_slice(w, h, w, image.as_raw())?;
    let mut out = ImageBuffer::<Luma<T>, Vec<T>>::new(width, height);
    let dst = PlaneMut::from_slice_mut(w, h, w, &mut *out)?;
    canny.process_plane(0, src, dst)?;

    debug!("detected {}x{} {} plane", width, height, depth);
    Ok(out)
}

/// Paints every non-black pixel of `edges` red on top of `image`.
///
/// `edges` is usually a mode 0 map from [`detect_gray8`]. Pixels outside `image`
/// are ignored.
///
/// # Examples
///
/// ```rust,no_run
/// use image::open;
/// use tcanny::{detect_gray8, visualize_edges, CannyParams};
///
/// let image = open("input.png").unwrap().to_luma8();
/// let params = CannyParams { mode: 0, ..CannyParams::default() };
/// let edges = detect_gray8(&image, &params).unwrap();
/// visualize_edges(&image, &edges).save("edges_visualization.png").unwrap();
/// ```
pub fn visualize_edges(image: &GrayImage, edges: &GrayImage) -> RgbImage {
    let mut canvas: RgbImage = image.convert();
    let red = Rgb([255u8, 0, 0]);
    let black = Luma::<u8>::black();
    let (width, height) = (canvas.width(), canvas.height());
    let edge_width = edges.width() as usize;

    // Gather in parallel, paint serially.
    let points: Vec<(u32, u32)> = edges
        .as_raw()
        .par_iter()
        .enumerate()
        .filter(|&(_, &v)| Luma([v]) != black)
        .map(|(i, _)| ((i % edge_width) as u32, (i / edge_width) as u32))
        .filter(|&(x, y)| x < width && y < height)
        .collect();

    for (x, y) in points {
        canvas.put_pixel(x, y, red);
    }

    canvas
}
