//! The configured detector and its per-plane driver.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::format::{FrameFormat, PlaneRange, Quantizer, Sample};
use crate::gradient::{gradient_direction, Operator};
use crate::hysteresis::Linker;
use crate::kernel::GaussianKernel;
use crate::nms::{suppress, Nms};
use crate::output::{write_plane, OutputConfig};
use crate::params::{CannyParams, Mode};
use crate::plane::{ensure_same_size, Frame, PlaneMut, PlaneRef};
use crate::smooth::smooth_plane;
use crate::workspace::Workspace;

/// A validated detector for one frame format.
///
/// Building it checks every parameter and precomputes the kernel, the thresholds
/// on the sample scale and the per-plane output ranges. It is immutable afterwards
/// and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Canny {
    format: FrameFormat,
    kernel: GaussianKernel,
    mode: Mode,
    operator: Operator,
    nms: Nms,
    t_h: f32,
    t_l: f32,
    magnitude_scale: f32,
    bins: u32,
    process: Vec<bool>,
}

impl Canny {
    pub fn new(params: &CannyParams, format: FrameFormat) -> Result<Self> {
        format.depth.validate()?;
        params.validate()?;

        let num_planes = format.num_planes();
        let process = match &params.planes {
            None => vec![true; num_planes],
            Some(planes) => {
                let mut process = vec![false; num_planes];
                for &n in planes {
                    if n < 0 || n >= num_planes as i64 {
                        return Err(Error::PlaneOutOfRange {
                            index: n,
                            planes: num_planes,
                        });
                    }
                    if process[n as usize] {
                        return Err(Error::PlaneSpecifiedTwice(n));
                    }
                    process[n as usize] = true;
                }
                process
            }
        };

        let (t_h, t_l, default_bins) = match format.depth.bits() {
            Some(bits) => {
                let scale = (1u32 << (bits - 8)) as f32;
                (params.t_h * scale, params.t_l * scale, 1u32 << bits)
            }
            None => (params.t_h / 255.0, params.t_l / 255.0, 1),
        };

        let canny = Self {
            format,
            kernel: GaussianKernel::new(params.sigma)?,
            mode: Mode::from_raw(params.mode)?,
            operator: Operator::from_raw(params.op)?,
            nms: Nms::from_raw(params.nms)?,
            t_h,
            t_l,
            magnitude_scale: 255.0 / params.gmmax,
            bins: params.bins.unwrap_or(default_bins),
            process,
        };
        debug!(
            "configured {} {:?}: mode {:?}, radius {}, t_h {}, t_l {}, bins {}",
            canny.format.depth,
            canny.format.family,
            canny.mode,
            canny.kernel.radius(),
            canny.t_h,
            canny.t_l,
            canny.bins
        );
        Ok(canny)
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn nms(&self) -> Nms {
        self.nms
    }

    /// High threshold on the sample scale.
    pub fn t_h(&self) -> f32 {
        self.t_h
    }

    /// Low threshold on the sample scale.
    pub fn t_l(&self) -> f32 {
        self.t_l
    }

    pub fn bins(&self) -> u32 {
        self.bins
    }

    /// Whether `plane` is filtered. Other planes are copied through.
    pub fn processes(&self, plane: usize) -> bool {
        self.process.get(plane).copied().unwrap_or(false)
    }

    /// Runs the detector on one plane.
    ///
    /// Planes that are not selected for processing are copied unchanged. `src` and
    /// `dst` must have the same width and height; their strides may differ.
    pub fn process_plane<T: Sample>(
        &self,
        plane: usize,
        src: PlaneRef<'_, T>,
        mut dst: PlaneMut<'_, T>,
    ) -> Result<()> {
        if !T::stores(self.format.depth) {
            return Err(Error::SampleTypeMismatch(self.format.depth.to_string()));
        }
        if plane >= self.format.num_planes() {
            return Err(Error::PlaneOutOfRange {
                index: plane as i64,
                planes: self.format.num_planes(),
            });
        }
        ensure_same_size(src.extent(), dst.extent())?;

        if !self.process[plane] {
            return dst.copy_from(&src);
        }

        let range = self.format.plane_range(plane);
        let mut ws = Workspace::new(src.extent())?;
        smooth_plane(&src, &self.kernel, range.offset, &mut ws);

        if self.mode.computes_gradient() {
            gradient_direction(&mut ws, self.operator, self.mode.magnitude_only());

            if self.mode.thins_edges() {
                let suppressed = suppress(&mut ws, self.nms);
                let (edge, _, _) = ws.edge_magnitude_direction();
                let kept = Linker::new(src.extent())?.link(edge, self.t_h, self.t_l);
                debug!("plane {plane}: suppressed {suppressed}, kept {kept}");
            }
        }

        write_plane(&self.output_config(range), &ws, &mut dst);
        Ok(())
    }

    /// Runs the detector on every plane of `src`, in parallel, and returns the
    /// filtered frame.
    pub fn process_frame<T: Sample>(&self, src: &Frame<T>) -> Result<Frame<T>> {
        if !T::stores(src.format().depth) || src.format().depth != self.format.depth {
            return Err(Error::SampleTypeMismatch(self.format.depth.to_string()));
        }
        if src.format() != self.format {
            return Err(Error::FormatMismatch {
                expected: self.format,
                actual: src.format(),
            });
        }
        if src.planes().len() != self.format.num_planes() {
            return Err(Error::PlaneCountMismatch {
                expected: self.format.num_planes(),
                actual: src.planes().len(),
            });
        }

        let mut dst = src.clone();
        dst.planes_mut()
            .par_iter_mut()
            .enumerate()
            .filter(|(i, _)| self.process[*i])
            .try_for_each(|(i, out)| {
                self.process_plane(i, src.planes()[i].as_plane_ref(), out.as_plane_mut())
            })?;
        Ok(dst)
    }

    fn output_config(&self, range: PlaneRange) -> OutputConfig {
        OutputConfig {
            mode: self.mode,
            quantizer: Quantizer::for_plane(self.format.depth, range),
            t_h: self.t_h,
            magnitude_scale: self.magnitude_scale,
            bins: self.bins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{ColorFamily, SampleDepth};
    use crate::plane::Plane;

    fn params(mode: i32) -> CannyParams {
        CannyParams {
            mode,
            ..CannyParams::default()
        }
    }

    #[test]
    fn rejects_bad_plane_lists() {
        let yuv = FrameFormat::new(SampleDepth::U8, ColorFamily::Yuv);
        let mut p = CannyParams::default();

        p.planes = Some(vec![0, 3]);
        assert_eq!(
            Canny::new(&p, yuv).unwrap_err(),
            Error::PlaneOutOfRange {
                index: 3,
                planes: 3
            }
        );
        p.planes = Some(vec![-1]);
        assert!(matches!(
            Canny::new(&p, yuv),
            Err(Error::PlaneOutOfRange { index: -1, .. })
        ));
        p.planes = Some(vec![1, 2, 1]);
        assert_eq!(Canny::new(&p, yuv).unwrap_err(), Error::PlaneSpecifiedTwice(1));

        p.planes = Some(vec![2]);
        let canny = Canny::new(&p, yuv).unwrap();
        assert!(!canny.processes(0));
        assert!(canny.processes(2));
    }

    #[test]
    fn rejects_unbounded_sigma_without_panicking() {
        let gray = FrameFormat::gray(SampleDepth::U8);
        let p = CannyParams {
            sigma: f32::INFINITY,
            ..CannyParams::default()
        };
        assert_eq!(
            Canny::new(&p, gray).unwrap_err(),
            Error::InvalidSigma(f32::INFINITY)
        );

        let p = CannyParams {
            sigma: 1e19,
            ..CannyParams::default()
        };
        assert_eq!(Canny::new(&p, gray).unwrap_err(), Error::Allocation("weights"));
    }

    #[test]
    fn rejects_unsupported_depth() {
        let format = FrameFormat::gray(SampleDepth::U16 { bits: 20 });
        assert!(matches!(
            Canny::new(&CannyParams::default(), format),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn thresholds_and_bins_follow_depth() {
        let p = CannyParams::default();

        let c = Canny::new(&p, FrameFormat::gray(SampleDepth::U8)).unwrap();
        assert_eq!((c.t_h(), c.t_l(), c.bins()), (8.0, 1.0, 256));

        let c = Canny::new(&p, FrameFormat::gray(SampleDepth::U16 { bits: 10 })).unwrap();
        assert_eq!((c.t_h(), c.t_l(), c.bins()), (32.0, 4.0, 1024));

        let c = Canny::new(&p, FrameFormat::gray(SampleDepth::F32)).unwrap();
        assert!((c.t_h() - 8.0 / 255.0).abs() < 1e-7);
        assert_eq!(c.bins(), 1);

        let p = CannyParams {
            bins: Some(4),
            ..CannyParams::default()
        };
        let c = Canny::new(&p, FrameFormat::gray(SampleDepth::U8)).unwrap();
        assert_eq!(c.bins(), 4);
    }

    #[test]
    fn sample_type_must_match_depth() {
        let canny = Canny::new(&params(0), FrameFormat::gray(SampleDepth::U8)).unwrap();
        let src = Plane::<u16>::new(4, 4);
        let mut dst = Plane::<u16>::new(4, 4);
        assert!(matches!(
            canny.process_plane(0, src.as_plane_ref(), dst.as_plane_mut()),
            Err(Error::SampleTypeMismatch(_))
        ));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let canny = Canny::new(&params(0), FrameFormat::gray(SampleDepth::U8)).unwrap();
        let src = Plane::<u8>::new(4, 4);
        let mut dst = Plane::<u8>::new(5, 4);
        assert!(matches!(
            canny.process_plane(0, src.as_plane_ref(), dst.as_plane_mut()),
            Err(Error::DimensionMismatch { .. })
        ));
        let mut dst = Plane::<u8>::new(4, 4);
        assert!(matches!(
            canny.process_plane(1, src.as_plane_ref(), dst.as_plane_mut()),
            Err(Error::PlaneOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn unselected_planes_are_copied() {
        let format = FrameFormat::new(SampleDepth::U8, ColorFamily::Rgb);
        let p = CannyParams {
            planes: Some(vec![0]),
            mode: 0,
            ..CannyParams::default()
        };
        let canny = Canny::new(&p, format).unwrap();
        let planes = (0..3)
            .map(|k| Plane::from_fn(6, 5, |x, y| (x * 20 + y * 3 + k) as u8))
            .collect();
        let frame = Frame::new(format, planes).unwrap();
        let out = canny.process_frame(&frame).unwrap();
        assert_eq!(out.plane(1), frame.plane(1));
        assert_eq!(out.plane(2), frame.plane(2));
        assert!(out.plane(0).unwrap().data().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn padded_stride_matches_tight_layout() {
        let canny = Canny::new(&params(1), FrameFormat::gray(SampleDepth::U8)).unwrap();
        let tight = Plane::from_fn(7, 6, |x, y| ((x * x + 3 * y) % 50) as u8);

        let mut padded = vec![0u8; 10 * 6];
        for y in 0..6 {
            padded[y * 10..y * 10 + 7].copy_from_slice(tight.row(y));
        }
        let src = PlaneRef::from_slice(7, 6, 10, &padded).unwrap();

        let mut expected = Plane::<u8>::new(7, 6);
        canny
            .process_plane(0, tight.as_plane_ref(), expected.as_plane_mut())
            .unwrap();
        let mut out = vec![0u8; 7 * 6];
        let dst = PlaneMut::from_slice_mut(7, 6, 7, &mut out).unwrap();
        canny.process_plane(0, src, dst).unwrap();
        assert_eq!(out, expected.into_vec());
    }

    #[test]
    fn frame_depth_must_match() {
        let format = FrameFormat::gray(SampleDepth::U16 { bits: 10 });
        let canny = Canny::new(&params(0), format).unwrap();
        let frame = Frame::new(
            FrameFormat::gray(SampleDepth::U16 { bits: 12 }),
            vec![Plane::<u16>::new(3, 3)],
        )
        .unwrap();
        assert!(matches!(
            canny.process_frame(&frame),
            Err(Error::SampleTypeMismatch(_))
        ));
    }

    #[test]
    fn frame_family_must_match() {
        let yuv = FrameFormat::new(SampleDepth::F32, ColorFamily::Yuv);
        let rgb = FrameFormat::new(SampleDepth::F32, ColorFamily::Rgb);
        let canny = Canny::new(&params(0), yuv).unwrap();
        let frame = Frame::new(rgb, vec![Plane::<f32>::new(3, 3); 3]).unwrap();
        assert_eq!(
            canny.process_frame(&frame).unwrap_err(),
            Error::FormatMismatch {
                expected: yuv,
                actual: rgb,
            }
        );
    }
}
