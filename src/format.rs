//! Sample depths, colour families and the per-depth numeric policy.
//!
//! The depth is chosen once when a [`Canny`](crate::Canny) is built. Samples only
//! know how to widen to `f32` and narrow back; the rounding and clamping rules that
//! differ between integer and float output live in [`Quantizer`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Storage depth of a plane's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleDepth {
    /// 8-bit unsigned samples stored in `u8`.
    U8,
    /// 9 to 16-bit unsigned samples stored in `u16`.
    U16 { bits: u8 },
    /// 32-bit float samples.
    F32,
}

impl SampleDepth {
    /// Significant bits per sample for integer depths.
    pub fn bits(self) -> Option<u32> {
        match self {
            SampleDepth::U8 => Some(8),
            SampleDepth::U16 { bits } => Some(u32::from(bits)),
            SampleDepth::F32 => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleDepth::F32)
    }

    pub(crate) fn validate(self) -> Result<()> {
        match self {
            SampleDepth::U16 { bits } if !(9..=16).contains(&bits) => {
                Err(Error::UnsupportedFormat(self.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SampleDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleDepth::U8 => write!(f, "8-bit integer"),
            SampleDepth::U16 { bits } => write!(f, "{bits}-bit integer"),
            SampleDepth::F32 => write!(f, "32-bit float"),
        }
    }
}

/// Colour family of a frame. Decides the plane count and, for float samples,
/// whether planes after the first are centred chroma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorFamily {
    Gray,
    Rgb,
    Yuv,
}

impl ColorFamily {
    pub fn num_planes(self) -> usize {
        match self {
            ColorFamily::Gray => 1,
            ColorFamily::Rgb | ColorFamily::Yuv => 3,
        }
    }
}

/// Shape-independent description of the frames a detector will see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameFormat {
    pub depth: SampleDepth,
    pub family: ColorFamily,
}

impl FrameFormat {
    pub fn new(depth: SampleDepth, family: ColorFamily) -> Self {
        Self { depth, family }
    }

    pub fn gray(depth: SampleDepth) -> Self {
        Self::new(depth, ColorFamily::Gray)
    }

    pub fn num_planes(&self) -> usize {
        self.family.num_planes()
    }

    /// Whether `plane` holds centred chroma (`[-0.5, 0.5]`) rather than
    /// luma-like data. Only float YUV planes after the first qualify.
    pub fn is_centered_chroma(&self, plane: usize) -> bool {
        self.depth.is_float() && plane != 0 && self.family == ColorFamily::Yuv
    }

    pub(crate) fn plane_range(&self, plane: usize) -> PlaneRange {
        if !self.depth.is_float() {
            PlaneRange::INTEGER
        } else if self.is_centered_chroma(plane) {
            PlaneRange::CHROMA
        } else {
            PlaneRange::LUMA
        }
    }
}

/// Offset added while smoothing and the float output clamp range of one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRange {
    pub offset: f32,
    /// Float output clamp bounds. Unused for integer depths.
    pub lower: f32,
    pub upper: f32,
}

impl PlaneRange {
    /// Integer planes are never offset and clamp to `[0, peak]` of their
    /// [`Quantizer::Integer`], so `lower` and `upper` stay zero and unread.
    const INTEGER: Self = Self {
        offset: 0.0,
        lower: 0.0,
        upper: 0.0,
    };
    const LUMA: Self = Self {
        offset: 0.0,
        lower: 0.0,
        upper: 1.0,
    };
    const CHROMA: Self = Self {
        offset: 0.5,
        lower: -0.5,
        upper: 0.5,
    };
}

/// How output values are discretized for a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantizer {
    /// Round half up, clamp to `[0, peak]`.
    Integer { peak: u32 },
    /// Subtract `offset`, clamp to `[lower, upper]`.
    Float { offset: f32, lower: f32, upper: f32 },
}

impl Quantizer {
    pub(crate) fn for_plane(depth: SampleDepth, range: PlaneRange) -> Self {
        match depth.bits() {
            Some(bits) => Quantizer::Integer {
                peak: (1u32 << bits) - 1,
            },
            None => Quantizer::Float {
                offset: range.offset,
                lower: range.lower,
                upper: range.upper,
            },
        }
    }
}

/// A storable sample type.
pub trait Sample: Copy + Default + Send + Sync + 'static {
    fn to_f32(self) -> f32;

    /// Narrows an already quantized value. Integer impls saturate.
    fn from_f32(value: f32) -> Self;

    /// Whether this storage type carries samples of `depth`.
    fn stores(depth: SampleDepth) -> bool;
}

impl Sample for u8 {
    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self)
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value as u8
    }

    fn stores(depth: SampleDepth) -> bool {
        matches!(depth, SampleDepth::U8)
    }
}

impl Sample for u16 {
    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self)
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value as u16
    }

    fn stores(depth: SampleDepth) -> bool {
        matches!(depth, SampleDepth::U16 { .. })
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    fn stores(depth: SampleDepth) -> bool {
        matches!(depth, SampleDepth::F32)
    }
}
