use thiserror::Error;

use crate::format::FrameFormat;

/// Errors reported while configuring the detector or processing a plane.
///
/// Configuration errors are raised by [`Canny::new`](crate::Canny::new) before any
/// working buffer exists. Layout errors come from plane views that do not describe
/// their backing slice. `Allocation` is the only failure a valid invocation can hit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("sigma must be finite and greater than 0.0, got {0}")]
    InvalidSigma(f32),

    #[error("nms must be set to 0, 1, 2 or 3, got {0}")]
    InvalidNms(i32),

    #[error("mode must be set to -1, 0, 1, 2 or 3, got {0}")]
    InvalidMode(i32),

    #[error("op must be set to 0, 1 or 2, got {0}")]
    InvalidOperator(i32),

    #[error("gmmax must be greater than or equal to 1.0, got {0}")]
    InvalidGmmax(f32),

    #[error("bins must be at least 1, got {0}")]
    InvalidBins(u32),

    #[error("plane index {index} out of range for a {planes}-plane format")]
    PlaneOutOfRange { index: i64, planes: usize },

    #[error("plane {0} specified twice")]
    PlaneSpecifiedTwice(i64),

    #[error("only 8-16 bits integer and 32 bits float input supported, got {0}")]
    UnsupportedFormat(String),

    #[error("sample type does not match the configured depth {0}")]
    SampleTypeMismatch(String),

    #[error("frame format {actual:?} does not match the configured {expected:?}")]
    FormatMismatch {
        expected: FrameFormat,
        actual: FrameFormat,
    },

    #[error("invalid stride: {stride} is smaller than width {width}")]
    InvalidStride { stride: usize, width: usize },

    #[error("size mismatch: expected at least {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("source is {src_width}x{src_height} but destination is {dst_width}x{dst_height}")]
    DimensionMismatch {
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
    },

    #[error("frame carries {actual} planes, format expects {expected}")]
    PlaneCountMismatch { expected: usize, actual: usize },

    #[error("malloc failure ({0})")]
    Allocation(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
