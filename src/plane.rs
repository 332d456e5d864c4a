//! Strided sample planes.
//!
//! `stride` is measured in elements, not bytes, and may exceed `width` for padded
//! rows. Views only require the slice to reach the last sample of the last row.

use crate::error::{Error, Result};
use crate::format::{FrameFormat, Sample};

/// Width, height and row pitch shared by a plane and its working buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl Extent {
    pub fn new(width: usize, height: usize, stride: usize) -> Result<Self> {
        if stride < width {
            return Err(Error::InvalidStride { stride, width });
        }
        Ok(Self {
            width,
            height,
            stride,
        })
    }

    /// Samples a view over this extent must be able to address.
    pub fn min_len(&self) -> Result<usize> {
        if self.width == 0 || self.height == 0 {
            return Ok(0);
        }
        (self.height - 1)
            .checked_mul(self.stride)
            .and_then(|base| base.checked_add(self.width))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: 0,
            })
    }

    /// Samples in a full `stride * height` buffer.
    pub fn buffer_len(&self) -> Result<usize> {
        self.stride
            .checked_mul(self.height)
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: 0,
            })
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    fn check(&self, len: usize) -> Result<()> {
        let expected = self.min_len()?;
        if len < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}

/// Read-only borrowed plane.
#[derive(Debug, Clone, Copy)]
pub struct PlaneRef<'a, T> {
    extent: Extent,
    data: &'a [T],
}

impl<'a, T> PlaneRef<'a, T> {
    pub fn from_slice(width: usize, height: usize, stride: usize, data: &'a [T]) -> Result<Self> {
        let extent = Extent::new(width, height, stride)?;
        extent.check(data.len())?;
        Ok(Self { extent, data })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn width(&self) -> usize {
        self.extent.width
    }

    pub fn height(&self) -> usize {
        self.extent.height
    }

    pub fn stride(&self) -> usize {
        self.extent.stride
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.extent.height, "row index out of bounds");
        let start = y * self.extent.stride;
        &self.data[start..start + self.extent.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.data.get(self.extent.index(x, y))
    }
}

/// Writable borrowed plane.
#[derive(Debug)]
pub struct PlaneMut<'a, T> {
    extent: Extent,
    data: &'a mut [T],
}

impl<'a, T> PlaneMut<'a, T> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a mut [T],
    ) -> Result<Self> {
        let extent = Extent::new(width, height, stride)?;
        extent.check(data.len())?;
        Ok(Self { extent, data })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn width(&self) -> usize {
        self.extent.width
    }

    pub fn height(&self) -> usize {
        self.extent.height
    }

    pub fn stride(&self) -> usize {
        self.extent.stride
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.extent.height, "row index out of bounds");
        let start = y * self.extent.stride;
        &self.data[start..start + self.extent.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.extent.height, "row index out of bounds");
        let start = y * self.extent.stride;
        &mut self.data[start..start + self.extent.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.data.get(self.extent.index(x, y))
    }

    pub fn as_plane_ref(&self) -> PlaneRef<'_, T> {
        PlaneRef {
            extent: self.extent,
            data: &*self.data,
        }
    }
}

impl<T: Copy> PlaneMut<'_, T> {
    /// Copies `src` row by row. Both planes must have the same width and height.
    pub fn copy_from(&mut self, src: &PlaneRef<'_, T>) -> Result<()> {
        ensure_same_size(src.extent(), self.extent)?;
        for y in 0..self.extent.height {
            self.row_mut(y).copy_from_slice(src.row(y));
        }
        Ok(())
    }
}

pub(crate) fn ensure_same_size(src: Extent, dst: Extent) -> Result<()> {
    if src.width != dst.width || src.height != dst.height {
        return Err(Error::DimensionMismatch {
            src_width: src.width,
            src_height: src.height,
            dst_width: dst.width,
            dst_height: dst.height,
        });
    }
    Ok(())
}

/// Owned plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    extent: Extent,
    data: Vec<T>,
}

impl<T: Sample> Plane<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }

    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            extent: Extent {
                width,
                height,
                stride: width,
            },
            data: vec![value; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            extent: Extent {
                width,
                height,
                stride: width,
            },
            data,
        }
    }
}

impl<T> Plane<T> {
    pub fn from_vec(width: usize, height: usize, stride: usize, data: Vec<T>) -> Result<Self> {
        let extent = Extent::new(width, height, stride)?;
        extent.check(data.len())?;
        Ok(Self { extent, data })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn width(&self) -> usize {
        self.extent.width
    }

    pub fn height(&self) -> usize {
        self.extent.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.as_plane_ref().get(x, y)
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.extent.height, "row index out of bounds");
        let start = y * self.extent.stride;
        &self.data[start..start + self.extent.width]
    }

    pub fn as_plane_ref(&self) -> PlaneRef<'_, T> {
        PlaneRef {
            extent: self.extent,
            data: &self.data,
        }
    }

    pub fn as_plane_mut(&mut self) -> PlaneMut<'_, T> {
        PlaneMut {
            extent: self.extent,
            data: &mut self.data,
        }
    }
}

/// The planes of one frame, in format order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<T> {
    format: FrameFormat,
    planes: Vec<Plane<T>>,
}

impl<T> Frame<T> {
    pub fn new(format: FrameFormat, planes: Vec<Plane<T>>) -> Result<Self> {
        if planes.len() != format.num_planes() {
            return Err(Error::PlaneCountMismatch {
                expected: format.num_planes(),
                actual: planes.len(),
            });
        }
        Ok(Self { format, planes })
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn planes(&self) -> &[Plane<T>] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> Option<&Plane<T>> {
        self.planes.get(index)
    }

    pub(crate) fn planes_mut(&mut self) -> &mut [Plane<T>] {
        &mut self.planes
    }

    pub fn into_planes(self) -> Vec<Plane<T>> {
        self.planes
    }
}
