//! Per-invocation float working buffers.
//!
//! Three physical buffers serve five logical roles over the course of one plane.
//! Stages ask for a [`Role`] instead of assuming which buffer holds what:
//!
//! | slot | roles |
//! |------|-------|
//! | A    | `Smoothed`, then `Edge` (magnitude copy, suppression and link markers) |
//! | B    | `Scratch` (vertical pass), then `Magnitude` |
//! | C    | `Direction` |

use crate::error::{Error, Result};
use crate::plane::Extent;

/// Marks a pixel removed by non-maximum suppression.
pub const SUPPRESSED: f32 = -f32::MAX;

/// Marks a pixel retained by hysteresis.
pub const KEPT: f32 = f32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Smoothed,
    Scratch,
    Edge,
    Magnitude,
    Direction,
}

impl Role {
    fn slot(self) -> usize {
        match self {
            Role::Smoothed | Role::Edge => 0,
            Role::Scratch | Role::Magnitude => 1,
            Role::Direction => 2,
        }
    }
}

pub struct Workspace {
    extent: Extent,
    slots: [Vec<f32>; 3],
}

impl Workspace {
    pub fn new(extent: Extent) -> Result<Self> {
        let len = extent.buffer_len()?;
        Ok(Self {
            extent,
            slots: [
                try_filled(len, 0.0, "working buffer")?,
                try_filled(len, 0.0, "working buffer")?,
                try_filled(len, 0.0, "working buffer")?,
            ],
        })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn buffer(&self, role: Role) -> &[f32] {
        &self.slots[role.slot()]
    }

    pub fn buffer_mut(&mut self, role: Role) -> &mut [f32] {
        &mut self.slots[role.slot()]
    }

    /// Borrows one role for writing and another for reading.
    ///
    /// # Panics
    /// If both roles live in the same slot.
    pub fn split(&mut self, write: Role, read: Role) -> (&mut [f32], &[f32]) {
        let (w, r) = (write.slot(), read.slot());
        assert_ne!(w, r, "{write:?} and {read:?} share a buffer");
        if w < r {
            let (lo, hi) = self.slots.split_at_mut(r);
            (&mut lo[w], &hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(w);
            (&mut hi[0], &lo[r])
        }
    }

    /// Borrows the edge, magnitude and direction roles at once.
    pub fn edge_magnitude_direction(&mut self) -> (&mut [f32], &mut [f32], &mut [f32]) {
        let [a, b, c] = &mut self.slots;
        (a.as_mut_slice(), b.as_mut_slice(), c.as_mut_slice())
    }
}

/// `vec![value; len]` that reports allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation(what))?;
    buf.resize(len, value);
    Ok(buf)
}
