//! Two-threshold edge linking.
//!
//! Every interior pixel at or above the high threshold seeds an 8-connected flood
//! fill that promotes neighbours strictly above the low threshold. Promoted pixels
//! are overwritten with [`KEPT`]; everything else keeps its value, so suppressed
//! pixels stay [`SUPPRESSED`](crate::workspace::SUPPRESSED) and unreached weak
//! pixels stay below the high threshold for the output stage to drop.

use crate::error::{Error, Result};
use crate::plane::Extent;
use crate::workspace::{try_filled, KEPT};

/// Visited mask and work stack for one plane.
pub(crate) struct Linker {
    extent: Extent,
    visited: Vec<bool>,
    stack: Vec<(usize, usize)>,
}

impl Linker {
    pub fn new(extent: Extent) -> Result<Self> {
        let len = extent.width * extent.height;
        let visited = try_filled(len, false, "stack")?;
        let mut stack = Vec::new();
        stack
            .try_reserve(len.min(4096))
            .map_err(|_| Error::Allocation("stack"))?;
        Ok(Self {
            extent,
            visited,
            stack,
        })
    }

    /// Links edges in place and returns the number of pixels kept.
    pub fn link(&mut self, edge: &mut [f32], t_h: f32, t_l: f32) -> usize {
        let Extent {
            width,
            height,
            stride,
        } = self.extent;
        self.visited.fill(false);
        self.stack.clear();
        let mut kept = 0;

        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                if edge[x + y * stride] < t_h || self.visited[x + y * width] {
                    continue;
                }
                edge[x + y * stride] = KEPT;
                self.visited[x + y * width] = true;
                self.stack.push((x, y));
                kept += 1;

                while let Some((px, py)) = self.stack.pop() {
                    let x_min = if px > 1 { px - 1 } else { 1 };
                    let x_max = if px < width - 2 { px + 1 } else { px };
                    let y_min = if py > 1 { py - 1 } else { 1 };
                    let y_max = if py < height - 2 { py + 1 } else { py };

                    for yy in y_min..=y_max {
                        for xx in x_min..=x_max {
                            let i = xx + yy * stride;
                            if edge[i] > t_l && !self.visited[xx + yy * width] {
                                edge[i] = KEPT;
                                self.visited[xx + yy * width] = true;
                                self.stack.push((xx, yy));
                                kept += 1;
                            }
                        }
                    }
                }
            }
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::SUPPRESSED;

    fn run(width: usize, height: usize, edge: &mut [f32], t_h: f32, t_l: f32) -> usize {
        let extent = Extent::new(width, height, width).unwrap();
        Linker::new(extent).unwrap().link(edge, t_h, t_l)
    }

    #[rustfmt::skip]
    fn chain() -> Vec<f32> {
        vec![
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 9.0, 2.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 3.0, 0.0, 0.5, 0.0,
            0.0, 0.0, 0.0, 0.0, 4.0, 2.0, 0.0,
            0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        ]
    }

    #[test]
    fn weak_pixels_survive_only_when_connected() {
        let mut edge = chain();
        let kept = run(7, 6, &mut edge, 8.0, 1.0);

        assert_eq!(kept, 5);
        for i in [8, 9, 17, 25, 26] {
            assert_eq!(edge[i], KEPT, "index {i}");
        }
        // Isolated weak pixel and the sub-threshold tail keep their values.
        assert_eq!(edge[29], 2.0);
        assert_eq!(edge[19], 0.5);
    }

    #[test]
    fn strong_pixels_are_always_kept() {
        let mut edge = vec![0.0f32; 25];
        edge[6] = 8.0;
        edge[18] = 100.0;
        let kept = run(5, 5, &mut edge, 8.0, 1.0);
        assert_eq!(kept, 2);
        assert_eq!(edge[6], KEPT);
        assert_eq!(edge[18], KEPT);
    }

    #[test]
    fn low_threshold_is_exclusive_and_sentinels_block() {
        let mut edge = vec![0.0f32; 25];
        edge[6] = 10.0;
        edge[7] = 1.0;
        edge[11] = SUPPRESSED;
        edge[12] = 5.0;
        run(5, 5, &mut edge, 8.0, 1.0);
        assert_eq!(edge[7], 1.0);
        assert_eq!(edge[11], SUPPRESSED);
        // Diagonal neighbour of the seed.
        assert_eq!(edge[12], KEPT);
    }

    #[test]
    fn border_pixels_are_never_linked() {
        let mut edge = vec![50.0f32; 16];
        let kept = run(4, 4, &mut edge, 8.0, 1.0);
        assert_eq!(kept, 4);
        for (i, v) in edge.iter().enumerate() {
            let (x, y) = (i % 4, i / 4);
            let interior = (1..3).contains(&x) && (1..3).contains(&y);
            assert_eq!(*v == KEPT, interior, "({x},{y})");
        }
    }

    #[test]
    fn linking_is_idempotent() {
        let mut edge = chain();
        let extent = Extent::new(7, 6, 7).unwrap();
        let mut linker = Linker::new(extent).unwrap();
        linker.link(&mut edge, 8.0, 1.0);
        let once = edge.clone();
        linker.link(&mut edge, 8.0, 1.0);
        assert_eq!(edge, once);
    }
}
