use crate::error::{Error, Result};
use crate::workspace::try_filled;

/// Normalized 1-D Gaussian used by both smoothing passes.
///
/// The diameter is `max(round(3σ), 1) * 2 + 1`: the radius is at least 1 and steps
/// up by one each time 3σ crosses a half-integer.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    radius: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Builds the kernel for `sigma`, which the caller has already checked is
    /// positive. Kernels too wide to allocate are an [`Error::Allocation`].
    pub fn new(sigma: f32) -> Result<Self> {
        let diameter = ((sigma * 3.0 + 0.5) as usize)
            .max(1)
            .checked_mul(2)
            .and_then(|d| d.checked_add(1))
            .ok_or(Error::Allocation("weights"))?;
        let radius = diameter / 2;

        let mut weights = try_filled(diameter, 0.0f32, "weights")?;
        let mut sum = 0.0f32;
        for (i, w) in weights.iter_mut().enumerate() {
            let k = i as f32 - radius as f32;
            *w = (-(k * k) / (2.0 * sigma * sigma)).exp();
            sum += *w;
        }
        for w in &mut weights {
            *w /= sum;
        }

        Ok(Self {
            sigma,
            radius,
            weights,
        })
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::GaussianKernel;
    use crate::error::Error;

    #[test]
    fn weights_are_symmetric_and_normalized() {
        for sigma in [0.1f32, 0.5, 1.0, 1.5, 2.7, 6.0] {
            let kernel = GaussianKernel::new(sigma).unwrap();
            let w = kernel.weights();
            assert_eq!(w.len(), 2 * kernel.radius() + 1);
            for i in 0..w.len() {
                assert_eq!(w[i], w[w.len() - 1 - i], "sigma {sigma} index {i}");
                assert!(w[i] >= 0.0);
            }
            let sum: f32 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sigma {sigma} sums to {sum}");
        }
    }

    #[test]
    fn radius_tracks_sigma() {
        assert_eq!(GaussianKernel::new(0.1).unwrap().radius(), 1);
        assert_eq!(GaussianKernel::new(1.0).unwrap().radius(), 3);
        assert_eq!(GaussianKernel::new(1.5).unwrap().radius(), 5);

        let mut last = 0;
        for step in 1..60 {
            let radius = GaussianKernel::new(step as f32 * 0.1).unwrap().radius();
            assert!(radius >= last);
            last = radius;
        }
    }

    #[test]
    fn huge_sigma_is_an_allocation_error() {
        for sigma in [1e19f32, 3e18, f32::INFINITY] {
            assert_eq!(
                GaussianKernel::new(sigma),
                Err(Error::Allocation("weights")),
                "sigma {sigma}"
            );
        }
    }

    #[test]
    fn center_weight_dominates() {
        let kernel = GaussianKernel::new(1.0).unwrap();
        let w = kernel.weights();
        let c = kernel.radius();
        assert!((w[c] - 0.39905).abs() < 1e-4);
        assert!(w[c] > w[c + 1] && w[c + 1] > w[c + 2]);
    }
}
