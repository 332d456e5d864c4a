//! User-facing parameters.
//!
//! [`CannyParams`] mirrors the raw knobs a host exposes (integer selectors, plain
//! thresholds) and deserializes with serde, falling back to the defaults for
//! missing fields. [`Canny::new`](crate::Canny::new) validates it and turns the
//! selectors into [`Mode`], [`Operator`](crate::Operator) and [`Nms`](crate::Nms).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw detector parameters.
///
/// Thresholds are given on the 8-bit scale; they are rescaled to the configured
/// sample depth when the detector is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    /// Standard deviation of the Gaussian smoothing kernel. Must be positive and
    /// finite.
    pub sigma: f32,
    /// High hysteresis threshold: pixels at or above it seed edges.
    pub t_h: f32,
    /// Low hysteresis threshold: pixels above it extend edges.
    pub t_l: f32,
    /// Non-maximum suppression variants, see [`Nms`](crate::Nms).
    pub nms: i32,
    /// Output mode, -1 to 3, see [`Mode`].
    pub mode: i32,
    /// Gradient operator, 0 to 2, see [`Operator`](crate::Operator).
    pub op: i32,
    /// Gradient magnitude mapped to 255 in magnitude mode. At least 1.
    pub gmmax: f32,
    /// Planes to process. `None` processes every plane.
    pub planes: Option<Vec<i64>>,
    /// Direction bins for the direction modes. `None` uses `2^bits` for integer
    /// samples and 1 for float samples.
    pub bins: Option<u32>,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            sigma: 1.5,
            t_h: 8.0,
            t_l: 1.0,
            nms: 3,
            mode: -1,
            op: 1,
            gmmax: 50.0,
            planes: None,
            bins: None,
        }
    }
}

impl CannyParams {
    /// Checks the scalar parameters. Plane indices are checked against a
    /// format in [`Canny::new`](crate::Canny::new).
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(Error::InvalidSigma(self.sigma));
        }
        crate::nms::Nms::from_raw(self.nms)?;
        Mode::from_raw(self.mode)?;
        crate::gradient::Operator::from_raw(self.op)?;
        if !(self.gmmax >= 1.0) {
            return Err(Error::InvalidGmmax(self.gmmax));
        }
        if let Some(bins) = self.bins {
            if bins == 0 {
                return Err(Error::InvalidBins(bins));
            }
        }
        Ok(())
    }
}

/// What the detector writes to the destination plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// -1: the smoothed plane.
    Smoothed,
    /// 0: thinned, linked edges as peak-or-zero.
    Binary,
    /// 1: gradient magnitude scaled by `255 / gmmax`.
    Magnitude,
    /// 2: direction bins where an edge was kept, zero elsewhere.
    ThresholdedDirection,
    /// 3: direction bins everywhere.
    Direction,
}

impl Mode {
    pub fn from_raw(mode: i32) -> Result<Self> {
        match mode {
            -1 => Ok(Mode::Smoothed),
            0 => Ok(Mode::Binary),
            1 => Ok(Mode::Magnitude),
            2 => Ok(Mode::ThresholdedDirection),
            3 => Ok(Mode::Direction),
            other => Err(Error::InvalidMode(other)),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Mode::Smoothed => -1,
            Mode::Binary => 0,
            Mode::Magnitude => 1,
            Mode::ThresholdedDirection => 2,
            Mode::Direction => 3,
        }
    }

    /// Whether gradients are computed at all.
    pub fn computes_gradient(self) -> bool {
        self != Mode::Smoothed
    }

    /// Whether only the magnitude is needed from the gradient stage.
    pub fn magnitude_only(self) -> bool {
        self == Mode::Magnitude
    }

    /// Whether edges are thinned and linked (even modes).
    pub fn thins_edges(self) -> bool {
        self.raw() & 1 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = CannyParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.mode, -1);
        assert_eq!(params.op, 1);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = |f: fn(&mut CannyParams)| {
            let mut p = CannyParams::default();
            f(&mut p);
            p.validate().unwrap_err()
        };
        assert_eq!(bad(|p| p.sigma = 0.0), Error::InvalidSigma(0.0));
        assert_eq!(bad(|p| p.nms = 4), Error::InvalidNms(4));
        assert_eq!(bad(|p| p.mode = -2), Error::InvalidMode(-2));
        assert_eq!(bad(|p| p.op = 3), Error::InvalidOperator(3));
        assert_eq!(bad(|p| p.gmmax = 0.5), Error::InvalidGmmax(0.5));
        assert_eq!(bad(|p| p.bins = Some(0)), Error::InvalidBins(0));
        assert!(matches!(
            bad(|p| p.sigma = f32::NAN),
            Error::InvalidSigma(s) if s.is_nan()
        ));
        assert_eq!(
            bad(|p| p.sigma = f32::INFINITY),
            Error::InvalidSigma(f32::INFINITY)
        );
    }

    #[test]
    fn stage_gating_follows_mode_parity() {
        assert!(!Mode::Smoothed.computes_gradient());
        assert!(!Mode::Smoothed.thins_edges());
        assert!(Mode::Binary.thins_edges());
        assert!(Mode::ThresholdedDirection.thins_edges());
        assert!(!Mode::Magnitude.thins_edges());
        assert!(!Mode::Direction.thins_edges());
        assert!(Mode::Magnitude.magnitude_only());
        assert!(!Mode::Direction.magnitude_only());
        for raw in -1..=3 {
            assert_eq!(Mode::from_raw(raw).unwrap().raw(), raw);
        }
    }

    #[test]
    fn deserializes_partial_json() {
        let params: CannyParams =
            serde_json::from_str(r#"{ "sigma": 1.0, "mode": 0, "planes": [0] }"#).unwrap();
        assert_eq!(params.sigma, 1.0);
        assert_eq!(params.mode, 0);
        assert_eq!(params.planes, Some(vec![0]));
        assert_eq!(params.t_h, 8.0);
        assert_eq!(params.gmmax, 50.0);
        assert_eq!(params.bins, None);
    }
}
