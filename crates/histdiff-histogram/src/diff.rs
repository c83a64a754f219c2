//! The HistDiff square-difference score
//!
//! Both inputs are normalised distributions indexed `1..=nbins`. The
//! magnitude is the summed squared difference of the bins. The sign comes
//! from a first-moment-like proxy, `sum (i+1) * v[i]`: when the control's
//! proxy exceeds the experimental one the score is negative, otherwise
//! positive. Callers depend on this sign convention.

use histdiff_core::{Error, Result};

use crate::traits::HistogramDistance;

/// Weighted bin position using 1-based bin indices as weights
pub fn weighted_position(v: &[f64]) -> f64 {
    v.iter()
        .enumerate()
        .map(|(i, &p)| (i + 1) as f64 * p)
        .sum()
}

/// HistDiff signed square difference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistSquareDiff {
    /// Scale applied to the experimental distribution before differencing
    factor: f64,
}

impl HistSquareDiff {
    /// Create the metric with factor 1
    pub fn new() -> Self {
        Self { factor: 1.0 }
    }

    /// Scale the experimental distribution by `factor` before differencing
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Get the experimental scale factor
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for HistSquareDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramDistance for HistSquareDiff {
    fn score(&self, control: &[f64], experimental: &[f64]) -> Result<f64> {
        if control.len() != experimental.len() {
            return Err(Error::size_mismatch(
                control.len(),
                experimental.len(),
                "histdiff distributions",
            ));
        }

        // sign uses the unscaled experimental distribution
        let sign = if weighted_position(control) > weighted_position(experimental) {
            -1.0
        } else {
            1.0
        };

        let magnitude: f64 = control
            .iter()
            .zip(experimental)
            .map(|(&c, &e)| (c - e * self.factor).powi(2))
            .sum();

        Ok(sign * magnitude)
    }

    fn name(&self) -> &'static str {
        "hist_square_diff"
    }
}

/// Score one distribution with the default metric
pub fn hist_square_diff(control: &[f64], experimental: &[f64]) -> Result<f64> {
    HistSquareDiff::new().score(control, experimental)
}
