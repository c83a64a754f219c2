//! Core traits for histogram comparison

use histdiff_core::Result;

/// A signed or unsigned distance between a control and an experimental
/// distribution over the same bins
pub trait HistogramDistance {
    /// Score one experimental distribution against the control
    fn score(&self, control: &[f64], experimental: &[f64]) -> Result<f64>;

    /// Metric name for logging
    fn name(&self) -> &'static str;
}
