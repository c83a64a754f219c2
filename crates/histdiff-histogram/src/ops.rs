//! Operations on histogram bin vectors
//!
//! Smoothing and normalisation work on plain `f64` slices so they apply to
//! raw counts and to pooled control sums alike.

use crate::types::Histogram;

/// Default smoothing factor
pub const DEFAULT_ALPHA: f64 = 0.25;

/// Exponential neighbour smoothing over an ordered bin vector
///
/// Interior bins become `x[i] + alpha*(x[i-1]-x[i]) + alpha*(x[i+1]-x[i])`.
/// Boundary bins use their single neighbour, and a one-bin vector is
/// returned unchanged. The support of the histogram is never widened.
pub fn exponential_smoothing(x: &[f64], alpha: f64) -> Vec<f64> {
    let n = x.len();
    (0..n)
        .map(|i| {
            let mut s = x[i];
            if i > 0 {
                s += alpha * (x[i - 1] - x[i]);
            }
            if i + 1 < n {
                s += alpha * (x[i + 1] - x[i]);
            }
            s
        })
        .collect()
}

/// Divide a vector by its sum
///
/// An all-zero vector stays all-zero instead of turning into NaN.
pub fn normalize(x: &[f64]) -> Vec<f64> {
    let sum: f64 = x.iter().sum();
    if sum == 0.0 {
        vec![0.0; x.len()]
    } else {
        x.iter().map(|&v| v / sum).collect()
    }
}

/// Element-wise sum of raw counts, used for pooling control wells
pub fn sum_counts<'a, I>(nbins: usize, histograms: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Histogram>,
{
    let mut pooled = vec![0.0; nbins];
    for hist in histograms {
        for (p, &c) in pooled.iter_mut().zip(hist.counts()) {
            *p += c as f64;
        }
    }
    pooled
}

/// Operations that can be performed on histograms
pub trait HistogramOps {
    /// Smooth then normalise the bin counts
    fn smoothed_distribution(&self, alpha: f64) -> Vec<f64>;
}

impl HistogramOps for Histogram {
    fn smoothed_distribution(&self, alpha: f64) -> Vec<f64> {
        normalize(&exponential_smoothing(&self.counts_f64(), alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinRange;
    use approx::assert_relative_eq;

    #[test]
    fn test_smoothing_simple() {
        let smoothed = exponential_smoothing(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.25);
        assert_eq!(smoothed, vec![1.25, 2.0, 3.0, 4.0, 4.75]);
    }

    #[test]
    fn test_smoothing_spreads_spike() {
        let smoothed = exponential_smoothing(&[0.0, 4.0, 0.0], 0.25);
        assert_eq!(smoothed, vec![1.0, 2.0, 1.0]);
        // mass is preserved for interior spikes
        assert_eq!(smoothed.iter().sum::<f64>(), 4.0);
    }

    #[test]
    fn test_smoothing_edge_lengths() {
        assert!(exponential_smoothing(&[], 0.25).is_empty());
        assert_eq!(exponential_smoothing(&[3.0], 0.25), vec![3.0]);
        assert_eq!(exponential_smoothing(&[4.0, 0.0], 0.25), vec![3.0, 1.0]);
    }

    #[test]
    fn test_normalize() {
        let n = normalize(&[1.0, 3.0]);
        assert_eq!(n, vec![0.25, 0.75]);

        let zero = normalize(&[0.0, 0.0, 0.0]);
        assert_eq!(zero, vec![0.0, 0.0, 0.0]);
        assert!(zero.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_sum_counts() {
        let range = BinRange::new(0.0, 4.0).unwrap();
        let mut a = Histogram::new(4, range).unwrap();
        let mut b = Histogram::new(4, range).unwrap();
        a.fill(&[0.5, 3.5]);
        b.fill(&[0.5, 0.5]);
        assert_eq!(sum_counts(4, [&a, &b]), vec![3.0, 0.0, 0.0, 1.0]);
        assert_eq!(sum_counts(4, std::iter::empty()), vec![0.0; 4]);
    }

    #[test]
    fn test_smoothed_distribution() {
        let mut hist = Histogram::new(4, BinRange::new(0.0, 10.0).unwrap()).unwrap();
        hist.fill(&[1.0, 1.0, 9.0, 9.0]);
        let dist = hist.smoothed_distribution(DEFAULT_ALPHA);
        assert_relative_eq!(dist.as_slice(), [0.375, 0.125, 0.125, 0.375].as_slice());
        assert_relative_eq!(dist.iter().sum::<f64>(), 1.0);
    }
}
