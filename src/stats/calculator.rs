//! Statistics Calculator Module
//! Fixed-bucket histograms and descriptive statistics for one year's values.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Number of histogram buckets.
pub const HISTOGRAM_BUCKETS: usize = 12;

/// One histogram bucket covering `[x0, x1)`; the last bucket is closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// Descriptive statistics for a set of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Observed `(min, max)`, widened by 0.5 on each side when degenerate.
    pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
        if values.is_empty() {
            return None;
        }
        let lo = Statistics::min(values.iter());
        let hi = Statistics::max(values.iter());
        if (hi - lo).abs() < f64::EPSILON {
            Some((lo - 0.5, hi + 0.5))
        } else {
            Some((lo, hi))
        }
    }

    /// Equal-width histogram with `buckets` bins over the observed range.
    ///
    /// Bucket counts always sum to `values.len()`.
    pub fn histogram(values: &[f64], buckets: usize) -> Vec<Bucket> {
        let Some((lo, hi)) = Self::value_range(values) else {
            return Vec::new();
        };
        let buckets = buckets.max(1);
        let width = (hi - lo) / buckets as f64;

        let mut result: Vec<Bucket> = (0..buckets)
            .map(|i| Bucket {
                x0: lo + i as f64 * width,
                x1: if i + 1 == buckets {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(buckets - 1);
            result[idx].count += 1;
        }

        result
    }

    /// Descriptive statistics. The standard deviation is the sample
    /// deviation and needs at least two values.
    pub fn summary(values: &[f64]) -> Option<SummaryStats> {
        if values.is_empty() {
            return None;
        }
        let std_dev = if values.len() > 1 {
            Some(Statistics::std_dev(values.iter()))
        } else {
            None
        };
        Some(SummaryStats {
            count: values.len(),
            mean: Statistics::mean(values.iter()),
            std_dev,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let values = [40.0, 45.5, 51.0, 60.2, 60.2, 71.9, 80.0, 82.5, 83.0];
        let hist = StatsCalculator::histogram(&values, HISTOGRAM_BUCKETS);

        assert_eq!(hist.len(), HISTOGRAM_BUCKETS);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(hist[0].x0, 40.0);
        assert_eq!(hist[HISTOGRAM_BUCKETS - 1].x1, 83.0);
        // max lands in the last bucket
        assert!(hist[HISTOGRAM_BUCKETS - 1].count >= 1);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let hist = StatsCalculator::histogram(&[70.0, 70.0, 70.0], HISTOGRAM_BUCKETS);
        assert_eq!(hist.len(), HISTOGRAM_BUCKETS);
        assert_eq!(hist[0].x0, 69.5);
        assert_eq!(hist[HISTOGRAM_BUCKETS - 1].x1, 70.5);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(StatsCalculator::histogram(&[], HISTOGRAM_BUCKETS).is_empty());
    }

    #[test]
    fn test_summary() {
        let s = StatsCalculator::summary(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.count, 8);
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.std_dev.unwrap() - 2.138089935299395).abs() < 1e-9);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);

        let single = StatsCalculator::summary(&[3.0]).unwrap();
        assert_eq!(single.std_dev, None);
        assert!(StatsCalculator::summary(&[]).is_none());
    }
}
