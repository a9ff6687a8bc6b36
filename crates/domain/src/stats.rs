//! Latency statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Summary of a set of response latencies, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatencyStats {
    /// Number of samples.
    pub samples: usize,
    /// Fastest sample.
    pub min_ms: f64,
    /// Slowest sample.
    pub max_ms: f64,
    /// Arithmetic mean.
    pub mean_ms: f64,
    /// Median (mean of the two middle samples for even counts).
    pub median_ms: f64,
    /// 95th percentile, nearest-rank.
    pub p95_ms: f64,
}

impl LatencyStats {
    /// Computes statistics, or `None` for an empty slice.
    #[must_use]
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        let millis: Vec<f64> = durations.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        Self::from_millis(&millis)
    }

    /// Computes statistics from millisecond samples, or `None` for an empty slice.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_millis(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean_ms = sorted.iter().sum::<f64>() / n as f64;
        let median_ms = if n % 2 == 0 {
            f64::midpoint(sorted[n / 2 - 1], sorted[n / 2])
        } else {
            sorted[n / 2]
        };
        let rank = ((0.95 * n as f64).ceil() as usize).clamp(1, n);

        Some(Self {
            samples: n,
            min_ms: sorted[0],
            max_ms: sorted[n - 1],
            mean_ms,
            median_ms,
            p95_ms: sorted[rank - 1],
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_is_none() {
        assert!(LatencyStats::from_durations(&[]).is_none());
    }

    #[test]
    fn test_single_sample() {
        let stats = LatencyStats::from_durations(&[Duration::from_millis(40)]).unwrap();
        assert_eq!(stats.samples, 1);
        assert!(approx(stats.min_ms, 40.0));
        assert!(approx(stats.max_ms, 40.0));
        assert!(approx(stats.p95_ms, 40.0));
    }

    #[test]
    fn test_odd_and_even_median() {
        let odd = LatencyStats::from_millis(&[30.0, 10.0, 20.0]).unwrap();
        assert!(approx(odd.median_ms, 20.0));
        assert!(approx(odd.mean_ms, 20.0));

        let even = LatencyStats::from_millis(&[40.0, 10.0, 20.0, 30.0]).unwrap();
        assert!(approx(even.median_ms, 25.0));
    }

    #[test]
    fn test_p95_nearest_rank() {
        let samples: Vec<f64> = (1..=20).map(f64::from).collect();
        let stats = LatencyStats::from_millis(&samples).unwrap();
        assert!(approx(stats.p95_ms, 19.0));
        assert!(approx(stats.max_ms, 20.0));
    }
}
