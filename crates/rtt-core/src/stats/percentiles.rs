//! Percentile calculations for RTT samples.

use serde::{Deserialize, Serialize};

use super::SampleSet;

/// Calculate a percentile from an ascending slice of samples.
///
/// Uses linear interpolation between the two bracketing order statistics,
/// with rank `p / 100 * (n - 1)`.
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If `sorted` is empty or `p` is outside `0.0..=100.0`
///
/// # Examples
///
/// ```
/// use rtt_core::stats::percentiles::percentile;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile(&data, 50.0), Some(3.0));
/// assert!((percentile(&data, 90.0).unwrap() - 4.6).abs() < 1e-9);
/// ```
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        Some(sorted[lower_index])
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        Some(lower_value + fraction * (upper_value - lower_value))
    }
}

/// Latency summary reported for one analyzed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub p999_ms: f64,
    /// Number of samples left after dropping missing cells
    #[serde(rename = "samples_ok")]
    pub sample_count: usize,
}

impl StatsSummary {
    /// Compute the summary from a sample set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtt_core::stats::{SampleSet, StatsSummary};
    ///
    /// let samples = SampleSet::new((1..=10).map(f64::from).collect()).unwrap();
    /// let summary = StatsSummary::from_samples(&samples);
    /// assert_eq!(summary.sample_count, 10);
    /// assert_eq!(summary.mean_ms, 5.5);
    /// assert_eq!(summary.p50_ms, 5.5);
    /// ```
    pub fn from_samples(samples: &SampleSet) -> Self {
        let sorted = samples.as_slice();
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;

        // SampleSet is never empty and every p is in range.
        let at = |p: f64| percentile(sorted, p).unwrap_or(f64::NAN);

        StatsSummary {
            mean_ms: mean,
            p50_ms: at(50.0),
            p90_ms: at(90.0),
            p99_ms: at(99.0),
            p999_ms: at(99.9),
            sample_count: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(values: Vec<f64>) -> StatsSummary {
        StatsSummary::from_samples(&SampleSet::new(values).unwrap())
    }

    #[test]
    fn test_percentile_empty_samples() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single_sample() {
        let samples = vec![42.0];
        assert_eq!(percentile(&samples, 50.0), Some(42.0));
        assert_eq!(percentile(&samples, 99.9), Some(42.0));
    }

    #[test]
    fn test_percentile_invalid_p() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(percentile(&samples, -1.0), None);
        assert_eq!(percentile(&samples, 100.1), None);
    }

    #[test]
    fn test_percentile_with_interpolation() {
        let samples: Vec<f64> = (1..=10).map(f64::from).collect();

        // rank 0.9 * 9 = 8.1 -> between 9 and 10
        let p90 = percentile(&samples, 90.0).unwrap();
        assert!((p90 - 9.1).abs() < 1e-10);

        // rank 0.999 * 9 = 8.991
        let p999 = percentile(&samples, 99.9).unwrap();
        assert!((p999 - 9.991).abs() < 1e-10);
    }

    #[test]
    fn test_summary_five_samples() {
        let s = summary(vec![10.0, 20.0, 30.0, 40.0, 50.0]);

        assert_eq!(s.sample_count, 5);
        assert_eq!(s.mean_ms, 30.0);
        assert_eq!(s.p50_ms, 30.0);
        assert!((s.p90_ms - 46.0).abs() < 1e-10);
        assert!((s.p99_ms - 49.6).abs() < 1e-10);
        assert!((s.p999_ms - 49.96).abs() < 1e-10);
    }

    #[test]
    fn test_summary_single_sample() {
        let s = summary(vec![7.5]);
        assert_eq!(s.sample_count, 1);
        assert_eq!(s.mean_ms, 7.5);
        assert_eq!(s.p50_ms, 7.5);
        assert_eq!(s.p999_ms, 7.5);
    }

    #[test]
    fn test_summary_with_duplicates() {
        let s = summary(vec![2.0, 1.0, 2.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(s.p50_ms, 2.0);
    }

    #[test]
    fn test_summary_tail_outlier() {
        let mut values = vec![30.0; 999];
        values.push(1500.0);
        let s = summary(values);

        assert_eq!(s.p50_ms, 30.0);
        assert_eq!(s.p99_ms, 30.0);
        assert!(s.p999_ms > 30.0 && s.p999_ms < 1500.0);
        assert!(s.mean_ms > 30.0);
    }

    #[test]
    fn test_summary_serializes_sample_count_as_samples_ok() {
        let s = summary(vec![1.0]);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["samples_ok"], 1);
        assert_eq!(json["p999_ms"], 1.0);
    }
}
