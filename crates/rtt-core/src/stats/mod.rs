//! Statistical analysis of RTT samples
//!
//! This module provides the percentile summary reported for each run and the
//! empirical cumulative distribution used for plotting.
//!
//! # Examples
//!
//! ```
//! use rtt_core::stats::{ChartSeries, SampleSet, StatsSummary};
//!
//! let samples = SampleSet::new(vec![30.0, 10.0, 50.0, 20.0, 40.0]).unwrap();
//!
//! let summary = StatsSummary::from_samples(&samples);
//! assert_eq!(summary.mean_ms, 30.0);
//! assert_eq!(summary.p50_ms, 30.0);
//!
//! let chart = ChartSeries::from_samples(&samples);
//! assert_eq!(chart.y, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
//! ```

pub mod ecdf;
pub mod percentiles;

pub use ecdf::ChartSeries;
pub use percentiles::{percentile, StatsSummary};

/// Non-empty, ascending sequence of RTT samples in milliseconds.
///
/// Construction is the only place samples are sorted, so every consumer can
/// rely on order statistics being positional.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet(Vec<f64>);

impl SampleSet {
    /// Sort `values` ascending. Returns `None` for an empty input.
    pub fn new(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.0[0]
    }

    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }
}
