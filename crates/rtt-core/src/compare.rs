//! Run-over-run comparison against the last ledger row.

use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerRow, Metric};
use crate::stats::StatsSummary;

/// Previous value of one metric and the signed change to the current run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// Value recorded in the previous row; `0.0` if that cell was missing
    #[serde(rename = "value")]
    pub previous_value: f64,
    /// Percent change from previous to current; degenerate inputs give `0.0`
    #[serde(rename = "change")]
    pub percent_change: f64,
}

/// Per-metric deltas, keyed like the ledger columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub mean_ms: MetricDelta,
    pub p50_ms: MetricDelta,
    pub p90_ms: MetricDelta,
    pub p99_ms: MetricDelta,
    pub p999_ms: MetricDelta,
}

impl Comparison {
    pub fn get(&self, metric: Metric) -> &MetricDelta {
        match metric {
            Metric::Mean => &self.mean_ms,
            Metric::P50 => &self.p50_ms,
            Metric::P90 => &self.p90_ms,
            Metric::P99 => &self.p99_ms,
            Metric::P999 => &self.p999_ms,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricDelta)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// `(current - previous) / previous * 100`, clamped to `0.0` whenever either
/// side is missing, `previous` is zero, or the result is not finite.
pub fn percent_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    let (Some(current), Some(previous)) = (current, previous) else {
        return 0.0;
    };
    if current.is_nan() || previous.is_nan() || previous == 0.0 {
        return 0.0;
    }

    let change = (current - previous) / previous * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Compare a fresh summary with the row recorded before it.
///
/// Returns `None` when there is no previous row.
pub fn compare(current: &StatsSummary, previous: Option<&LedgerRow>) -> Option<Comparison> {
    let previous = previous?;
    let delta = |metric: Metric| {
        let prev = previous.metric(metric);
        MetricDelta {
            previous_value: prev.filter(|v| v.is_finite()).unwrap_or(0.0),
            percent_change: percent_change(Some(current.metric(metric)), prev),
        }
    };

    Some(Comparison {
        mean_ms: delta(Metric::Mean),
        p50_ms: delta(Metric::P50),
        p90_ms: delta(Metric::P90),
        p99_ms: delta(Metric::P99),
        p999_ms: delta(Metric::P999),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(value: f64) -> StatsSummary {
        StatsSummary {
            mean_ms: value,
            p50_ms: value,
            p90_ms: value,
            p99_ms: value,
            p999_ms: value,
            sample_count: 1,
        }
    }

    #[test]
    fn test_percent_change_basic() {
        assert!((percent_change(Some(110.0), Some(100.0)) - 10.0).abs() < 1e-9);
        assert!((percent_change(Some(90.0), Some(100.0)) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_degenerate_inputs() {
        assert_eq!(percent_change(Some(5.0), Some(0.0)), 0.0);
        assert_eq!(percent_change(Some(5.0), None), 0.0);
        assert_eq!(percent_change(None, Some(5.0)), 0.0);
        assert_eq!(percent_change(Some(f64::NAN), Some(5.0)), 0.0);
        assert_eq!(percent_change(Some(f64::INFINITY), Some(5.0)), 0.0);
        assert_eq!(percent_change(Some(1.0), Some(f64::MIN_POSITIVE)), 0.0);
    }

    #[test]
    fn test_compare_without_previous() {
        assert!(compare(&summary(1.0), None).is_none());
    }

    #[test]
    fn test_compare_against_previous() {
        let previous = LedgerRow {
            mean_ms: Some(20.0),
            p50_ms: Some(0.0),
            p90_ms: None,
            p99_ms: Some(40.0),
            p999_ms: Some(30.0),
            ..Default::default()
        };
        let cmp = compare(&summary(30.0), Some(&previous)).unwrap();

        assert_eq!(cmp.mean_ms.previous_value, 20.0);
        assert_eq!(cmp.mean_ms.percent_change, 50.0);
        assert_eq!(cmp.p50_ms.percent_change, 0.0);
        assert_eq!(cmp.p90_ms.previous_value, 0.0);
        assert_eq!(cmp.p90_ms.percent_change, 0.0);
        assert_eq!(cmp.p99_ms.percent_change, -25.0);
        assert_eq!(cmp.p999_ms.percent_change, 0.0);
        assert_eq!(cmp.iter().count(), 5);
    }

    #[test]
    fn test_comparison_json_keys() {
        let previous = LedgerRow {
            mean_ms: Some(10.0),
            ..Default::default()
        };
        let cmp = compare(&summary(15.0), Some(&previous)).unwrap();
        let json = serde_json::to_value(cmp).unwrap();

        assert_eq!(json["mean_ms"]["value"], 10.0);
        assert_eq!(json["mean_ms"]["change"], 50.0);
    }
}
