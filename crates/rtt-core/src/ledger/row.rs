//! Ledger row model and its CSV encoding.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::stats::StatsSummary;

/// Header written at the top of every ledger file.
pub const HEADER: [&str; 7] = [
    "timestamp",
    "source_file",
    "mean_ms",
    "p50_ms",
    "p90_ms",
    "p99_ms",
    "p999_ms",
];

/// Ledger timestamps carry no year and no seconds.
pub const TIMESTAMP_FORMAT: &str = "%m/%d %H:%M";

/// The five latency metrics tracked per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Mean,
    P50,
    P90,
    P99,
    P999,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Mean,
        Metric::P50,
        Metric::P90,
        Metric::P99,
        Metric::P999,
    ];

    /// Ledger column (and JSON key) for this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Mean => "mean_ms",
            Metric::P50 => "p50_ms",
            Metric::P90 => "p90_ms",
            Metric::P99 => "p99_ms",
            Metric::P999 => "p999_ms",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Mean => "Mean",
            Metric::P50 => "P50",
            Metric::P90 => "P90",
            Metric::P99 => "P99",
            Metric::P999 => "P99.9",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl StatsSummary {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Mean => self.mean_ms,
            Metric::P50 => self.p50_ms,
            Metric::P90 => self.p90_ms,
            Metric::P99 => self.p99_ms,
            Metric::P999 => self.p999_ms,
        }
    }
}

/// One persisted run summary.
///
/// Every field is optional because the ledger is a plain file that may be
/// edited by hand; missing cells stay `None` rather than becoming zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerRow {
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub source_file: Option<String>,
    pub mean_ms: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p90_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub p999_ms: Option<f64>,
}

impl LedgerRow {
    /// Build the row recorded for an analyzed run, rounding every metric to
    /// two decimals.
    pub fn from_summary(
        summary: &StatsSummary,
        timestamp: impl Into<String>,
        source_file: impl Into<String>,
    ) -> Self {
        let mut row = LedgerRow {
            timestamp: Some(timestamp.into()),
            source_file: Some(source_file.into()),
            ..Default::default()
        };
        for metric in Metric::ALL {
            row.set_metric(metric, Some(round2(summary.metric(metric))));
        }
        row
    }

    /// Average the metrics of `rows` into a single row.
    ///
    /// Missing cells are skipped per metric; a metric missing from every row
    /// stays missing. Source names are joined with `+`.
    pub fn average(rows: &[LedgerRow], timestamp: impl Into<String>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let names: Vec<&str> = rows
            .iter()
            .filter_map(|r| r.source_file.as_deref())
            .filter(|s| !s.is_empty())
            .collect();

        let mut merged = LedgerRow {
            timestamp: Some(timestamp.into()),
            source_file: (!names.is_empty()).then(|| names.join("+")),
            ..Default::default()
        };

        for metric in Metric::ALL {
            let present: Vec<f64> = rows.iter().filter_map(|r| r.metric(metric)).collect();
            if !present.is_empty() {
                let mean = present.iter().sum::<f64>() / present.len() as f64;
                merged.set_metric(metric, Some(round2(mean)));
            }
        }

        Some(merged)
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Mean => self.mean_ms,
            Metric::P50 => self.p50_ms,
            Metric::P90 => self.p90_ms,
            Metric::P99 => self.p99_ms,
            Metric::P999 => self.p999_ms,
        }
    }

    pub fn set_metric(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::Mean => &mut self.mean_ms,
            Metric::P50 => &mut self.p50_ms,
            Metric::P90 => &mut self.p90_ms,
            Metric::P99 => &mut self.p99_ms,
            Metric::P999 => &mut self.p999_ms,
        };
        *slot = value;
    }

    /// `true` when at least one metric cell holds a value.
    pub fn has_metrics(&self) -> bool {
        Metric::ALL.iter().any(|m| self.metric(*m).is_some())
    }

    /// `true` when every cell is missing.
    pub fn is_blank(&self) -> bool {
        self.timestamp.is_none() && self.source_file.is_none() && !self.has_metrics()
    }

    /// A row worth keeping: not blank and carrying at least one metric.
    pub fn is_valid(&self) -> bool {
        !self.is_blank() && self.has_metrics()
    }

    /// Encode as one CSV line (no terminator). Text fields are always
    /// quoted so numeric-looking file names stay text for other readers.
    pub(crate) fn to_csv_line(&self) -> String {
        let mut fields = Vec::with_capacity(HEADER.len());
        fields.push(quote_text(self.timestamp.as_deref()));
        fields.push(quote_text(self.source_file.as_deref()));
        for metric in Metric::ALL {
            fields.push(format_number(self.metric(metric)));
        }
        fields.join(",")
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn quote_text(value: Option<&str>) -> String {
    match value {
        Some(s) => format!("\"{}\"", s.replace('"', "\"\"")),
        None => String::new(),
    }
}

fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:?}", v),
        _ => String::new(),
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|v| match v {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(i) => i.to_string(),
            TextOrNumber::Float(f) => f.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(name: &str, values: [Option<f64>; 5]) -> LedgerRow {
        let mut row = LedgerRow {
            timestamp: Some("01/02 03:04".into()),
            source_file: Some(name.into()),
            ..Default::default()
        };
        for (metric, value) in Metric::ALL.into_iter().zip(values) {
            row.set_metric(metric, value);
        }
        row
    }

    #[test]
    fn test_from_summary_rounds() {
        let summary = StatsSummary {
            mean_ms: 30.456,
            p50_ms: 29.994,
            p90_ms: 41.0,
            p99_ms: 55.125,
            p999_ms: 80.0049,
            sample_count: 100,
        };
        let row = LedgerRow::from_summary(&summary, "10/16 09:30", "run1");

        assert_eq!(row.mean_ms, Some(30.46));
        assert_eq!(row.p50_ms, Some(29.99));
        assert_eq!(row.p90_ms, Some(41.0));
        assert_eq!(row.p999_ms, Some(80.0));
        assert_eq!(row.source_file.as_deref(), Some("run1"));
    }

    #[test]
    fn test_validity() {
        assert!(LedgerRow::default().is_blank());
        assert!(!LedgerRow::default().is_valid());

        let labels_only = row("a", [None; 5]);
        assert!(!labels_only.is_blank());
        assert!(!labels_only.is_valid());

        let one_metric = row("a", [None, None, Some(1.0), None, None]);
        assert!(one_metric.is_valid());
    }

    #[test]
    fn test_csv_line_quotes_text() {
        let line = row("2024", [Some(30.0), Some(29.5), None, Some(40.25), Some(50.0)])
            .to_csv_line();
        assert_eq!(line, "\"01/02 03:04\",\"2024\",30.0,29.5,,40.25,50.0");
    }

    #[test]
    fn test_csv_line_escapes_quotes() {
        let mut r = row("say \"hi\"", [Some(1.0); 5]);
        r.timestamp = None;
        assert_eq!(r.to_csv_line(), ",\"say \"\"hi\"\"\",1.0,1.0,1.0,1.0,1.0");
    }

    #[test]
    fn test_average() {
        let rows = vec![
            row("a", [Some(10.0), Some(20.0), None, Some(1.0), None]),
            row("b", [Some(20.0), Some(30.0), None, Some(2.0), None]),
            row("c", [Some(33.0), Some(40.0), None, None, None]),
        ];
        let merged = LedgerRow::average(&rows, "10/16 10:00").unwrap();

        assert_eq!(merged.source_file.as_deref(), Some("a+b+c"));
        assert_eq!(merged.mean_ms, Some(21.0));
        assert_eq!(merged.p50_ms, Some(30.0));
        assert_eq!(merged.p90_ms, None);
        assert_eq!(merged.p99_ms, Some(1.5));
        assert_eq!(merged.timestamp.as_deref(), Some("10/16 10:00"));
        assert!(LedgerRow::average(&[], "x").is_none());
    }

    #[test]
    fn test_deserialize_numeric_source_file() {
        let row: LedgerRow =
            serde_json::from_str(r#"{"source_file": 2024, "mean_ms": 1.5}"#).unwrap();
        assert_eq!(row.source_file.as_deref(), Some("2024"));
        assert_eq!(row.mean_ms, Some(1.5));
        assert_eq!(row.timestamp, None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(30.0), 30.0);
    }
}
