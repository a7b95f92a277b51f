//! Console reporter
//!
//! Provides human-readable output with ASCII tables and change indicators.

use anyhow::Result;
use std::fmt::Write;

use crate::analysis::AnalysisResult;
use crate::ledger::{History, LedgerRow, Metric};

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a single analysis
    pub fn format_analysis(result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                       RTT ANALYSIS                           ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Source:      {}", result.base_name)?;
        writeln!(output, "Samples:     {}", result.stats.sample_count)?;
        writeln!(output, "Output dir:  {}", result.output_dir.display())?;
        writeln!(output, "History:     {}", result.comparison_file_path.display())?;
        writeln!(output)?;

        writeln!(output, "  ┌─────────┬────────────┬────────────┬──────────┐")?;
        writeln!(output, "  │ Metric  │  Current   │  Previous  │  Change  │")?;
        writeln!(output, "  ├─────────┼────────────┼────────────┼──────────┤")?;

        for metric in Metric::ALL {
            let current = format!("{:.2} ms", result.stats.metric(metric));
            let (previous, change) = match &result.comparison {
                Some(cmp) => {
                    let delta = cmp.get(metric);
                    (
                        format!("{:.2} ms", delta.previous_value),
                        format_change(delta.percent_change),
                    )
                }
                None => ("-".to_string(), "-".to_string()),
            };
            writeln!(
                output,
                "  │ {:<7} │ {:>10} │ {:>10} │ {:>8} │",
                metric.label(),
                current,
                previous,
                change
            )?;
        }

        writeln!(output, "  └─────────┴────────────┴────────────┴──────────┘")?;
        if result.comparison.is_none() {
            writeln!(output)?;
            writeln!(output, "  No previous run recorded; nothing to compare against.")?;
        }
        writeln!(output)?;

        Ok(output)
    }

    /// Format ledger history as a table with row indices
    ///
    /// Indices always refer to positions in the full ledger, so they can be
    /// passed straight to merge or delete.
    pub fn format_history(history: &History, show_all: bool) -> Result<String> {
        let mut output = String::new();

        if history.all.is_empty() {
            writeln!(output, "No runs recorded yet.")?;
            return Ok(output);
        }

        let rows = if show_all { &history.all } else { &history.recent };
        let offset = history.all.len() - rows.len();

        writeln!(
            output,
            "Showing {} of {} recorded runs",
            rows.len(),
            history.all.len()
        )?;
        writeln!(output)?;
        writeln!(
            output,
            "{:>5}  {:<11}  {:<20}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
            "#", "Time", "Source", "Mean", "P50", "P90", "P99", "P99.9"
        )?;
        writeln!(output, "{}", "─".repeat(98))?;

        for (i, row) in rows.iter().enumerate() {
            Self::format_row(&mut output, offset + i, row)?;
        }

        Ok(output)
    }

    fn format_row(output: &mut String, index: usize, row: &LedgerRow) -> Result<()> {
        let cell = |metric: Metric| match row.metric(metric) {
            Some(v) => format!("{:.2}", v),
            None => "-".to_string(),
        };

        writeln!(
            output,
            "{:>5}  {:<11}  {:<20}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
            index,
            row.timestamp.as_deref().unwrap_or("-"),
            truncate(row.source_file.as_deref().unwrap_or("-"), 20),
            cell(Metric::Mean),
            cell(Metric::P50),
            cell(Metric::P90),
            cell(Metric::P99),
            cell(Metric::P999),
        )?;
        Ok(())
    }
}

fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("↑ {:.1}%", change)
    } else if change < 0.0 {
        format!("↓ {:.1}%", change.abs())
    } else {
        "0.0%".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars - 1).collect();
        out.push('…');
        out
    }
}
