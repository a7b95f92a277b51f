//! Single-file analysis
//!
//! Composes the loader, statistics, comparison and ledger into the one
//! operation callers use:
//!
//! ```text
//! capture.csv ──► SampleLoader ──► StatsSummary + ChartSeries
//!                                      │
//!                 LedgerStore::last_row ──► compare ──► Comparison
//!                                      │
//!                 LedgerStore::append(row rounded to 2 decimals)
//! ```
//!
//! Any loader failure returns before the ledger is touched. The capture is
//! copied into its results directory only once its RTT column has parsed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::compare::{compare, Comparison};
use crate::error::{Result, RttError};
use crate::ledger::{LedgerRow, LedgerStore, TIMESTAMP_FORMAT};
use crate::loader::SampleLoader;
use crate::stats::{ChartSeries, StatsSummary};

/// Everything produced by analyzing one capture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Full-precision statistics
    pub stats: StatsSummary,
    /// ECDF coordinates
    pub chart_data: ChartSeries,
    /// Per-analysis directory holding the preserved source copy
    pub output_dir: PathBuf,
    /// Ledger the run was recorded in
    #[serde(rename = "comparison_file")]
    pub comparison_file_path: PathBuf,
    /// File stem of the analyzed capture
    pub base_name: String,
    /// Deltas against the previous run, if there was one
    pub comparison: Option<Comparison>,
}

/// Runs analyses and records them in a ledger.
#[derive(Debug, Clone)]
pub struct Analyzer {
    loader: SampleLoader,
    ledger: LedgerStore,
}

impl Analyzer {
    pub fn new(ledger: LedgerStore) -> Self {
        Self {
            loader: SampleLoader::default(),
            ledger,
        }
    }

    pub fn with_loader(mut self, loader: SampleLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Analyze `path`, stamping the ledger row with the local time.
    pub fn analyze(&self, path: &Path, output_base: Option<&Path>) -> Result<AnalysisResult> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.analyze_with_timestamp(path, output_base, &timestamp)
    }

    /// Analyze `path` with an explicit ledger timestamp.
    #[instrument(skip(self, output_base, timestamp), fields(path = %path.display()))]
    pub fn analyze_with_timestamp(
        &self,
        path: &Path,
        output_base: Option<&Path>,
        timestamp: &str,
    ) -> Result<AnalysisResult> {
        if !path.is_file() {
            return Err(RttError::NotFound(path.to_path_buf()));
        }

        let base_name = base_name(path);
        let output_dir = resolve_output_base(path, output_base).join(format!("{base_name}_results"));
        fs::create_dir_all(&output_dir)?;

        let samples = self.loader.load_preserving(path, &output_dir)?;
        let stats = StatsSummary::from_samples(&samples);
        let chart_data = ChartSeries::from_samples(&samples);

        let previous = match self.ledger.last_row() {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "could not read previous run, skipping comparison");
                None
            }
        };
        let comparison = compare(&stats, previous.as_ref());

        self.ledger
            .append(LedgerRow::from_summary(&stats, timestamp, base_name.as_str()))?;

        info!(
            base_name = %base_name,
            samples = stats.sample_count,
            p50_ms = stats.p50_ms,
            p99_ms = stats.p99_ms,
            "analysis complete"
        );

        Ok(AnalysisResult {
            stats,
            chart_data,
            output_dir,
            comparison_file_path: self.ledger.path().to_path_buf(),
            base_name,
            comparison,
        })
    }
}

/// Directory under which `<base_name>_results` is created.
///
/// The override wins only when it is non-blank and an existing directory;
/// otherwise the source file's own directory is used.
pub fn resolve_output_base(source: &Path, output_base: Option<&Path>) -> PathBuf {
    if let Some(dir) = output_base {
        let blank = dir.as_os_str().to_string_lossy().trim().is_empty();
        if !blank && dir.is_dir() {
            return dir.to_path_buf();
        }
    }

    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_base_prefers_existing_override() {
        let dir = tempfile::tempdir().unwrap();
        let source = Path::new("/data/captures/run.csv");

        assert_eq!(resolve_output_base(source, Some(dir.path())), dir.path());
    }

    #[test]
    fn test_resolve_output_base_falls_back_to_source_dir() {
        let source = Path::new("/data/captures/run.csv");
        let expected = PathBuf::from("/data/captures");

        assert_eq!(resolve_output_base(source, None), expected);
        assert_eq!(resolve_output_base(source, Some(Path::new("   "))), expected);
        assert_eq!(
            resolve_output_base(source, Some(Path::new("/no/such/dir"))),
            expected
        );
        assert_eq!(resolve_output_base(Path::new("run.csv"), None), PathBuf::from("."));
    }

    #[test]
    fn test_base_name_strips_extension() {
        assert_eq!(base_name(Path::new("/a/b/2024.csv")), "2024");
        assert_eq!(base_name(Path::new("trace.tar.csv")), "trace.tar");
    }
}
