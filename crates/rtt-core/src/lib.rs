//! RTT latency analysis and history ledger
//!
//! This crate turns RTT capture files into latency summaries and keeps a
//! durable history of past runs so each new run can be compared with the one
//! before it.
//!
//! # Features
//!
//! - **Sample loading**: One CSV column of RTTs in seconds, missing cells dropped
//! - **Statistics**: Mean and interpolated p50/p90/p99/p99.9, plus ECDF coordinates
//! - **Comparison**: Percent change against the previous run, clamped for degenerate inputs
//! - **Ledger**: Self-cleaning CSV history with append, merge, delete and clear
//!
//! # Example
//!
//! ```no_run
//! use rtt_core::{AppPaths, Analyzer, LedgerStore};
//! use std::path::Path;
//!
//! # fn example() -> rtt_core::Result<()> {
//! let paths = AppPaths::resolve(None)?;
//! let analyzer = Analyzer::new(LedgerStore::new(&paths.ledger_file));
//!
//! let result = analyzer.analyze(Path::new("capture.csv"), None)?;
//! println!("p99 = {:.2} ms", result.stats.p99_ms);
//!
//! if let Some(cmp) = &result.comparison {
//!     println!("p99 changed by {:+.1}%", cmp.p99_ms.percent_change);
//! }
//!
//! // Curate history: average the two oldest runs into one row.
//! let store = analyzer.ledger();
//! let history = store.list(10)?;
//! if let Some(merged) = rtt_core::LedgerRow::average(&history.all[..2], "10/16 12:00") {
//!     store.merge_rows(&[0, 1], merged)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod compare;
pub mod config;
pub mod error;
pub mod ledger;
pub mod loader;
pub mod paths;
pub mod reporter;
pub mod stats;

// Re-export main types for convenience
pub use analysis::{AnalysisResult, Analyzer};
pub use compare::{Comparison, MetricDelta};
pub use config::UserConfig;
pub use error::{Result, RttError};
pub use ledger::{History, LedgerRow, LedgerStore, LoadReport, Metric};
pub use loader::SampleLoader;
pub use paths::AppPaths;
pub use stats::{ChartSeries, SampleSet, StatsSummary};
