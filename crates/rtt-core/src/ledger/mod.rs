//! Persistent history of analyzed runs
//!
//! The ledger is a CSV table with one row per run:
//!
//! ```text
//! timestamp,source_file,mean_ms,p50_ms,p90_ms,p99_ms,p999_ms
//! "10/16 09:30","edge-1",31.42,30.07,41.88,57.3,81.05
//! ```
//!
//! Appends come from analyses; merges and deletes are operator curation.

pub mod row;
pub mod store;

pub use row::{round2, LedgerRow, Metric, HEADER, TIMESTAMP_FORMAT};
pub use store::{History, LedgerStore, LoadReport, DEFAULT_RECENT_LIMIT};
