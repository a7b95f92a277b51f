//! On-disk history ledger.
//!
//! Every operation is a full load-modify-persist cycle over a small CSV file.
//! Loading cleans the table: blank rows and rows without any metric are
//! dropped and counted, never reported as errors. Writes go to a temporary
//! file in the ledger's directory which is then renamed over the ledger.
//!
//! Rows are addressed by their position in the cleaned view returned by
//! [`LedgerStore::load`]. Positions are only meaningful until the next
//! mutation, so [`LedgerStore::merge_rows`] and [`LedgerStore::delete_rows`]
//! validate them against a fresh load every time.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use super::row::{LedgerRow, Metric, HEADER};
use crate::error::{Result, RttError};

/// Number of rows in the "recent" view when the caller has no preference.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Metric cells that read as missing. Text columns only treat an empty cell
/// as missing, so a run named `NA` stays a name.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "None"];

/// Result of loading the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Header names as found in the file (empty if the file does not exist)
    pub columns: Vec<String>,
    /// Valid rows in file order
    pub rows: Vec<LedgerRow>,
    /// Rows dropped because they were blank or carried no metric
    pub purged: usize,
}

/// Display and trend views of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Last `limit` rows, for tabular display
    #[serde(rename = "rows")]
    pub recent: Vec<LedgerRow>,
    pub columns: Vec<String>,
    /// Every valid row; positions here are the ones merge/delete accept
    #[serde(rename = "all_rows")]
    pub all: Vec<LedgerRow>,
}

/// Handle to the ledger file at a fixed path.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and clean the ledger. A missing file is an empty ledger.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<LoadReport> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadReport::default()),
            Err(e) => return Err(e.into()),
        };

        let report = parse_ledger(io::BufReader::new(file))?;
        if report.purged > 0 {
            warn!(purged = report.purged, "dropped malformed ledger rows");
        }
        debug!(rows = report.rows.len(), "loaded ledger");
        Ok(report)
    }

    /// The most recent valid row, if any.
    pub fn last_row(&self) -> Result<Option<LedgerRow>> {
        Ok(self.load()?.rows.pop())
    }

    /// Append `row` and persist. Returns the ledger length after the append.
    ///
    /// An unreadable ledger never blocks a new measurement: the table is
    /// restarted with `row` as its only entry.
    #[instrument(skip(self, row), fields(path = %self.path.display()))]
    pub fn append(&self, row: LedgerRow) -> Result<usize> {
        let mut rows = match self.load() {
            Ok(report) => report.rows,
            Err(e) => {
                warn!(error = %e, "existing ledger unreadable, starting fresh");
                Vec::new()
            }
        };

        rows.push(row);
        self.persist(&rows)?;
        info!(rows = rows.len(), "appended ledger row");
        Ok(rows.len())
    }

    /// Recent and full views of the cleaned ledger.
    pub fn list(&self, limit: usize) -> Result<History> {
        let LoadReport { columns, rows, .. } = self.load()?;
        let start = rows.len().saturating_sub(limit);
        Ok(History {
            recent: rows[start..].to_vec(),
            columns,
            all: rows,
        })
    }

    /// Replace the rows at `indices` with `merged` (appended at the end).
    ///
    /// The store does not compute `merged`; see [`LedgerRow::average`].
    ///
    /// # Errors
    ///
    /// - [`RttError::NotFound`] if the ledger file does not exist
    /// - [`RttError::InsufficientRows`] for fewer than two distinct indices
    /// - [`RttError::InvalidIndex`] if any index is out of range; nothing is written
    #[instrument(skip(self, merged), fields(path = %self.path.display()))]
    pub fn merge_rows(&self, indices: &[usize], merged: LedgerRow) -> Result<()> {
        let mut rows = self.load_for_update(indices, 2)?;
        let targets = validate_indices(indices, rows.len(), 2)?;

        for idx in targets.iter().rev() {
            rows.remove(*idx);
        }
        rows.push(merged);

        self.persist(&rows)?;
        info!(merged = targets.len(), rows = rows.len(), "merged ledger rows");
        Ok(())
    }

    /// Remove the rows at `indices`.
    ///
    /// # Errors
    ///
    /// Same as [`LedgerStore::merge_rows`], with at least one index required.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn delete_rows(&self, indices: &[usize]) -> Result<()> {
        let mut rows = self.load_for_update(indices, 1)?;
        let targets = validate_indices(indices, rows.len(), 1)?;

        for idx in targets.iter().rev() {
            rows.remove(*idx);
        }

        self.persist(&rows)?;
        info!(deleted = targets.len(), rows = rows.len(), "deleted ledger rows");
        Ok(())
    }

    /// Remove the ledger file entirely. A missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "cleared ledger");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn load_for_update(&self, indices: &[usize], required: usize) -> Result<Vec<LedgerRow>> {
        if !self.exists() {
            return Err(RttError::NotFound(self.path.clone()));
        }
        if indices.len() < required {
            return Err(RttError::InsufficientRows {
                required,
                supplied: indices.len(),
            });
        }
        Ok(self.load()?.rows)
    }

    /// Rewrite the whole ledger through a temp file and rename.
    fn persist(&self, rows: &[LedgerRow]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(encode_ledger(rows).as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Sorted, de-duplicated indices after range checking.
fn validate_indices(indices: &[usize], len: usize, required: usize) -> Result<Vec<usize>> {
    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
        return Err(RttError::InvalidIndex { index, len });
    }

    let unique: BTreeSet<usize> = indices.iter().copied().collect();
    if unique.len() < required {
        return Err(RttError::InsufficientRows {
            required,
            supplied: unique.len(),
        });
    }
    Ok(unique.into_iter().collect())
}

/// Parse a ledger table, matching columns by header name.
///
/// Headers and metric cells are trimmed. Text cells are kept byte for byte.
pub(crate) fn parse_ledger<R: Read>(reader: R) -> Result<LoadReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let position = |name: &str| columns.iter().position(|c| c == name);

    let timestamp_col = position("timestamp");
    let source_col = position("source_file");
    let metric_cols: Vec<(Metric, Option<usize>)> = Metric::ALL
        .iter()
        .map(|m| (*m, position(m.column())))
        .collect();

    let mut report = LoadReport {
        columns: columns.clone(),
        ..Default::default()
    };

    for record in csv_reader.records() {
        let record = record?;
        let text = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let number = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !MISSING_MARKERS.contains(s))
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let mut row = LedgerRow {
            timestamp: text(timestamp_col),
            source_file: text(source_col),
            ..Default::default()
        };
        for (metric, col) in &metric_cols {
            row.set_metric(*metric, number(*col));
        }

        if row.is_valid() {
            report.rows.push(row);
        } else {
            report.purged += 1;
        }
    }

    Ok(report)
}

pub(crate) fn encode_ledger(rows: &[LedgerRow]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.to_csv_line());
        out.push('\n');
    }
    out
}
