//! Sample loading from delimited RTT capture files.
//!
//! Capture files carry one RTT measurement per row in seconds. Only the
//! designated column is read; every other column is ignored.
//!
//! ```text
//! seq,RTT,host
//! 1,0.031250,edge-1
//! 2,,edge-1          <- missing, dropped
//! 3,0.029875,edge-2
//! ```

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{Result, RttError};
use crate::stats::SampleSet;

/// Column read when the caller does not name one.
pub const DEFAULT_COLUMN: &str = "RTT";

/// Raw captures are recorded in seconds.
const SECONDS_TO_MS: f64 = 1e3;

/// Cell contents that count as "no measurement" rather than a bad value.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "#N/A", "NaN", "nan", "-nan", "null", "NULL", "None", "<NA>",
];

/// Reads one column of RTT samples out of a CSV file.
#[derive(Debug, Clone)]
pub struct SampleLoader {
    column: String,
}

impl Default for SampleLoader {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN)
    }
}

impl SampleLoader {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Load, convert to milliseconds and sort the samples in `path`.
    ///
    /// # Errors
    ///
    /// - [`RttError::NotFound`] if `path` does not exist
    /// - [`RttError::MissingColumn`] if the header lacks the designated column
    /// - [`RttError::MalformedSample`] if a non-empty cell is not a finite number
    /// - [`RttError::EmptyData`] if no samples remain after dropping missing cells
    pub fn load(&self, path: &Path) -> Result<SampleSet> {
        let values = self.read_file(path)?;
        into_sample_set(values, path)
    }

    /// Like [`SampleLoader::load`], but copies `path` into `output_dir` once
    /// its column has parsed.
    ///
    /// A capture whose header or cells are unreadable is never copied. One
    /// that parses but holds no samples is copied before `EmptyData` is
    /// returned.
    pub fn load_preserving(&self, path: &Path, output_dir: &Path) -> Result<SampleSet> {
        let values = self.read_file(path)?;
        preserve_source(path, output_dir)?;
        into_sample_set(values, path)
    }

    #[instrument(skip(self), fields(column = %self.column))]
    fn read_file(&self, path: &Path) -> Result<Vec<f64>> {
        if !path.exists() {
            return Err(RttError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let values = self.read_values(BufReader::new(file), path)?;
        debug!(samples = values.len(), "read RTT column");
        Ok(values)
    }

    /// Parse the designated column from `reader`, returning milliseconds in
    /// file order. `path` is only used for error messages.
    pub fn read_values<R: Read>(&self, reader: R, path: &Path) -> Result<Vec<f64>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let position = csv_reader
            .headers()?
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == self.column)
            .ok_or_else(|| RttError::MissingColumn {
                column: self.column.clone(),
                path: path.to_path_buf(),
            })?;

        let mut values = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let cell = record.get(position).unwrap_or("");
            if MISSING_MARKERS.contains(&cell) {
                continue;
            }

            let seconds: f64 = cell.parse().map_err(|_| RttError::MalformedSample {
                row: idx + 1,
                value: cell.to_string(),
            })?;
            if seconds.is_nan() {
                continue;
            }
            if seconds.is_infinite() {
                return Err(RttError::MalformedSample {
                    row: idx + 1,
                    value: cell.to_string(),
                });
            }

            values.push(seconds * SECONDS_TO_MS);
        }

        Ok(values)
    }
}

/// Copy `source` into `output_dir`, keeping an existing copy untouched.
///
/// Returns the destination path.
pub fn preserve_source(source: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| RttError::NotFound(source.to_path_buf()))?;
    let dest = output_dir.join(file_name);

    if dest.exists() {
        debug!(dest = %dest.display(), "source copy already present");
    } else {
        fs::copy(source, &dest)?;
        debug!(dest = %dest.display(), "preserved source file");
    }

    Ok(dest)
}

fn into_sample_set(values: Vec<f64>, path: &Path) -> Result<SampleSet> {
    SampleSet::new(values).ok_or_else(|| RttError::EmptyData(display_name(path)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
