//! Rendering analysis results and ledger history
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable format, compact or pretty-printed
//! - **Console**: Human-readable tables with change indicators
//!
//! # Example
//!
//! ```no_run
//! use rtt_core::reporter::{OutputFormat, Reporter};
//! use rtt_core::{Analyzer, LedgerStore};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let analyzer = Analyzer::new(LedgerStore::new("comparisons.csv"));
//! let result = analyzer.analyze(Path::new("capture.csv"), None)?;
//!
//! Reporter::new(OutputFormat::Console).report_analysis(&result)?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::Result;
use std::io::{self, Write};
use std::str::FromStr;

use crate::analysis::AnalysisResult;
use crate::ledger::History;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console tables
    #[default]
    Console,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "pretty" => Ok(OutputFormat::JsonPretty),
            "console" | "text" => Ok(OutputFormat::Console),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Formats results in the configured output format
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print an analysis to stdout
    pub fn report_analysis(&self, result: &AnalysisResult) -> Result<()> {
        emit(&self.format_analysis(result)?)
    }

    /// Print ledger history to stdout
    pub fn report_history(&self, history: &History, show_all: bool) -> Result<()> {
        emit(&self.format_history(history, show_all)?)
    }

    pub fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(result, false),
            OutputFormat::JsonPretty => JsonReporter::format(result, true),
            OutputFormat::Console => ConsoleReporter::format_analysis(result),
        }
    }

    pub fn format_history(&self, history: &History, show_all: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(history, false),
            OutputFormat::JsonPretty => JsonReporter::format(history, true),
            OutputFormat::Console => ConsoleReporter::format_history(history, show_all),
        }
    }
}

fn emit(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
