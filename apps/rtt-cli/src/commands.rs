//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Local;
use rtt_core::ledger::TIMESTAMP_FORMAT;
use rtt_core::reporter::{JsonReporter, OutputFormat, Reporter};
use rtt_core::{AppPaths, Analyzer, LedgerRow, LedgerStore, RttError, SampleLoader, UserConfig};
use tracing::debug;

/// Resolved data directory shared by every subcommand.
pub struct Context {
    pub paths: AppPaths,
}

impl Context {
    pub fn open(data_dir: Option<&Path>) -> Result<Self> {
        let paths = AppPaths::resolve(data_dir).context("failed to prepare the data directory")?;
        debug!(data_dir = %paths.data_dir.display(), "using data directory");
        Ok(Self { paths })
    }

    fn ledger(&self) -> LedgerStore {
        LedgerStore::new(&self.paths.ledger_file)
    }

    fn config(&self) -> Result<UserConfig> {
        UserConfig::load(&self.paths.config_file)
            .with_context(|| format!("failed to read {}", self.paths.config_file.display()))
    }
}

pub fn analyze(
    ctx: &Context,
    file: &Path,
    output_dir: Option<&Path>,
    column: &str,
    format: OutputFormat,
) -> Result<()> {
    let config = ctx.config()?;
    let output_base = output_dir.or_else(|| config.output_base());

    let analyzer = Analyzer::new(ctx.ledger()).with_loader(SampleLoader::new(column));
    let result = analyzer
        .analyze(file, output_base)
        .with_context(|| format!("failed to analyze {}", file.display()))?;

    Reporter::new(format).report_analysis(&result)
}

pub fn history(ctx: &Context, limit: usize, all: bool, format: OutputFormat) -> Result<()> {
    let history = ctx.ledger().list(limit)?;
    Reporter::new(format).report_history(&history, all)
}

pub fn merge(ctx: &Context, indices: &[usize]) -> Result<()> {
    let ledger = ctx.ledger();
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let (merged, count) = merged_row(&ledger, indices, &timestamp)?;
    let name = merged.source_file.clone().unwrap_or_default();

    ledger.merge_rows(indices, merged)?;
    println!("Merged {} rows into '{}'", count, name);
    Ok(())
}

pub fn delete(ctx: &Context, indices: &[usize]) -> Result<()> {
    ctx.ledger().delete_rows(indices)?;
    println!("Deleted {} rows", distinct(indices).len());
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<()> {
    let ledger = ctx.ledger();
    ledger.clear()?;
    println!("Cleared {}", ledger.path().display());
    Ok(())
}

pub fn config_show(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    println!("{}", JsonReporter::format(&config, true)?);
    println!("comparisons file: {}", ctx.paths.ledger_file.display());
    Ok(())
}

pub fn config_set(
    ctx: &Context,
    input_dir: Option<String>,
    output_dir: Option<String>,
) -> Result<()> {
    let mut config = ctx.config()?;
    if let Some(dir) = input_dir {
        config.input_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output_base_dir = dir;
    }

    config.save(&ctx.paths.config_file)?;
    println!("Configuration saved to {}", ctx.paths.config_file.display());
    Ok(())
}

/// Average the selected rows the same way the front end does, returning
/// the merged row and how many distinct rows went into it.
///
/// Index problems are reported here with the same errors the store would
/// raise, since the rows have to be read before anything is written.
fn merged_row(
    ledger: &LedgerStore,
    indices: &[usize],
    timestamp: &str,
) -> Result<(LedgerRow, usize)> {
    if !ledger.exists() {
        return Err(RttError::NotFound(ledger.path().to_path_buf()).into());
    }
    let rows = ledger.load()?.rows;

    let selected = distinct(indices)
        .iter()
        .map(|&index| {
            rows.get(index).cloned().ok_or(RttError::InvalidIndex {
                index,
                len: rows.len(),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if selected.len() < 2 {
        return Err(RttError::InsufficientRows {
            required: 2,
            supplied: selected.len(),
        }
        .into());
    }

    let merged = LedgerRow::average(&selected, timestamp).context("no rows selected")?;
    Ok((merged, selected.len()))
}

/// Sorted indices with repeats removed; a repeated index names one row.
fn distinct(indices: &[usize]) -> Vec<usize> {
    let mut unique = indices.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::open(Some(dir.path())).unwrap();
        (dir, ctx)
    }

    fn seed(ctx: &Context, rows: &[(&str, f64)]) {
        for (name, mean) in rows {
            ctx.ledger()
                .append(LedgerRow {
                    timestamp: Some("10/16 09:30".into()),
                    source_file: Some(name.to_string()),
                    mean_ms: Some(*mean),
                    p99_ms: Some(mean * 2.0),
                    ..Default::default()
                })
                .unwrap();
        }
    }

    #[test]
    fn test_merge_averages_selected_rows() {
        let (_dir, ctx) = context();
        seed(&ctx, &[("a", 10.0), ("b", 20.0), ("c", 40.0)]);

        merge(&ctx, &[2, 0]).unwrap();

        let rows = ctx.ledger().load().unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_file.as_deref(), Some("b"));
        assert_eq!(rows[1].source_file.as_deref(), Some("a+c"));
        assert_eq!(rows[1].mean_ms, Some(25.0));
        assert_eq!(rows[1].p99_ms, Some(50.0));
        assert_eq!(rows[1].p50_ms, None);
    }

    #[test]
    fn test_merge_out_of_range() {
        let (_dir, ctx) = context();
        seed(&ctx, &[("a", 10.0), ("b", 20.0)]);

        let err = merge(&ctx, &[0, 7]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RttError>(),
            Some(RttError::InvalidIndex { index: 7, len: 2 })
        ));
        assert_eq!(ctx.ledger().load().unwrap().rows.len(), 2);
    }

    #[test]
    fn test_merge_duplicate_indices() {
        let (_dir, ctx) = context();
        seed(&ctx, &[("a", 10.0), ("b", 20.0)]);

        let err = merge(&ctx, &[1, 1]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RttError>(),
            Some(RttError::InsufficientRows { .. })
        ));
    }

    #[test]
    fn test_merge_counts_distinct_rows() {
        let (_dir, ctx) = context();
        seed(&ctx, &[("a", 10.0), ("b", 20.0), ("c", 40.0)]);

        let (merged, count) = merged_row(&ctx.ledger(), &[0, 1, 1], "10/16 12:00").unwrap();
        assert_eq!(count, 2);
        assert_eq!(merged.source_file.as_deref(), Some("a+b"));

        merge(&ctx, &[0, 1, 1]).unwrap();
        assert_eq!(ctx.ledger().load().unwrap().rows.len(), 2);
        assert_eq!(distinct(&[2, 0, 2]), vec![0, 2]);
    }

    #[test]
    fn test_merge_without_ledger() {
        let (_dir, ctx) = context();
        let err = merge(&ctx, &[0, 1]).unwrap_err();
        assert!(matches!(err.downcast_ref::<RttError>(), Some(RttError::NotFound(_))));
    }

    #[test]
    fn test_config_set_keeps_unspecified_fields() {
        let (_dir, ctx) = context();

        config_set(&ctx, Some("/captures".into()), None).unwrap();
        config_set(&ctx, None, Some("/reports".into())).unwrap();

        let config = ctx.config().unwrap();
        assert_eq!(config.input_dir, "/captures");
        assert_eq!(config.output_base_dir, "/reports");
    }

    #[test]
    fn test_analyze_uses_saved_output_dir() {
        let (dir, ctx) = context();
        let reports = dir.path().join("reports");
        std::fs::create_dir_all(&reports).unwrap();
        config_set(&ctx, None, Some(reports.to_string_lossy().into_owned())).unwrap();

        let capture = dir.path().join("edge.csv");
        std::fs::write(&capture, "RTT\n0.010\n0.020\n").unwrap();

        analyze(&ctx, &capture, None, "RTT", OutputFormat::Json).unwrap();

        assert!(reports.join("edge_results").join("edge.csv").exists());
        assert_eq!(ctx.ledger().load().unwrap().rows.len(), 1);
    }
}
