//! HTTP handlers for the RTT API
//!
//! Core operations touch the filesystem synchronously, so each one runs on
//! the blocking pool. Anything that rewrites the ledger holds
//! [`AppState::ledger_lock`] for the whole load-modify-persist cycle.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, Json};
use rtt_core::ledger::DEFAULT_RECENT_LIMIT;
use rtt_core::UserConfig;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "RTT Analyzer backend is running".to_string(),
    })
}

/// Analyze one capture file and record it in the ledger
pub async fn process_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessFileRequest>,
) -> Result<Json<ProcessFileResponse>, ApiError> {
    tracing::info!("Received request to process file: {}", req.file_path);

    let _guard = state.ledger_lock.lock().await;
    let analyzer = state.analyzer.clone();
    let result = run_blocking(move || {
        let output_base = req.output_base_dir.as_deref().map(Path::new);
        analyzer.analyze(Path::new(&req.file_path), output_base)
    })
    .await?;

    tracing::info!("Successfully processed {}", result.base_name);

    Ok(Json(ProcessFileResponse {
        status: SUCCESS.to_string(),
        message: format!("File '{}' processed successfully.", result.base_name),
        data: result,
    }))
}

/// Recent rows for the table plus every row for the trend chart
pub async fn get_comparisons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ComparisonsResponse>, ApiError> {
    let ledger = state.ledger().clone();
    let history = run_blocking(move || ledger.list(DEFAULT_RECENT_LIMIT)).await?;

    Ok(Json(ComparisonsResponse {
        status: SUCCESS.to_string(),
        data: history,
    }))
}

pub async fn clear_comparisons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let _guard = state.ledger_lock.lock().await;
    let ledger = state.ledger().clone();
    run_blocking(move || ledger.clear()).await?;

    Ok(Json(MessageResponse::success(
        "Comparisons history cleared successfully.",
    )))
}

/// Replace the selected rows with the client-computed merged row
pub async fn merge_rows(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MergeRowsRequest>,
) -> Result<Json<MergeRowsResponse>, ApiError> {
    let indices = to_indices(&req.row_indices)?;
    let count = distinct(&indices);

    let _guard = state.ledger_lock.lock().await;
    let ledger = state.ledger().clone();
    run_blocking(move || ledger.merge_rows(&indices, req.merged_data)).await?;

    tracing::info!("Merged {} rows", count);

    Ok(Json(MergeRowsResponse {
        status: SUCCESS.to_string(),
        message: format!("Successfully merged {} rows", count),
        rows_merged: count,
    }))
}

pub async fn delete_rows(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRowsRequest>,
) -> Result<Json<DeleteRowsResponse>, ApiError> {
    let indices = to_indices(&req.row_indices)?;
    let count = distinct(&indices);

    let _guard = state.ledger_lock.lock().await;
    let ledger = state.ledger().clone();
    run_blocking(move || ledger.delete_rows(&indices)).await?;

    tracing::info!("Deleted {} rows", count);

    Ok(Json(DeleteRowsResponse {
        status: SUCCESS.to_string(),
        message: format!("Successfully deleted {} rows", count),
        rows_deleted: count,
    }))
}

pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let config_file = state.paths.config_file.clone();
    let config = run_blocking(move || UserConfig::load(&config_file)).await?;

    Ok(Json(ConfigResponse {
        status: SUCCESS.to_string(),
        data: ConfigData {
            input_dir: config.input_dir,
            output_base_dir: config.output_base_dir,
            comparisons_file: state.paths.ledger_file.clone(),
        },
    }))
}

pub async fn save_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<UserConfig>,
) -> Result<Json<MessageResponse>, ApiError> {
    let config_file = state.paths.config_file.clone();
    run_blocking(move || config.save(&config_file)).await?;

    tracing::info!("Configuration saved");

    Ok(Json(MessageResponse::success(
        "Configuration saved successfully.",
    )))
}

fn to_indices(raw: &[i64]) -> Result<Vec<usize>, ApiError> {
    raw.iter()
        .map(|&i| {
            usize::try_from(i)
                .map_err(|_| ApiError::InvalidRequest(format!("Invalid row index: {}", i)))
        })
        .collect()
}

/// Rows actually affected; repeated indices name the same row.
fn distinct(indices: &[usize]) -> usize {
    indices.iter().collect::<BTreeSet<_>>().len()
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> rtt_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_indices_rejects_negative() {
        assert_eq!(to_indices(&[0, 3]).unwrap(), vec![0, 3]);

        let err = to_indices(&[1, -2]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid row index: -2");
    }

    #[test]
    fn test_distinct_ignores_repeats() {
        assert_eq!(distinct(&[0, 1, 1]), 2);
        assert_eq!(distinct(&[]), 0);
    }
}
