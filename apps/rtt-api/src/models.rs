//! Request and response bodies for the RTT API

use std::path::PathBuf;

use rtt_core::{AnalysisResult, History, LedgerRow};
use serde::{Deserialize, Serialize};

pub const SUCCESS: &str = "success";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessFileRequest {
    pub file_path: String,
    #[serde(default)]
    pub output_base_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessFileResponse {
    pub status: String,
    pub message: String,
    pub data: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonsResponse {
    pub status: String,
    pub data: History,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.into(),
        }
    }
}

/// Row indices arrive as signed integers so negative values can be rejected
/// with a proper message instead of a body parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRowsRequest {
    pub row_indices: Vec<i64>,
    /// Replacement row, computed by the client
    pub merged_data: LedgerRow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRowsResponse {
    pub status: String,
    pub message: String,
    pub rows_merged: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRowsRequest {
    pub row_indices: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRowsResponse {
    pub status: String,
    pub message: String,
    pub rows_deleted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    pub input_dir: String,
    pub output_base_dir: String,
    pub comparisons_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub status: String,
    pub data: ConfigData,
}
