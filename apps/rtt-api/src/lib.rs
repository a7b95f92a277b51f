//! RTT Analyzer API - HTTP backend for the analyzer front end
//!
//! Provides REST endpoints for:
//! - Analyzing a capture file on the server's filesystem
//! - Reading, merging, deleting and clearing run history
//! - Persisting the operator's directory preferences

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    // The desktop front end is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Analysis
        .route("/process-file", post(handlers::process_file))
        // History
        .route("/get-comparisons", get(handlers::get_comparisons))
        .route("/clear-comparisons", delete(handlers::clear_comparisons))
        .route("/merge-rows", post(handlers::merge_rows))
        .route("/delete-rows", delete(handlers::delete_rows))
        // User configuration
        .route("/get-config", get(handlers::get_config))
        .route("/save-config", post(handlers::save_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
