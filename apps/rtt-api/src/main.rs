//! RTT Analyzer API server binary

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rtt_core::AppPaths;
use tracing::info;

use rtt_api::AppState;

#[derive(Parser, Debug)]
#[command(name = "rtt-api")]
#[command(version, about = "HTTP backend for RTT analysis and run history")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Directory holding comparisons.csv and config.json (overrides RTT_ANALYZER_HOME)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rtt_api=info".parse()?)
                .add_directive("rtt_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Starting RTT Analyzer Backend Server...");
    let paths = AppPaths::resolve(args.data_dir.as_deref())
        .context("failed to prepare the data directory")?;
    let state = Arc::new(AppState::new(paths));
    let app = rtt_api::router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
