//! Application state for the RTT API

use rtt_core::{AppPaths, Analyzer, LedgerStore};
use tokio::sync::Mutex;

pub struct AppState {
    pub paths: AppPaths,
    pub analyzer: Analyzer,
    /// Serializes every read-modify-write of the ledger file
    pub ledger_lock: Mutex<()>,
}

impl AppState {
    pub fn new(paths: AppPaths) -> Self {
        tracing::info!("Comparisons data will be stored at: {}", paths.ledger_file.display());

        let analyzer = Analyzer::new(LedgerStore::new(&paths.ledger_file));
        Self {
            paths,
            analyzer,
            ledger_lock: Mutex::new(()),
        }
    }

    pub fn ledger(&self) -> &LedgerStore {
        self.analyzer.ledger()
    }
}
