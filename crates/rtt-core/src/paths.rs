//! Application data directory resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable that relocates the data directory.
pub const HOME_ENV: &str = "RTT_ANALYZER_HOME";

pub const LEDGER_FILE_NAME: &str = "comparisons.csv";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Locations of the files the application keeps between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub ledger_file: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Resolve and create the data directory.
    ///
    /// Precedence: `explicit`, then `$RTT_ANALYZER_HOME`, then the platform
    /// default (`%APPDATA%\RTT_Analyzer` on Windows, `~/.rtt_analyzer`
    /// elsewhere).
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let data_dir = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => env::var_os(HOME_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        };
        Self::in_dir(data_dir)
    }

    /// Use `data_dir` as-is, creating it if needed.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            ledger_file: data_dir.join(LEDGER_FILE_NAME),
            config_file: data_dir.join(CONFIG_FILE_NAME),
            data_dir,
        })
    }
}

#[cfg(target_os = "windows")]
fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("RTT_Analyzer")
}

#[cfg(not(target_os = "windows"))]
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rtt_analyzer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let paths = AppPaths::in_dir(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(paths.ledger_file, dir.join("comparisons.csv"));
        assert_eq!(paths.config_file, dir.join("config.json"));
    }

    #[test]
    fn test_explicit_dir_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::resolve(Some(tmp.path())).unwrap();
        assert_eq!(paths.data_dir, tmp.path());
    }
}
