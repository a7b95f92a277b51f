//! User configuration persisted between sessions
//!
//! A small JSON document remembering the directories the operator last used:
//!
//! ```json
//! {
//!   "input_dir": "D:/captures",
//!   "output_base_dir": "D:/reports"
//! }
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Directories remembered for the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Directory the file picker starts in
    #[serde(default)]
    pub input_dir: String,
    /// Directory analyses write `<name>_results` into; blank means "next to the source"
    #[serde(default)]
    pub output_base_dir: String,
}

impl UserConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write as pretty-printed JSON through a temp file and rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!(path = %path.display(), "saved user config");
        Ok(())
    }

    /// The override to hand to the analyzer, if one is configured.
    pub fn output_base(&self) -> Option<&Path> {
        let trimmed = self.output_base_dir.trim();
        (!trimmed.is_empty()).then(|| Path::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = UserConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = UserConfig {
            input_dir: "/captures".into(),
            output_base_dir: "/reports".into(),
        };

        config.save(&path).unwrap();
        assert_eq!(UserConfig::load(&path).unwrap(), config);
        assert!(fs::read_to_string(&path).unwrap().contains("\n  \"input_dir\""));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"input_dir": "/x"}"#).unwrap();

        let config = UserConfig::load(&path).unwrap();
        assert_eq!(config.input_dir, "/x");
        assert_eq!(config.output_base_dir, "");
        assert_eq!(config.output_base(), None);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        assert!(UserConfig::load(&path).is_err());
    }
}
