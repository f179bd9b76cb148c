//! Store settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::MailboxRepository;

/// Settings controlling where and when the mailbox is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snapshot file; defaults to the user's data directory.
    pub snapshot_path: Option<PathBuf>,
    /// Save after every successful change instead of only on request.
    pub autosave: bool,
}

impl Settings {
    /// Default settings file location under the user's config directory.
    #[must_use]
    pub fn default_location() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailfold")
            .join("settings.json")
    }

    /// Load settings from the default location.
    ///
    /// Falls back to defaults if the file is missing or malformed.
    pub async fn load() -> Self {
        Self::load_from(&Self::default_location()).await
    }

    /// Load settings from a specific file.
    ///
    /// Falls back to defaults if the file is missing or malformed.
    pub async fn load_from(path: &Path) -> Self {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Settings read error for {:?}: {e}", path);
                return Self::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Settings parse error for {:?}: {e}", path);
            Self::default()
        })
    }

    /// Resolved snapshot location.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(MailboxRepository::default_location)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_uses_data_dir_snapshot() {
        let settings = Settings::default();
        assert!(!settings.autosave);
        assert_eq!(settings.snapshot_path(), MailboxRepository::default_location());
        assert!(settings.snapshot_path().ends_with("mailfold/mailbox.json"));
    }

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).await;
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{ "autosave": true }"#).await.unwrap();

        let settings = Settings::load_from(&path).await;
        assert!(settings.autosave);
        assert!(settings.snapshot_path.is_none());
    }

    #[tokio::test]
    async fn malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "autosave = true").await.unwrap();

        assert_eq!(Settings::load_from(&path).await, Settings::default());
    }

    #[tokio::test]
    async fn explicit_snapshot_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{ "snapshot_path": "/tmp/elsewhere.json" }"#)
            .await
            .unwrap();

        let settings = Settings::load_from(&path).await;
        assert_eq!(settings.snapshot_path(), PathBuf::from("/tmp/elsewhere.json"));
    }
}
