//! Snapshot storage repository.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::snapshot::{decode, encode};
use crate::error::SnapshotError;
use crate::model::Mailbox;
use crate::{Error, Result};

/// File name used under the data directory.
const SNAPSHOT_FILE: &str = "mailbox.json";

/// Result of [`MailboxRepository::load_or_default`].
#[derive(Debug)]
pub struct Loaded {
    /// The restored mailbox, or a fresh one if loading failed.
    pub mailbox: Mailbox,
    /// Why the snapshot could not be used, if it couldn't.
    pub warning: Option<Error>,
}

impl Loaded {
    /// Returns true if the mailbox was not restored from a snapshot.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.warning.is_some()
    }

    /// Returns true if there was no snapshot file at all.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(
            &self.warning,
            Some(Error::SnapshotLoad { source: SnapshotError::Io(e), .. })
                if e.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Repository persisting a whole mailbox as a single JSON snapshot.
///
/// Writes go through one temporary file next to the snapshot, so callers
/// sharing a repository must not save concurrently; [`crate::Session`]
/// serializes its saves behind the mailbox lock.
#[derive(Debug, Clone)]
pub struct MailboxRepository {
    path: PathBuf,
}

impl MailboxRepository {
    /// Create a repository backed by the given snapshot file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default snapshot location under the user's data directory.
    #[must_use]
    pub fn default_location() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailfold")
            .join(SNAPSHOT_FILE)
    }

    /// Snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the mailbox from the snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotLoad` if the file is missing, unreadable, written by
    /// another format version, or describes an inconsistent mailbox.
    pub async fn load(&self) -> Result<Mailbox> {
        let result = async {
            let contents = tokio::fs::read(&self.path).await?;
            decode(&contents)
        }
        .await;

        result.map_err(|source| Error::SnapshotLoad {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the mailbox, falling back to an empty one on any failure.
    pub async fn load_or_default(&self) -> Loaded {
        match self.load().await {
            Ok(mailbox) => {
                info!(
                    "Mailbox loaded from {:?} ({} folder(s), {} message(s))",
                    self.path,
                    mailbox.folder_names().len(),
                    mailbox.total_messages()
                );
                Loaded {
                    mailbox,
                    warning: None,
                }
            }
            Err(e) => {
                let loaded = Loaded {
                    mailbox: Mailbox::new(),
                    warning: Some(e),
                };
                if loaded.is_missing() {
                    warn!("No snapshot at {:?}, starting with an empty mailbox", self.path);
                } else if let Some(e) = &loaded.warning {
                    warn!("{e}; starting with an empty mailbox");
                }
                loaded
            }
        }
    }

    /// Save the mailbox, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotSave` if encoding or writing fails. The previous
    /// snapshot is left in place in that case.
    pub async fn save(&self, mailbox: &Mailbox) -> Result<()> {
        let bytes = encode(mailbox).map_err(|source| Error::SnapshotSave {
            path: self.path.clone(),
            source,
        })?;
        self.write(&bytes).await
    }

    /// Write an already encoded snapshot.
    ///
    /// The bytes go to a sibling temporary file that is then renamed over
    /// the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotSave` if the directory or file cannot be written.
    async fn write(&self, bytes: &[u8]) -> Result<()> {
        let tmp = self.temp_path();
        let result = async {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&tmp, bytes).await?;
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        match result {
            Ok(()) => {
                info!("Mailbox saved to {:?}", self.path);
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                    debug!("No temporary snapshot to clean up: {cleanup}");
                }
                Err(Error::SnapshotSave {
                    path: self.path.clone(),
                    source: e.into(),
                })
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_else(|| SNAPSHOT_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SortOrder;
    use tempfile::TempDir;

    fn sample() -> Mailbox {
        let mut mailbox = Mailbox::new();
        mailbox.add_folder("Work").unwrap();
        mailbox.add_folder("Receipts").unwrap();
        let a = mailbox.compose("boss@example.com", "", "", "Quarterly", "Numbers");
        mailbox.compose("friend@example.com", "me@example.com", "", "Lunch?", "Noon");
        let c = mailbox.compose("shop@example.com", "", "audit@example.com", "Order 1", "");
        let d = mailbox.compose("", "", "", "Spam", "");
        mailbox.move_message(a, "Work").unwrap();
        mailbox.move_message(c, "Receipts").unwrap();
        mailbox.delete(d).unwrap();
        mailbox.folder_mut("Inbox").unwrap().sort_by_subject(true);
        mailbox
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let repo = MailboxRepository::new(dir.path().join("nested").join("mailbox.json"));
        let original = sample();

        repo.save(&original).await.unwrap();
        let restored = repo.load().await.unwrap();

        assert_eq!(restored, original);
        assert_eq!(
            restored.inbox().sort_order(),
            SortOrder::SubjectAscending
        );
        assert_eq!(restored.folder_names(), vec!["Inbox", "Trash", "Work", "Receipts"]);
    }

    #[tokio::test]
    async fn restored_mailbox_keeps_allocating_fresh_ids() {
        let dir = TempDir::new().unwrap();
        let repo = MailboxRepository::new(dir.path().join("mailbox.json"));
        let mut original = sample();
        repo.save(&original).await.unwrap();

        let mut restored = repo.load().await.unwrap();
        assert_eq!(
            restored.compose("", "", "", "next", ""),
            original.compose("", "", "", "next", "")
        );
        assert!(restored.check_integrity().is_ok());
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let repo = MailboxRepository::new(dir.path().join("absent.json"));

        assert!(matches!(repo.load().await, Err(Error::SnapshotLoad { .. })));

        let loaded = repo.load_or_default().await;
        assert!(loaded.is_fresh());
        assert!(loaded.is_missing());
        assert_eq!(loaded.mailbox, Mailbox::new());
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mailbox.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        let repo = MailboxRepository::new(&path);

        let loaded = repo.load_or_default().await;
        assert!(loaded.is_fresh());
        assert!(!loaded.is_missing());
        assert!(matches!(
            loaded.warning,
            Some(Error::SnapshotLoad { source: SnapshotError::Serde(_), .. })
        ));
        assert_eq!(loaded.mailbox.folder_names(), vec!["Inbox", "Trash"]);
    }

    #[tokio::test]
    async fn save_failure_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mailbox.json");
        let repo = MailboxRepository::new(&path);
        let original = sample();
        repo.save(&original).await.unwrap();

        // A directory squatting on the temp file name makes the write fail.
        tokio::fs::create_dir(dir.path().join("mailbox.json.tmp"))
            .await
            .unwrap();
        let err = repo.save(&Mailbox::new()).await.unwrap_err();
        assert!(matches!(err, Error::SnapshotSave { .. }));
        assert!(err.is_persistence());

        assert_eq!(repo.load().await.unwrap(), original);
    }

    #[test]
    fn temp_path_sits_next_to_snapshot() {
        let repo = MailboxRepository::new("/data/mailfold/mailbox.json");
        assert_eq!(
            repo.temp_path(),
            PathBuf::from("/data/mailfold/mailbox.json.tmp")
        );
    }
}
