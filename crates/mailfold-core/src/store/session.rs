//! Shared mailbox handle for a running session.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::repository::MailboxRepository;
use crate::model::Mailbox;
use crate::settings::Settings;
use crate::{Error, Result};

/// An open mailbox plus the repository it is saved to.
///
/// Every call takes the single mailbox lock for its whole duration, so a
/// move never exposes a message in neither or both folders and a save never
/// captures a half-applied change. Clones share the same mailbox.
#[derive(Clone)]
pub struct Session {
    mailbox: Arc<Mutex<Mailbox>>,
    repository: MailboxRepository,
    autosave: bool,
    load_warning: Arc<Option<Error>>,
}

impl Session {
    /// Opens the mailbox described by the settings.
    ///
    /// A missing or unreadable snapshot yields an empty mailbox; the reason
    /// is kept in [`Session::load_warning`].
    pub async fn open(settings: &Settings) -> Self {
        let repository = MailboxRepository::new(settings.snapshot_path());
        let loaded = repository.load_or_default().await;
        Self::from_parts(loaded.mailbox, repository, settings.autosave, loaded.warning)
    }

    /// Wraps an existing mailbox.
    #[must_use]
    pub fn new(mailbox: Mailbox, repository: MailboxRepository, autosave: bool) -> Self {
        Self::from_parts(mailbox, repository, autosave, None)
    }

    fn from_parts(
        mailbox: Mailbox,
        repository: MailboxRepository,
        autosave: bool,
        load_warning: Option<Error>,
    ) -> Self {
        Self {
            mailbox: Arc::new(Mutex::new(mailbox)),
            repository,
            autosave,
            load_warning: Arc::new(load_warning),
        }
    }

    /// Why the previous snapshot could not be restored, if it couldn't.
    #[must_use]
    pub fn load_warning(&self) -> Option<&Error> {
        (*self.load_warning).as_ref()
    }

    /// The repository this session saves to.
    #[must_use]
    pub const fn repository(&self) -> &MailboxRepository {
        &self.repository
    }

    /// Runs a read-only closure against the mailbox.
    pub async fn read<R>(&self, f: impl FnOnce(&Mailbox) -> R) -> R {
        let mailbox = self.mailbox.lock().await;
        f(&*mailbox)
    }

    /// Runs a mutating closure against the mailbox.
    ///
    /// With autosave on, a successful closure is followed by a save that
    /// completes before the lock is released.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or `SnapshotSave` if autosave fails. In
    /// the latter case the change stays applied in memory.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Mailbox) -> Result<R>) -> Result<R> {
        let mut mailbox = self.mailbox.lock().await;
        let value = f(&mut *mailbox)?;
        if self.autosave {
            debug!("Autosaving after update");
            self.repository.save(&mailbox).await?;
        }
        Ok(value)
    }

    /// Saves the current state.
    ///
    /// The lock is held until the snapshot is on disk, so saves never
    /// overtake one another.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotSave` if encoding or writing fails.
    pub async fn save(&self) -> Result<()> {
        let mailbox = self.mailbox.lock().await;
        self.repository.save(&mailbox).await
    }

    /// Saves and releases the session.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotSave` if the final save fails.
    pub async fn close(self) -> Result<()> {
        self.save().await?;
        info!("Session closed");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.repository.path())
            .field("autosave", &self.autosave)
            .finish_non_exhaustive()
    }
}
