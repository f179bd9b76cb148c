//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::MessageId;

/// Errors that can occur in mailbox operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A folder with this name already exists (names compare case-insensitively).
    #[error("Folder already exists: {0}")]
    DuplicateFolder(String),

    /// Inbox and Trash cannot be created, removed, or shadowed.
    #[error("Folder is reserved: {0}")]
    ReservedFolder(String),

    /// No folder matches the given name.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// The message is not present in any folder.
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    /// Index-based removal outside the folder bounds.
    #[error("Index {index} out of range for folder of {len} message(s)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of messages in the folder.
        len: usize,
    },

    /// The snapshot could not be read or decoded.
    #[error("Failed to load snapshot from {}: {source}", path.display())]
    SnapshotLoad {
        /// Snapshot file location.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: SnapshotError,
    },

    /// The snapshot could not be written.
    #[error("Failed to save snapshot to {}: {source}", path.display())]
    SnapshotSave {
        /// Snapshot file location.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: SnapshotError,
    },
}

/// Causes of a snapshot load or save failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Snapshot written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// Snapshot decoded but violates mailbox invariants.
    #[error("inconsistent snapshot: {0}")]
    Corrupt(String),
}

impl Error {
    /// Returns true for failures of the snapshot layer rather than of a
    /// mailbox operation.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::SnapshotLoad { .. } | Self::SnapshotSave { .. })
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
