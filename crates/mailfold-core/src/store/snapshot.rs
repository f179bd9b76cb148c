//! Versioned JSON snapshot format.
//!
//! The model types carry no serde impls of their own; these records are the
//! only way a mailbox is written out or read back, and reading always goes
//! through [`Mailbox::check_integrity`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::model::{Folder, Mailbox, Message, MessageId, SortOrder};

/// Snapshot format version this build reads and writes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut {
    version: u32,
    mailbox: MailboxRecord,
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    mailbox: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
struct MailboxRecord {
    inbox: FolderRecord,
    trash: FolderRecord,
    folders: Vec<FolderRecord>,
    next_message_id: u64,
}

#[derive(Serialize, Deserialize)]
struct FolderRecord {
    name: String,
    messages: Vec<MessageRecord>,
    #[serde(default)]
    sort_order: SortOrder,
}

#[derive(Serialize, Deserialize)]
struct MessageRecord {
    id: MessageId,
    to: String,
    cc: String,
    bcc: String,
    subject: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id(),
            to: message.to().to_string(),
            cc: message.cc().to_string(),
            bcc: message.bcc().to_string(),
            subject: message.subject().to_string(),
            body: message.body().to_string(),
            created_at: message.created_at(),
        }
    }
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self::with_timestamp(
            record.id,
            record.to,
            record.cc,
            record.bcc,
            record.subject,
            record.body,
            record.created_at,
        )
    }
}

impl From<&Folder> for FolderRecord {
    fn from(folder: &Folder) -> Self {
        Self {
            name: folder.name().to_string(),
            messages: folder.iter().map(MessageRecord::from).collect(),
            sort_order: folder.sort_order(),
        }
    }
}

impl From<FolderRecord> for Folder {
    fn from(record: FolderRecord) -> Self {
        let messages = record.messages.into_iter().map(Message::from).collect();
        Self::from_parts(record.name, messages, record.sort_order)
    }
}

impl From<&Mailbox> for MailboxRecord {
    fn from(mailbox: &Mailbox) -> Self {
        Self {
            inbox: mailbox.inbox().into(),
            trash: mailbox.trash().into(),
            folders: mailbox.user_folders().iter().map(FolderRecord::from).collect(),
            next_message_id: mailbox.next_message_id(),
        }
    }
}

impl From<MailboxRecord> for Mailbox {
    fn from(record: MailboxRecord) -> Self {
        Self::from_parts(
            record.inbox.into(),
            record.trash.into(),
            record.folders.into_iter().map(Folder::from).collect(),
            record.next_message_id,
        )
    }
}

/// Encode a mailbox as a versioned JSON snapshot.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(mailbox: &Mailbox) -> Result<Vec<u8>, SnapshotError> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        mailbox: mailbox.into(),
    };
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

/// Decode and validate a versioned JSON snapshot.
///
/// # Errors
///
/// Returns an error if the data is not a snapshot, was written by another
/// format version, or breaks a mailbox invariant.
pub fn decode(bytes: &[u8]) -> Result<Mailbox, SnapshotError> {
    let snapshot: SnapshotIn = serde_json::from_slice(bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Version {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let record: MailboxRecord = serde_json::from_value(snapshot.mailbox)?;
    let mailbox = Mailbox::from(record);
    mailbox.check_integrity().map_err(SnapshotError::Corrupt)?;
    Ok(mailbox)
}
