//! # mailfold-core
//!
//! Folder and mailbox record store for `mailfold`.
//!
//! This crate provides:
//! - Domain models: messages, folders, and the mailbox with its reserved
//!   Inbox and Trash folders
//! - Cross-folder operations: compose, move, delete to trash, empty trash
//! - Per-folder sorting by subject or date
//! - Whole-mailbox JSON snapshots with a fall-back-to-empty load
//! - A shared [`Session`] handle serializing access to one mailbox
//!
//! ## Example
//!
//! ```ignore
//! use mailfold_core::{Session, Settings};
//!
//! let session = Session::open(&Settings::load().await).await;
//! session.update(|m| m.add_folder("Work")).await?;
//! let id = session.update(|m| Ok(m.compose("bob@example.com", "", "", "Hi", "Hello"))).await?;
//! session.update(|m| m.move_message(id, "work")).await?;
//! session.close().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod model;
pub mod settings;
pub mod store;

pub use error::{Error, Result, SnapshotError};
pub use model::{
    Folder, INBOX, Mailbox, Message, MessageId, OrphanPolicy, SortOrder, TRASH, is_reserved,
};
pub use settings::Settings;
pub use store::{Loaded, MailboxRepository, Session};
