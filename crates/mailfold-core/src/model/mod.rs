//! Mailbox domain model.
//!
//! Provides messages, folders, and the mailbox that owns them.

mod folder;
mod mailbox;
mod message;

pub use folder::{Folder, SortOrder};
pub use mailbox::{INBOX, Mailbox, OrphanPolicy, TRASH, is_reserved};
pub use message::{Message, MessageId};
