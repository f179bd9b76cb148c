//! Snapshot persistence and the shared session handle.

mod repository;
mod session;
mod snapshot;

pub use repository::{Loaded, MailboxRepository};
pub use session::Session;
pub use snapshot::{SNAPSHOT_VERSION, decode, encode};
