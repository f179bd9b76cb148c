//! Mailbox: the root registry of folders.

use tracing::{debug, info};

use super::folder::{Folder, names_match};
use super::message::{Message, MessageId};
use crate::{Error, Result};

/// Name of the reserved inbox folder.
pub const INBOX: &str = "Inbox";
/// Name of the reserved trash folder.
pub const TRASH: &str = "Trash";

/// Exclusive upper bound for the message id counter accepted from a snapshot.
///
/// Keeps ids within the signed 64-bit range and leaves headroom so the
/// counter cannot overflow.
const MESSAGE_ID_LIMIT: u64 = 1 << 63;

/// Returns true if `name` matches Inbox or Trash, ignoring case.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    names_match(name, INBOX) || names_match(name, TRASH)
}

/// What happens to the messages of a removed folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    /// Drop them along with the folder.
    #[default]
    Discard,
    /// Append them to the inbox in their current order.
    MoveToInbox,
}

/// Where a message was found by [`Mailbox::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Inbox,
    Trash,
    User(usize),
}

/// Inbox, Trash and the user's own folders.
///
/// Every message lives in exactly one folder. Cross-folder operations
/// (move, delete, empty trash) detach a message from its current folder and
/// append it to the destination in one step.
#[derive(Debug, PartialEq, Eq)]
pub struct Mailbox {
    inbox: Folder,
    trash: Folder,
    folders: Vec<Folder>,
    next_message_id: u64,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailbox {
    /// Creates an empty mailbox with only Inbox and Trash.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inbox: Folder::new(INBOX),
            trash: Folder::new(TRASH),
            folders: Vec::new(),
            next_message_id: 1,
        }
    }

    /// Rebuilds a mailbox from stored parts. Callers validate the result
    /// with [`Mailbox::check_integrity`].
    pub(crate) const fn from_parts(
        inbox: Folder,
        trash: Folder,
        folders: Vec<Folder>,
        next_message_id: u64,
    ) -> Self {
        Self {
            inbox,
            trash,
            folders,
            next_message_id,
        }
    }

    /// Id the next composed message will get.
    pub(crate) const fn next_message_id(&self) -> u64 {
        self.next_message_id
    }

    /// The inbox.
    #[must_use]
    pub const fn inbox(&self) -> &Folder {
        &self.inbox
    }

    /// The inbox, mutably.
    pub const fn inbox_mut(&mut self) -> &mut Folder {
        &mut self.inbox
    }

    /// The trash.
    #[must_use]
    pub const fn trash(&self) -> &Folder {
        &self.trash
    }

    /// The trash, mutably.
    pub const fn trash_mut(&mut self) -> &mut Folder {
        &mut self.trash
    }

    /// User folders in registration order.
    #[must_use]
    pub fn user_folders(&self) -> &[Folder] {
        &self.folders
    }

    /// All folder names: Inbox, Trash, then user folders in registration order.
    #[must_use]
    pub fn folder_names(&self) -> Vec<&str> {
        self.all_folders().map(Folder::name).collect()
    }

    /// Number of messages across every folder.
    #[must_use]
    pub fn total_messages(&self) -> usize {
        self.all_folders().map(Folder::len).sum()
    }

    fn all_folders(&self) -> impl Iterator<Item = &Folder> {
        [&self.inbox, &self.trash].into_iter().chain(&self.folders)
    }

    /// Looks up a folder by name, ignoring case.
    #[must_use]
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.slot_by_name(name).map(|slot| self.slot(slot))
    }

    /// Looks up a folder by name, ignoring case, for in-place changes.
    pub fn folder_mut(&mut self, name: &str) -> Option<&mut Folder> {
        self.slot_by_name(name).map(|slot| self.slot_mut(slot))
    }

    fn slot_by_name(&self, name: &str) -> Option<Slot> {
        if names_match(name, INBOX) {
            return Some(Slot::Inbox);
        }
        if names_match(name, TRASH) {
            return Some(Slot::Trash);
        }
        self.folders
            .iter()
            .position(|f| f.is_named(name))
            .map(Slot::User)
    }

    fn slot(&self, slot: Slot) -> &Folder {
        match slot {
            Slot::Inbox => &self.inbox,
            Slot::Trash => &self.trash,
            Slot::User(i) => &self.folders[i],
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Folder {
        match slot {
            Slot::Inbox => &mut self.inbox,
            Slot::Trash => &mut self.trash,
            Slot::User(i) => &mut self.folders[i],
        }
    }

    /// Registers a new empty folder.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateFolder` if any folder, Inbox and Trash included,
    /// already has this name ignoring case.
    pub fn add_folder(&mut self, name: &str) -> Result<()> {
        if self.slot_by_name(name).is_some() {
            return Err(Error::DuplicateFolder(name.to_string()));
        }
        info!("Folder added: {name}");
        self.folders.push(Folder::new(name));
        Ok(())
    }

    /// Removes a user folder, discarding the messages it holds.
    ///
    /// Returns the number of messages discarded.
    ///
    /// # Errors
    ///
    /// Returns `ReservedFolder` for Inbox or Trash and `FolderNotFound` if no
    /// user folder has this name.
    pub fn remove_folder(&mut self, name: &str) -> Result<usize> {
        self.remove_folder_with(name, OrphanPolicy::Discard)
    }

    /// Removes a user folder, deciding what happens to its messages.
    ///
    /// Returns the number of messages discarded or moved to the inbox.
    ///
    /// # Errors
    ///
    /// Returns `ReservedFolder` for Inbox or Trash and `FolderNotFound` if no
    /// user folder has this name.
    pub fn remove_folder_with(&mut self, name: &str, policy: OrphanPolicy) -> Result<usize> {
        if is_reserved(name) {
            return Err(Error::ReservedFolder(name.to_string()));
        }
        let Some(Slot::User(index)) = self.slot_by_name(name) else {
            return Err(Error::FolderNotFound(name.to_string()));
        };

        let mut folder = self.folders.remove(index);
        let orphans = folder.take_all();
        let count = orphans.len();
        match policy {
            OrphanPolicy::Discard => {
                info!("Folder removed: {} ({count} message(s) discarded)", folder.name());
            }
            OrphanPolicy::MoveToInbox => {
                for message in orphans {
                    self.inbox.add(message);
                }
                info!("Folder removed: {} ({count} message(s) moved to {INBOX})", folder.name());
            }
        }
        Ok(count)
    }

    /// Creates a message stamped with the current time and appends it to the inbox.
    pub fn compose(
        &mut self,
        to: impl Into<String>,
        cc: impl Into<String>,
        bcc: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> MessageId {
        let id = self.allocate_id();
        let message = Message::new(id, to, cc, bcc, subject, body);
        debug!("Composed message {id}: {:?}", message.subject());
        self.inbox.add(message);
        id
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    /// Finds a message anywhere in the mailbox.
    ///
    /// Returns the containing folder together with the message.
    #[must_use]
    pub fn find_message(&self, id: MessageId) -> Option<(&Folder, &Message)> {
        let (slot, index) = self.locate(id)?;
        let folder = self.slot(slot);
        folder.get(index).map(|message| (folder, message))
    }

    /// Scans Inbox, Trash, then user folders in registration order.
    fn locate(&self, id: MessageId) -> Option<(Slot, usize)> {
        if let Some(i) = self.inbox.position(id) {
            return Some((Slot::Inbox, i));
        }
        if let Some(i) = self.trash.position(id) {
            return Some((Slot::Trash, i));
        }
        self.folders
            .iter()
            .enumerate()
            .find_map(|(f, folder)| folder.position(id).map(|i| (Slot::User(f), i)))
    }

    /// Moves a message to the trash.
    ///
    /// A message already in the trash is re-appended to its end.
    ///
    /// # Errors
    ///
    /// Returns `MessageNotFound` if no folder holds the message.
    pub fn delete(&mut self, id: MessageId) -> Result<()> {
        let (slot, index) = self.locate(id).ok_or(Error::MessageNotFound(id))?;
        let message = self.slot_mut(slot).remove_at(index)?;
        debug!("Message {id} moved to {TRASH}: {:?}", message.subject());
        self.trash.add(message);
        Ok(())
    }

    /// Moves a message to the end of the named folder.
    ///
    /// The target's sort order is not reapplied.
    ///
    /// # Errors
    ///
    /// Returns `MessageNotFound` if no folder holds the message and
    /// `FolderNotFound` if the target does not exist. Either way nothing moves.
    pub fn move_message(&mut self, id: MessageId, target: &str) -> Result<()> {
        let (source, index) = self.locate(id).ok_or(Error::MessageNotFound(id))?;
        let target_slot = self
            .slot_by_name(target)
            .ok_or_else(|| Error::FolderNotFound(target.to_string()))?;

        let message = self.slot_mut(source).remove_at(index)?;
        let target = self.slot_mut(target_slot);
        debug!("Message {id} moved to {}: {:?}", target.name(), message.subject());
        target.add(message);
        Ok(())
    }

    /// Permanently removes every message in the trash.
    ///
    /// Returns how many were removed; zero if the trash was already empty.
    pub fn empty_trash(&mut self) -> usize {
        let count = self.trash.take_all().len();
        if count > 0 {
            info!("{count} message(s) permanently deleted from {TRASH}");
        }
        count
    }

    /// Checks the invariants a decoded snapshot must satisfy.
    ///
    /// Returns a description of the first violation found.
    pub(crate) fn check_integrity(&self) -> std::result::Result<(), String> {
        if !self.inbox.is_named(INBOX) || !self.trash.is_named(TRASH) {
            return Err("reserved folders are misnamed".to_string());
        }
        if self.next_message_id == 0 || self.next_message_id > MESSAGE_ID_LIMIT {
            return Err(format!("id counter {} is out of range", self.next_message_id));
        }

        for (i, folder) in self.folders.iter().enumerate() {
            if is_reserved(folder.name()) {
                return Err(format!("user folder uses reserved name {:?}", folder.name()));
            }
            if self.folders[..i].iter().any(|f| f.is_named(folder.name())) {
                return Err(format!("duplicate folder name {:?}", folder.name()));
            }
        }

        let mut ids: Vec<MessageId> = self
            .all_folders()
            .flat_map(|f| f.iter().map(Message::id))
            .collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(format!("message {} appears more than once", pair[0]));
        }
        if let Some(max) = ids.last()
            && max.0 >= self.next_message_id
        {
            return Err(format!(
                "id counter {} is behind message {max}",
                self.next_message_id
            ));
        }
        Ok(())
    }
}
