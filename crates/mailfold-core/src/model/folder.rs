//! Folder data model.

use serde::{Deserialize, Serialize};

use super::message::{Message, MessageId};
use crate::{Error, Result};

/// The last sort applied to a folder.
///
/// This records history, not an ongoing guarantee: messages appended after a
/// sort land at the end regardless of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Subject, A to Z.
    SubjectAscending,
    /// Subject, Z to A.
    SubjectDescending,
    /// Oldest first.
    DateAscending,
    /// Newest first.
    #[default]
    DateDescending,
}

impl SortOrder {
    /// Whether this order runs ascending.
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::SubjectAscending | Self::DateAscending)
    }

    /// Get display name for the sort order.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SubjectAscending => "Subject (A-Z)",
            Self::SubjectDescending => "Subject (Z-A)",
            Self::DateAscending => "Date (oldest first)",
            Self::DateDescending => "Date (newest first)",
        }
    }
}

/// Case-insensitive folder name comparison, shared by every name rule.
#[must_use]
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A named, ordered container of messages.
#[derive(Debug, PartialEq, Eq)]
pub struct Folder {
    name: String,
    messages: Vec<Message>,
    sort_order: SortOrder,
}

impl Folder {
    /// Creates an empty folder sorted newest first.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            sort_order: SortOrder::default(),
        }
    }

    /// Rebuilds a folder from stored parts.
    pub(crate) fn from_parts(
        name: impl Into<String>,
        messages: Vec<Message>,
        sort_order: SortOrder,
    ) -> Self {
        Self {
            name: name.into(),
            messages,
            sort_order,
        }
    }

    /// Folder name as it was registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    /// The last sort applied.
    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Messages in their current order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate messages in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the folder holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Message at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Position of the message with the given id.
    #[must_use]
    pub fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }

    /// Returns true if the message with the given id is in this folder.
    #[must_use]
    pub fn contains(&self, id: MessageId) -> bool {
        self.position(id).is_some()
    }

    /// Appends a message at the end. Never re-sorts.
    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes and returns the message at `index`, shifting later entries down.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is past the end.
    pub fn remove_at(&mut self, index: usize) -> Result<Message> {
        if index >= self.messages.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.messages.len(),
            });
        }
        Ok(self.messages.remove(index))
    }

    /// Removes every message, returning them in their current order.
    pub fn take_all(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// Stable sort by subject.
    pub fn sort_by_subject(&mut self, ascending: bool) {
        if ascending {
            self.messages.sort_by(|a, b| a.subject().cmp(b.subject()));
            self.sort_order = SortOrder::SubjectAscending;
        } else {
            self.messages.sort_by(|a, b| b.subject().cmp(a.subject()));
            self.sort_order = SortOrder::SubjectDescending;
        }
    }

    /// Stable sort by creation time.
    pub fn sort_by_date(&mut self, ascending: bool) {
        if ascending {
            self.messages.sort_by_key(Message::created_at);
            self.sort_order = SortOrder::DateAscending;
        } else {
            self.messages
                .sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            self.sort_order = SortOrder::DateDescending;
        }
    }

    /// Applies the given sort.
    pub fn sort(&mut self, order: SortOrder) {
        match order {
            SortOrder::SubjectAscending => self.sort_by_subject(true),
            SortOrder::SubjectDescending => self.sort_by_subject(false),
            SortOrder::DateAscending => self.sort_by_date(true),
            SortOrder::DateDescending => self.sort_by_date(false),
        }
    }
}

impl<'a> IntoIterator for &'a Folder {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
