//! Message data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message within a mailbox.
///
/// Two messages with identical fields are still distinct entities; the id is
/// what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Create a new message ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A locally composed email.
///
/// All fields are fixed at construction. A message is deliberately not
/// `Clone` and cannot be deserialized on its own: it lives in exactly one
/// folder and changes folders by move.
///
/// ```compile_fail
/// let message: mailfold_core::Message = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    to: String,
    cc: String,
    bcc: String,
    subject: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time.
    #[must_use]
    pub(crate) fn new(
        id: MessageId,
        to: impl Into<String>,
        cc: impl Into<String>,
        bcc: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(id, to, cc, bcc, subject, body, Utc::now())
    }

    /// Creates a message with an explicit creation time.
    #[must_use]
    pub(crate) fn with_timestamp(
        id: MessageId,
        to: impl Into<String>,
        cc: impl Into<String>,
        bcc: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            to: to.into(),
            cc: cc.into(),
            bcc: bcc.into(),
            subject: subject.into(),
            body: body.into(),
            created_at,
        }
    }

    /// Message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Recipients (To).
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Carbon-copy recipients.
    #[must_use]
    pub fn cc(&self) -> &str {
        &self.cc
    }

    /// Blind carbon-copy recipients.
    #[must_use]
    pub fn bcc(&self) -> &str {
        &self.bcc
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// When the message was composed.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_sets_fields_and_timestamp() {
        let before = Utc::now();
        let msg = Message::new(MessageId(7), "a@x", "b@x", "c@x", "Hi", "Hello there");
        let after = Utc::now();

        assert_eq!(msg.id(), MessageId(7));
        assert_eq!(msg.to(), "a@x");
        assert_eq!(msg.cc(), "b@x");
        assert_eq!(msg.bcc(), "c@x");
        assert_eq!(msg.subject(), "Hi");
        assert_eq!(msg.body(), "Hello there");
        assert!(msg.created_at() >= before && msg.created_at() <= after);
    }

    #[test]
    fn identical_fields_distinct_ids_are_not_equal() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let a = Message::with_timestamp(MessageId(1), "to", "", "", "Same", "body", at);
        let b = Message::with_timestamp(MessageId(2), "to", "", "", "Same", "body", at);
        assert_ne!(a, b);
    }

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", MessageId::new(42)), "#42");
    }
}
