//! Reminder records

use chrono::NaiveDateTime;
use std::fmt;

/// A scheduled one-time notification for a user.
///
/// Timestamps are naive UTC. `id` is assigned by the store on insert; reminders
/// that fire inside the short threshold never touch the store and carry `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: Option<i64>,
    pub user_id: u64,
    pub created_at: NaiveDateTime,
    pub trigger_at: NaiveDateTime,
    pub initiator_message_url: String,
    pub content: String,
}

impl Reminder {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Build the persisted form of a new reminder once the store assigned an id
    pub fn from_new(id: i64, new: NewReminder) -> Self {
        Reminder {
            id: Some(id),
            ..new.into_unsaved()
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "reminder #{id}")?,
            None => write!(f, "short reminder")?,
        }
        write!(f, " (user {}, due {})", self.user_id, self.trigger_at)
    }
}

/// Fields of a reminder before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub user_id: u64,
    pub created_at: NaiveDateTime,
    pub trigger_at: NaiveDateTime,
    pub initiator_message_url: String,
    pub content: String,
}

impl NewReminder {
    /// Turn into a reminder that will never be stored
    pub fn into_unsaved(self) -> Reminder {
        Reminder {
            id: None,
            user_id: self.user_id,
            created_at: self.created_at,
            trigger_at: self.trigger_at,
            initiator_message_url: self.initiator_message_url,
            content: self.content,
        }
    }
}
