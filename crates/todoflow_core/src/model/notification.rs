//! In-app notification record.
//!
//! # Invariants
//! - `tag`, when present, names one logical reminder (for example
//!   `daily:Wed Oct 14 2026`). Tag uniqueness is enforced by callers, not by
//!   this type or its store.
//! - `read` only ever moves from `false` to `true`.

use serde::{Deserialize, Serialize};

/// Stable identifier of a notification record.
pub type NotificationId = String;

/// Reminder or message shown on the notifications screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    /// Omitted from JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Unix epoch milliseconds at creation time.
    pub created_at: i64,
    pub read: bool,
    /// Deduplication key. Omitted from JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Notification {
    /// Creates an unread notification with a generated id.
    pub fn new(
        title: impl Into<String>,
        body: Option<String>,
        tag: Option<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: super::new_record_id(),
            title: title.into(),
            body,
            created_at,
            read: false,
            tag,
        }
    }

    /// Returns whether this record carries exactly `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }
}
