//! Ordered notification collection.
//!
//! `add` does not check tags. Callers that need one-record-per-tag (the
//! reminder rules) must check `has_tag` first; untagged and intentionally
//! repeated notifications go through the same entry point.

use crate::model::notification::{Notification, NotificationId};
use crate::model::now_epoch_ms;

/// Most-recent-first list of notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationStore {
    items: Vec<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the whole collection. Used for hydration.
    pub fn replace_all(&mut self, items: Vec<Notification>) -> bool {
        if self.items == items {
            return false;
        }
        self.items = items;
        true
    }

    /// Prepends an unread notification stamped with the current time.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        body: Option<String>,
        tag: Option<String>,
    ) -> NotificationId {
        self.add_at(title, body, tag, now_epoch_ms())
    }

    /// Prepends an unread notification stamped with `created_at`.
    pub fn add_at(
        &mut self,
        title: impl Into<String>,
        body: Option<String>,
        tag: Option<String>,
        created_at: i64,
    ) -> NotificationId {
        let notification = Notification::new(title, body, tag, created_at);
        let id = notification.id.clone();
        self.items.insert(0, notification);
        id
    }

    /// Marks one notification read. Unknown or already-read ids are ignored.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if !item.read => {
                item.read = true;
                true
            }
            _ => false,
        }
    }

    /// Marks every notification read.
    pub fn mark_all_read(&mut self) -> bool {
        let mut changed = false;
        for item in self.items.iter_mut().filter(|item| !item.read) {
            item.read = true;
            changed = true;
        }
        changed
    }

    /// Empties the collection.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.items.iter().any(|item| item.has_tag(tag))
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationStore;

    #[test]
    fn mark_read_on_read_item_reports_no_change() {
        let mut store = NotificationStore::new();
        let id = store.add_at("hi", None, None, 1);

        assert!(store.mark_read(&id));
        assert!(!store.mark_read(&id));
    }

    #[test]
    fn clear_on_empty_store_reports_no_change() {
        let mut store = NotificationStore::new();
        assert!(!store.clear());
    }
}
