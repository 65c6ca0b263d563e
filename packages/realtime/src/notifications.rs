// ABOUTME: Bounded, newest-first log of notifications derived from realtime events
// ABOUTME: Oldest entries are dropped silently once the cap is reached

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use uuid::Uuid;

/// Most notifications kept at any time
pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Name of the event that produced this notification
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, data: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            message: message.into(),
            data,
            timestamp: Utc::now(),
            read: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a notification, truncating to [`MAX_NOTIFICATIONS`]
    pub fn add(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(MAX_NOTIFICATIONS);
    }

    /// Newest first
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Returns false when no notification has this id
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in self.entries.iter_mut() {
            notification.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
