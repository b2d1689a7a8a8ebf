//! User-visible notices (the dialogs of a mobile client)

use std::{collections::VecDeque, sync::Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

const RECENT_LIMIT: usize = 50;

/// Whether a notice reports success, a degraded action, or a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Degraded,
    Reminder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    pub fn degraded(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Degraded, title, message)
    }

    pub fn reminder(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Reminder, title, message)
    }

    fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Fan-out of notices to live listeners plus a bounded recent list for polling
#[derive(Debug)]
pub struct NoticeBoard {
    tx: broadcast::Sender<Notice>,
    recent: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            tx,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Degraded => warn!("{}: {}", notice.title, notice.message),
            _ => info!("{}: {}", notice.title, notice.message),
        }

        if let Ok(mut recent) = self.recent.lock() {
            recent.push_front(notice.clone());
            recent.truncate(RECENT_LIMIT);
        }

        // No subscribers is the normal case for a polling client
        let _ = self.tx.send(notice);
    }

    /// Newest-first copy of the retained notices
    pub fn recent(&self) -> Vec<Notice> {
        self.recent
            .lock()
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}
