//! Collaborator interfaces supplied by the host
//!
//! The core never touches the game client. Entities come in through an
//! [`EntityFeed`], and everything meant for the player or the operator goes
//! out through a [`NotificationSink`].

use serde::{Deserialize, Serialize};

use crate::classify::WorldEntity;

/// Source of nearby world entities, queried once per poll
pub trait EntityFeed {
    fn entities(&self) -> Vec<WorldEntity>;
}

impl EntityFeed for Vec<WorldEntity> {
    fn entities(&self) -> Vec<WorldEntity> {
        self.clone()
    }
}

impl EntityFeed for [WorldEntity] {
    fn entities(&self) -> Vec<WorldEntity> {
        self.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Outbound message for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// Player-facing toast/chat line
    Announcement { text: String, play_sound: bool },
    /// Operator-facing log line
    Diagnostic { severity: Severity, text: String },
}

pub trait NotificationSink {
    fn announce(&mut self, text: &str, play_sound: bool);
    fn diagnostic(&mut self, severity: Severity, text: &str);
}

/// Sink that keeps everything it receives, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub notifications: Vec<Notification>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Announcement { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<(Severity, &str)> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Diagnostic { severity, text } => Some((*severity, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl NotificationSink for RecordingSink {
    fn announce(&mut self, text: &str, play_sound: bool) {
        self.notifications.push(Notification::Announcement { text: text.to_string(), play_sound });
    }

    fn diagnostic(&mut self, severity: Severity, text: &str) {
        self.notifications
            .push(Notification::Diagnostic { severity, text: text.to_string() });
    }
}
