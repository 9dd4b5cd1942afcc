//! Fire-and-forget notification bus.
//!
//! Notifications are transient: they are broadcast once to whoever is
//! subscribed at the time and never persisted.

use crate::config::NotificationConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Info,
    Warning,
    Error,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub level: NotificationLevel,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            detail: None,
            level,
            created_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Broadcast bus for notifications.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(NotificationConfig::CHANNEL_CAPACITY)
    }
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a notification to current subscribers.
    ///
    /// Returns the number of subscribers that received it; zero is not an
    /// error.
    pub fn publish(&self, notification: Notification) -> usize {
        debug!(
            level = ?notification.level,
            "Publishing notification: {}", notification.message
        );
        match self.sender.send(notification) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(_)) => 0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = NotificationBus::default();
        assert_eq!(bus.publish(Notification::info("hello")), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_once() {
        let bus = NotificationBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let sent = Notification::warning("careful").with_detail("more");
        assert_eq!(bus.publish(sent.clone()), 2);

        assert_eq!(a.recv().await.unwrap(), sent);
        assert_eq!(b.recv().await.unwrap(), sent);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_late_subscriber_misses_earlier_messages() {
        let bus = NotificationBus::new(8);
        let _early = bus.subscribe();
        bus.publish(Notification::info("first"));
        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_serializes_level_lowercase() {
        let json = serde_json::to_value(Notification::error("boom")).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
        assert!(json.get("detail").is_none());
    }
}
