//! Notification hub - Notifiche one-line per l'utente (toast lato client)
//!
//! Notifications go out on a tokio broadcast channel; every subscriber filters
//! by recipient. Each one is also logged. Sending never fails the caller: with
//! no subscriber the notification is only logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub recipient_id: i32,
    pub appointment_id: i32,
    pub level: NotificationLevel,
    pub message: String,
    pub emitted_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn success(&self, recipient_id: i32, appointment_id: i32, message: impl Into<String>) {
        let message = message.into();
        info!(recipient_id, appointment_id, "{}", message);
        self.publish(recipient_id, appointment_id, NotificationLevel::Success, message);
    }

    pub fn error(&self, recipient_id: i32, appointment_id: i32, message: impl Into<String>) {
        let message = message.into();
        warn!(recipient_id, appointment_id, "{}", message);
        self.publish(recipient_id, appointment_id, NotificationLevel::Error, message);
    }

    fn publish(
        &self,
        recipient_id: i32,
        appointment_id: i32,
        level: NotificationLevel,
        message: String,
    ) {
        // Err only means nobody is listening right now
        let _ = self.sender.send(Notification {
            recipient_id,
            appointment_id,
            level,
            message,
            emitted_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_notifications() {
        let hub = NotificationHub::new(8);
        let mut rx = hub.subscribe();

        hub.success(1, 42, "Appointment ID: 42 has been accepted.");
        hub.error(1, 9, "boom");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.level, NotificationLevel::Success);
        assert_eq!(first.appointment_id, 42);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.level, NotificationLevel::Error);
        assert_eq!(second.message, "boom");
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let hub = NotificationHub::new(1);
        hub.success(1, 1, "nobody listens");
    }
}
