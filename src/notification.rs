use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::RealtimeClient;
use crate::messaging::Subscription;
use crate::types::constants::{message_types, NOTIFICATION_TOPIC};
use crate::types::ClientMessage;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Application notification payload carried in `send_notification` frames and
/// pushed back to clients on the `notification` topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Target user; absent means broadcast.
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Notification {
    /// New notification with a fresh id and the current timestamp.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: format!("notif_{}", Uuid::new_v4()),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
            metadata: serde_json::Map::new(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_metadata(
        mut self,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Thin consumer-side facade over the transport for the notification bell and
/// friends: push client-originated notifications and subscribe to inbound
/// ones. Holds a client handle — construct it with the one shared instance.
pub struct NotificationService {
    client: RealtimeClient,
}

impl NotificationService {
    pub fn new(client: RealtimeClient) -> Self {
        Self { client }
    }

    /// Push a notification to the server, best-effort.
    ///
    /// Delivery follows the transport's send contract: while disconnected the
    /// frame is dropped with a warning.
    pub fn send(&self, notification: Notification) {
        match serde_json::to_value(&notification) {
            Ok(data) => {
                self.client
                    .send(ClientMessage::new(message_types::SEND_NOTIFICATION, data));
            }
            Err(e) => tracing::error!("Failed to serialize notification: {}", e),
        }
    }

    /// Receive notifications pushed for the current session.
    ///
    /// The callback gets the raw payload; malformed entries are the
    /// caller's concern (typically `serde_json::from_value::<Notification>`).
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(serde_json::Value) + Send + Sync + 'static,
    {
        self.client.subscribe(NOTIFICATION_TOPIC, callback)
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }
}
