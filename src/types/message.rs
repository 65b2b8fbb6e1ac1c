use serde::{Deserialize, Serialize};

use crate::types::constants::message_types;

/// Outbound envelope: `{ type, event?, data? }`.
///
/// Three concrete shapes go over the wire: `subscribe` (topic registration),
/// `ping` (heartbeat), and application payloads such as `send_notification`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ClientMessage {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            event: None,
            data: Some(data),
        }
    }

    /// Control message registering server-side interest in a topic.
    pub fn subscribe(topic: impl Into<String>) -> Self {
        Self {
            kind: message_types::SUBSCRIBE.to_string(),
            event: Some(topic.into()),
            data: None,
        }
    }

    /// Heartbeat keep-alive.
    pub fn ping() -> Self {
        Self {
            kind: message_types::PING.to_string(),
            event: None,
            data: None,
        }
    }
}

/// Inbound envelope: `{ type, data?, event?, error? }`.
///
/// `type` doubles as the topic name for subscriber dispatch; `pong` is the
/// heartbeat acknowledgment and never reaches subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn is_pong(&self) -> bool {
        self.kind == message_types::PONG
    }

    /// What subscribers receive: `data` when present, else the whole envelope.
    pub fn payload(&self) -> serde_json::Value {
        match &self.data {
            Some(data) => data.clone(),
            None => serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_message_shape() {
        let message = ClientMessage::subscribe("booking_update");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""type":"subscribe""#));
        assert!(json.contains(r#""event":"booking_update""#));
        assert!(!json.contains(r#""data":"#));
    }

    #[test]
    fn test_ping_has_no_optional_fields() {
        let json = serde_json::to_string(&ClientMessage::ping()).unwrap();
        assert_eq!(json, r#"{"type":"ping"}"#);
    }

    #[test]
    fn test_client_message_round_trip() {
        let message = ClientMessage::new("send_notification", serde_json::json!({"title": "hi"}));
        let serialized = serde_json::to_string(&message).unwrap();
        let deserialized: ClientMessage = serde_json::from_str(&serialized).unwrap();
        assert_eq!(message, deserialized);
    }

    #[test]
    fn test_server_message_payload_prefers_data() {
        let message: ServerMessage =
            serde_json::from_str(r#"{"type":"notification","data":{"title":"hi"}}"#).unwrap();
        assert_eq!(message.payload(), serde_json::json!({"title": "hi"}));
    }

    #[test]
    fn test_server_message_payload_falls_back_to_envelope() {
        let message: ServerMessage = serde_json::from_str(r#"{"type":"system_notice"}"#).unwrap();
        assert_eq!(message.payload(), serde_json::json!({"type": "system_notice"}));
    }

    #[test]
    fn test_pong_detection() {
        let message: ServerMessage = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert!(message.is_pong());
    }

    #[test]
    fn test_server_message_tolerates_unknown_fields() {
        let message: ServerMessage =
            serde_json::from_str(r#"{"type":"notification","data":1,"extra":true}"#).unwrap();
        assert_eq!(message.kind, "notification");
    }
}
