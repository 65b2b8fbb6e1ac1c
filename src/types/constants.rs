/// Wire message type strings (magic strings layer)
pub mod message_types {
    pub const SUBSCRIBE: &str = "subscribe";
    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";
    pub const SEND_NOTIFICATION: &str = "send_notification";
}

/// Topic the server publishes user notifications on
pub const NOTIFICATION_TOPIC: &str = "notification";

/// Default heartbeat interval (milliseconds)
pub const HEARTBEAT_INTERVAL: u64 = 30_000;

/// Reconnect backoff: first delay and cap (milliseconds)
pub const RECONNECT_BASE_DELAY: u64 = 1_000;
pub const RECONNECT_MAX_DELAY: u64 = 30_000;

/// Development backend port (frontend dev server proxies nothing; the
/// transport dials the backend directly)
pub const DEV_BACKEND_PORT: u16 = 8000;

/// WebSocket endpoint path
pub const WS_PATH: &str = "/ws";

/// Query parameter carrying the session credential
pub const TOKEN_PARAM: &str = "token";

/// Outbound write queue depth
pub const WRITE_QUEUE_CAPACITY: usize = 100;
