use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::client::{ClientState, ConnectionState, RealtimeClient};
use crate::endpoint::EndpointConfig;
use crate::infrastructure::Backoff;
use crate::messaging::TopicRegistry;
use crate::session::SessionStore;
use crate::types::constants::{HEARTBEAT_INTERVAL, RECONNECT_BASE_DELAY, RECONNECT_MAX_DELAY};

/// Tuning knobs for the transport client. All intervals are milliseconds.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Heartbeat ping cadence while connected (default 30 000).
    pub heartbeat_interval: Option<u64>,
    /// First reconnect delay (default 1 000).
    pub reconnect_base_delay: Option<u64>,
    /// Reconnect delay cap (default 30 000).
    pub reconnect_max_delay: Option<u64>,
}

impl ClientOptions {
    pub(crate) fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval.unwrap_or(HEARTBEAT_INTERVAL))
    }

    pub(crate) fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.reconnect_base_delay.unwrap_or(RECONNECT_BASE_DELAY)),
            Duration::from_millis(self.reconnect_max_delay.unwrap_or(RECONNECT_MAX_DELAY)),
        )
    }
}

/// Builder for `RealtimeClient` that wires up state and the reconnection
/// watcher. `build()` spawns a background task and must run inside a tokio
/// runtime.
pub struct RealtimeClientBuilder {
    endpoint: EndpointConfig,
    session: Arc<dyn SessionStore>,
    options: ClientOptions,
}

impl RealtimeClientBuilder {
    pub fn new(
        endpoint: EndpointConfig,
        session: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            endpoint,
            session,
            options,
        }
    }

    /// Build the client and spawn the reconnection watcher.
    pub fn build(self) -> RealtimeClient {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let backoff = self.options.backoff();

        let client = RealtimeClient {
            endpoint: self.endpoint,
            session: self.session,
            options: self.options,
            backoff,
            state: Arc::new(RwLock::new(ClientState::new(state_tx))),
            registry: Arc::new(RwLock::new(TopicRegistry::new())),
        };

        client.ensure_watcher();
        client
    }
}
