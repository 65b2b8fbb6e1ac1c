use std::sync::Arc;

use futures::sink::SinkExt;
use futures::stream::StreamExt;
use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

use crate::client::{ClientOptions, ClientState, ConnectionState, RealtimeClientBuilder};
use crate::endpoint::EndpointConfig;
use crate::heartbeat::HeartbeatManager;
use crate::infrastructure::Backoff;
use crate::messaging::{MessageRouter, Subscription, TopicRegistry};
use crate::session::SessionStore;
use crate::types::constants::WRITE_QUEUE_CAPACITY;
use crate::types::{ClientMessage, Result, ServerMessage};

/// Realtime transport client for the Bookwell notification socket.
///
/// Owns one persistent WebSocket connection, multiplexes inbound messages to
/// per-topic subscribers, keeps the link alive with a heartbeat, and
/// reconnects with capped exponential backoff after any close or error.
///
/// The client is a cheap `Clone` handle over shared state. Construct exactly
/// one per authenticated session at application startup and pass it by
/// reference (or clone) to every consumer that needs `send`/`subscribe` —
/// there is no ambient global.
///
/// The topic registry outlives any individual connection: after every
/// successful (re)connect the client replays one `subscribe` frame per topic
/// that still has subscribers.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use bookwell_realtime::{
///     ClientOptions, EndpointConfig, Environment, MemorySessionStore, RealtimeClient,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = EndpointConfig::new("https://app.bookwell.example", Environment::Production)?;
/// let client = RealtimeClient::new(
///     endpoint,
///     Arc::new(MemorySessionStore::new("jwt")),
///     ClientOptions::default(),
/// );
///
/// client.connect().await?;
/// let _sub = client.subscribe("notification", |data| println!("{data}"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RealtimeClient {
    pub(crate) endpoint: EndpointConfig,
    pub(crate) session: Arc<dyn SessionStore>,
    pub(crate) options: ClientOptions,
    pub(crate) backoff: Backoff,

    pub(crate) state: Arc<RwLock<ClientState>>,
    pub(crate) registry: Arc<RwLock<TopicRegistry>>,
}

impl RealtimeClient {
    /// Create a client and spawn its reconnection watcher.
    ///
    /// Must be called within a tokio runtime. The connection is not opened
    /// until [`connect()`](Self::connect).
    pub fn new(
        endpoint: EndpointConfig,
        session: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        RealtimeClientBuilder::new(endpoint, session, options).build()
    }

    /// Establishes the WebSocket connection.
    ///
    /// No-op when already connected or connecting. The session store is
    /// polled for the current credential, the handshake URL is derived from
    /// the configured origin, and on success the write pump, read task and
    /// heartbeat are spawned, the reconnect attempt counter resets, and every
    /// registered topic is resubscribed.
    ///
    /// A handshake failure transitions to `ReconnectPending` and returns the
    /// error; the watcher keeps retrying with backoff, so callers may ignore
    /// the error if best-effort startup is acceptable.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.state.write();
            match state.connection {
                ConnectionState::Connected | ConnectionState::Connecting => return Ok(()),
                _ => {
                    // an explicit connect() re-arms auto-reconnect even if the
                    // handshake below fails
                    state.was_manual_disconnect = false;
                    state.transition(ConnectionState::Connecting);
                }
            }
        }
        self.ensure_watcher();

        let token = self.session.current_token();
        let url = match self.endpoint.websocket_url(token.as_deref()) {
            Ok(url) => url,
            Err(e) => {
                self.state
                    .write()
                    .transition(ConnectionState::ReconnectPending);
                return Err(e);
            }
        };

        // credential rides in the query string, keep it out of the logs
        tracing::info!(
            "Connecting to {}://{}{}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            url.path()
        );

        let ws_stream = match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                tracing::error!("WebSocket handshake failed: {}", e);
                self.state
                    .write()
                    .transition(ConnectionState::ReconnectPending);
                return Err(e.into());
            }
        };

        let (mut write_half, mut read_half) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<Message>(WRITE_QUEUE_CAPACITY);

        let router = MessageRouter::new(Arc::clone(&self.registry));
        let state_for_read = Arc::clone(&self.state);

        {
            let mut state = self.state.write();

            // a teardown may have raced the handshake; its state stands and
            // the fresh socket is simply dropped
            if state.was_manual_disconnect || state.connection != ConnectionState::Connecting {
                tracing::info!("Connection superseded during handshake, discarding socket");
                return Ok(());
            }

            // supersede whatever was left of the previous generation
            state.tasks.abort_all();
            state.write_tx = Some(tx);
            state.reconnect_attempts = 0;

            state.tasks.spawn(async move {
                while let Some(msg) = rx.recv().await {
                    if let Err(e) = write_half.send(msg).await {
                        tracing::error!("WebSocket write error: {}", e);
                        break;
                    }
                }
                tracing::debug!("Write task finished");
            });

            state.tasks.spawn(async move {
                while let Some(frame) = read_half.next().await {
                    match frame {
                        Ok(Message::Text(text)) => {
                            match serde_json::from_str::<ServerMessage>(&text) {
                                Ok(message) => router.route(&message),
                                Err(e) => {
                                    tracing::error!(
                                        "Failed to parse message: {} - raw: {}",
                                        e,
                                        text
                                    );
                                }
                            }
                        }
                        Ok(Message::Close(frame)) => {
                            match frame {
                                Some(frame) => tracing::warn!(
                                    "Server closed connection: code={:?}, reason='{}'",
                                    frame.code,
                                    frame.reason
                                ),
                                None => {
                                    tracing::warn!("Server closed connection without close frame")
                                }
                            }
                            break;
                        }
                        Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                        Ok(other) => {
                            tracing::warn!("Ignoring unexpected frame: {:?}", other);
                        }
                        Err(e) => {
                            tracing::error!("WebSocket read error: {}", e);
                            break;
                        }
                    }
                }
                // graceful and erroneous closes take the same path: schedule
                // a backoff reconnect unless this was a manual teardown
                let mut state = state_for_read.write();
                if !state.was_manual_disconnect
                    && state.connection == ConnectionState::Connected
                {
                    // the heartbeat and write pump die with their connection
                    // (aborting this task too is fine, nothing awaits below)
                    state.tasks.abort_all();
                    state.write_tx = None;
                    state.transition(ConnectionState::ReconnectPending);
                }
                tracing::debug!("Read task finished");
            });

            state.transition(ConnectionState::Connected);

            HeartbeatManager::new(Arc::clone(&self.state), self.options.heartbeat())
                .spawn_on(&mut state.tasks);
        }

        self.resubscribe_all();

        tracing::info!("Connected to realtime server");
        Ok(())
    }

    /// Serialize and transmit a message, best-effort.
    ///
    /// When not connected this logs a warning and drops the message; it never
    /// buffers and never returns an error. Callers must not assume delivery.
    pub fn send(&self, message: ClientMessage) {
        let state = self.state.read();
        if state.connection != ConnectionState::Connected {
            tracing::warn!("Not connected, message not sent: {:?}", message);
            return;
        }
        let Some(tx) = &state.write_tx else {
            tracing::warn!("No live connection, message not sent: {:?}", message);
            return;
        };

        match serde_json::to_string(&message) {
            Ok(json) => {
                if let Err(e) = tx.try_send(Message::Text(json.into())) {
                    tracing::warn!("Write queue rejected message, dropped: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize outbound message: {}", e),
        }
    }

    /// Register a callback for a topic.
    ///
    /// If currently connected, a `subscribe` control frame goes out
    /// immediately (the server treats it as idempotent); either way the topic
    /// is replayed after every reconnect while it has subscribers. The
    /// returned guard removes exactly this callback when dropped or
    /// explicitly unsubscribed; no wire message is sent on removal.
    pub fn subscribe<F>(&self, topic: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(serde_json::Value) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let id = self.registry.write().add(topic.clone(), callback);

        if self.is_connected() {
            self.send(ClientMessage::subscribe(topic.clone()));
        }

        Subscription::new(Arc::clone(&self.registry), topic, id)
    }

    /// Tear the client down.
    ///
    /// Cancels the pending reconnect (if any), aborts the heartbeat and
    /// read/write pumps, drops the connection, and transitions to
    /// `Disconnected`. No automatic reconnection happens afterwards; a fresh
    /// [`connect()`](Self::connect) starts over. Subscriptions are kept.
    pub fn disconnect(&self) {
        let mut state = self.state.write();
        if state.connection == ConnectionState::Disconnected {
            return;
        }

        state.was_manual_disconnect = true;
        state.tasks.abort_all();
        if let Some(watcher) = state.watcher.take() {
            watcher.abort();
        }
        state.write_tx = None;
        state.transition(ConnectionState::Disconnected);

        tracing::info!("Disconnected from realtime server");
    }

    /// Whether the connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.state.read().connection == ConnectionState::Connected
    }

    /// Current lifecycle state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state.read().connection
    }

    /// Watch lifecycle transitions, e.g. to drive a "disconnected" indicator.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.read().state_tx.subscribe()
    }

    /// Replay one `subscribe` frame per topic with live subscribers.
    fn resubscribe_all(&self) {
        for topic in self.registry.read().topics() {
            self.send(ClientMessage::subscribe(topic));
        }
    }

    /// Spawn the reconnection watcher if it is not already running.
    pub(crate) fn ensure_watcher(&self) {
        let mut state = self.state.write();
        if state
            .watcher
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
        {
            return;
        }

        let mut rx = state.state_tx.subscribe();
        let client = self.clone();
        state.watcher = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let current = *rx.borrow_and_update();
                if current == ConnectionState::ReconnectPending {
                    client.run_reconnect_loop().await;
                }
            }
            tracing::debug!("Reconnection watcher finished");
        }));
    }

    /// Retry `connect()` with capped exponential backoff until the client is
    /// connected again or manually torn down. Never gives up on its own.
    async fn run_reconnect_loop(&self) {
        loop {
            let attempt = {
                let mut state = self.state.write();
                if state.was_manual_disconnect
                    || state.connection != ConnectionState::ReconnectPending
                {
                    return;
                }
                let attempt = state.reconnect_attempts;
                state.reconnect_attempts += 1;
                attempt
            };

            tracing::info!(
                "Reconnecting in {:?} (attempt {})",
                self.backoff.delay(attempt),
                attempt
            );
            self.backoff.wait(attempt).await;

            {
                // a manual teardown during the sleep cancels the retry
                let state = self.state.read();
                if state.was_manual_disconnect
                    || state.connection != ConnectionState::ReconnectPending
                {
                    return;
                }
            }

            match self.connect().await {
                Ok(()) => {
                    tracing::info!("Reconnected successfully");
                    return;
                }
                Err(e) => {
                    tracing::error!("Reconnection attempt failed: {}", e);
                }
            }
        }
    }
}
