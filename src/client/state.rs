use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

use crate::infrastructure::TaskManager;

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial state, and terminal after an explicit teardown.
    Disconnected,
    /// Handshake in flight.
    Connecting,
    /// Live connection; heartbeat running, sends accepted.
    Connected,
    /// Connection lost; a backoff-delayed reconnect is due.
    ReconnectPending,
}

/// Consolidated mutable state for `RealtimeClient`.
///
/// A single struct behind one lock keeps the synchronous operations
/// (`send`, `subscribe`, state reads) cheap and contention-free. The lock is
/// never held across an await point.
pub struct ClientState {
    /// Current lifecycle state.
    pub connection: ConnectionState,

    /// Reconnect attempt counter; resets to 0 on every successful open.
    pub reconnect_attempts: u32,

    /// Handle into the write pump of the live connection, if any.
    pub write_tx: Option<mpsc::Sender<Message>>,

    /// Whether the last disconnect was requested (suppresses auto-reconnect).
    pub was_manual_disconnect: bool,

    /// Publishes lifecycle transitions to the watcher task and consumers.
    pub state_tx: watch::Sender<ConnectionState>,

    /// Background tasks of the current connection generation.
    pub tasks: TaskManager,

    /// Long-lived reconnection watcher task.
    pub watcher: Option<tokio::task::JoinHandle<()>>,
}

impl ClientState {
    pub fn new(state_tx: watch::Sender<ConnectionState>) -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            reconnect_attempts: 0,
            write_tx: None,
            was_manual_disconnect: false,
            state_tx,
            tasks: TaskManager::new(),
            watcher: None,
        }
    }

    /// Record a transition and notify watchers.
    pub fn transition(&mut self, next: ConnectionState) {
        if self.connection == next {
            return;
        }
        tracing::debug!("Connection state: {:?} -> {:?}", self.connection, next);
        self.connection = next;
        if self.state_tx.send(next).is_err() {
            tracing::debug!("No state watchers remain for {:?}", next);
        }
    }
}
