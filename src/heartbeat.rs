use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::{self, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;

use crate::client::{ClientState, ConnectionState};
use crate::infrastructure::TaskManager;
use crate::types::ClientMessage;

/// Sends a `{type:"ping"}` keep-alive on a fixed cadence while the client is
/// connected.
///
/// The task exits within one tick of the state leaving `Connected` and is
/// additionally aborted with the rest of the connection generation. Liveness
/// failure detection is not its job — the transport's own close/error events
/// drive reconnection.
pub struct HeartbeatManager {
    interval: Duration,
    state: Arc<RwLock<ClientState>>,
}

impl HeartbeatManager {
    pub fn new(state: Arc<RwLock<ClientState>>, interval: Duration) -> Self {
        Self { interval, state }
    }

    /// Spawn the heartbeat loop under the given task manager.
    pub fn spawn_on(self, tasks: &mut TaskManager) {
        tasks.spawn(async move {
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately; the cadence starts after it
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let tx = {
                    let state = self.state.read();
                    if state.connection != ConnectionState::Connected {
                        break;
                    }
                    state.write_tx.clone()
                };
                let Some(tx) = tx else {
                    break;
                };

                let json = match serde_json::to_string(&ClientMessage::ping()) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize heartbeat: {}", e);
                        break;
                    }
                };
                if tx.try_send(Message::Text(json.into())).is_err() {
                    tracing::warn!("Write queue unavailable, heartbeat skipped");
                    break;
                }
                tracing::debug!("Sent heartbeat ping");
            }
            tracing::debug!("Heartbeat task finished");
        });
    }
}
