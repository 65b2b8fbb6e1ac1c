use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::messaging::TopicRegistry;
use crate::types::ServerMessage;

/// Routes incoming messages to the subscribers registered for their type.
pub struct MessageRouter {
    registry: Arc<RwLock<TopicRegistry>>,
}

impl MessageRouter {
    pub fn new(registry: Arc<RwLock<TopicRegistry>>) -> Self {
        Self { registry }
    }

    /// Deliver a message to every subscriber of its topic.
    ///
    /// Heartbeat acknowledgments are consumed here and never dispatched.
    /// Callbacks run sequentially in registration order over a snapshot of
    /// the subscriber list; a panicking callback is logged and does not stop
    /// delivery to the remaining subscribers.
    pub fn route(&self, message: &ServerMessage) {
        if message.is_pong() {
            tracing::debug!("Received heartbeat ack");
            return;
        }

        let subscribers = self.registry.read().snapshot(&message.kind);
        if subscribers.is_empty() {
            tracing::debug!("No subscribers for topic '{}', dropping", message.kind);
            return;
        }

        let payload = message.payload();
        for callback in subscribers {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(payload.clone()))) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::error!("Subscriber for topic '{}' panicked: {}", message.kind, reason);
            }
        }
    }
}
