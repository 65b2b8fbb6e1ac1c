use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Subscriber callback invoked with the message payload.
pub type SubscriberFn = dyn Fn(serde_json::Value) + Send + Sync;

/// Handle identifying one registered callback within a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Mapping from topic name to its registered subscriber callbacks.
///
/// The registry's lifetime is independent of any connection: it survives
/// reconnects so the client can replay one `subscribe` frame per topic after
/// every successful open. A topic entry exists exactly while it has at least
/// one subscriber.
#[derive(Default)]
pub struct TopicRegistry {
    topics: HashMap<String, Vec<(SubscriberId, Arc<SubscriberFn>)>>,
    next_id: u64,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback under a topic; returns its removal handle.
    pub fn add<F>(&mut self, topic: impl Into<String>, callback: F) -> SubscriberId
    where
        F: Fn(serde_json::Value) + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.topics
            .entry(topic.into())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove exactly one callback; drops the topic entry when it was the
    /// last subscriber.
    pub fn remove(&mut self, topic: &str, id: SubscriberId) {
        if let Some(subscribers) = self.topics.get_mut(topic) {
            subscribers.retain(|(sub_id, _)| *sub_id != id);
            if subscribers.is_empty() {
                self.topics.remove(topic);
            }
        }
    }

    /// Topics currently holding at least one subscriber.
    pub fn topics(&self) -> Vec<String> {
        self.topics.keys().cloned().collect()
    }

    /// Clone the callback list for a topic, in registration order.
    ///
    /// Dispatch iterates the snapshot, so a callback unsubscribing mid-pass
    /// cannot invalidate the current iteration.
    pub fn snapshot(&self, topic: &str) -> Vec<Arc<SubscriberFn>> {
        self.topics
            .get(topic)
            .map(|subs| subs.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Guard for one registered callback.
///
/// Removing it (explicitly via [`unsubscribe`](Self::unsubscribe) or by
/// dropping the guard) deletes exactly this callback; the registry entry for
/// the topic disappears with its last subscriber. No unsubscribe message is
/// sent to the server — server-side interest is simply not replayed on the
/// next reconnect.
#[must_use = "dropping the guard unsubscribes the callback immediately"]
pub struct Subscription {
    registry: Arc<RwLock<TopicRegistry>>,
    topic: String,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(
        registry: Arc<RwLock<TopicRegistry>>,
        topic: String,
        id: SubscriberId,
    ) -> Self {
        Self {
            registry,
            topic,
            id,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Remove this callback now instead of at drop time.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.write().remove(&self.topic, self.id);
    }
}
