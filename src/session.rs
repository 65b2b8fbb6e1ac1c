use parking_lot::RwLock;

/// Read-only view of the current auth credential.
///
/// The transport polls this once per connection attempt to build the
/// handshake URL; it never watches for changes. A token update therefore
/// takes effect on the next (re)connect.
pub trait SessionStore: Send + Sync {
    fn current_token(&self) -> Option<String>;
}

/// In-memory session store, suitable for tests and for apps that manage the
/// credential themselves.
#[derive(Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl SessionStore for MemorySessionStore {
    fn current_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}
