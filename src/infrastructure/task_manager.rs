use tokio::task::JoinHandle;

/// Tracks the background tasks of one connection generation (read pump,
/// write pump, heartbeat) so every exit path can cancel all of them.
#[derive(Default)]
pub struct TaskManager {
    handles: Vec<JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task and track it.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.handles.push(tokio::spawn(future));
    }

    /// Abort all tracked tasks without waiting.
    pub fn abort_all(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
        self.handles.clear();
    }
}
