// Infrastructure module - backoff policy and background task bookkeeping
pub mod backoff;
pub mod task_manager;

pub use backoff::Backoff;
pub use task_manager::TaskManager;
