// Module declarations
mod builder;
mod core;
mod state;

// Public API exports
pub use builder::{ClientOptions, RealtimeClientBuilder};
pub use core::RealtimeClient;
pub use state::{ClientState, ConnectionState};
