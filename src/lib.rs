//! # Bookwell Realtime
//!
//! Realtime notification transport client for the Bookwell coaching platform.
//!
//! The client owns one persistent WebSocket connection per authenticated
//! session, multiplexes inbound JSON envelopes to per-topic subscriber
//! callbacks, keeps the link alive with a heartbeat, and survives transient
//! failures with capped exponential backoff reconnection.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bookwell_realtime::{
//!     ClientOptions, EndpointConfig, Environment, MemorySessionStore, RealtimeClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = EndpointConfig::new("https://app.bookwell.example", Environment::Production)?;
//!     let session = Arc::new(MemorySessionStore::new("jwt"));
//!
//!     let client = RealtimeClient::new(endpoint, session, ClientOptions::default());
//!     client.connect().await?;
//!
//!     let _sub = client.subscribe("booking_update", |data| {
//!         println!("booking changed: {data}");
//!     });
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoint;
pub mod heartbeat;
pub mod infrastructure;
pub mod messaging;
pub mod notification;
pub mod session;
pub mod types;

pub use client::{ClientOptions, ConnectionState, RealtimeClient, RealtimeClientBuilder};
pub use endpoint::{EndpointConfig, Environment};
pub use messaging::{Subscription, TopicRegistry};
pub use notification::{Notification, NotificationKind, NotificationService};
pub use session::{MemorySessionStore, SessionStore};
pub use types::{ClientMessage, RealtimeError, ServerMessage};
