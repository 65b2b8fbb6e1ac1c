// Messaging module - topic registry and inbound message routing
pub mod registry;
pub mod router;

pub use registry::{SubscriberId, Subscription, TopicRegistry};
pub use router::MessageRouter;
