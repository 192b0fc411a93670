use crate::domain::entities::{InboundMessage, OutboundMessage};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Background delivery is not supported on this platform")]
    Unsupported,

    #[error("Delivery channel closed")]
    Closed,
}

/// The background delivery facility that actually talks to the outside world.
///
/// Posting is fire-and-forget: a successful `post_message` only means the
/// message was handed over, not that anything was delivered. Outcomes come
/// back later as `InboundMessage`s to every subscriber.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Suspends until the channel can accept messages.
    async fn ready(&self) -> Result<(), DeliveryError>;

    fn post_message(&self, message: OutboundMessage) -> Result<(), DeliveryError>;

    fn subscribe(&self) -> broadcast::Receiver<InboundMessage>;
}
