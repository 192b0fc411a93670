use crate::application::ports::{DeliveryChannel, DeliveryError};
use crate::domain::entities::{InboundMessage, OutboundMessage};
use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, trace};

/// In-process delivery channel backed by tokio channels.
///
/// The paired [`WorkerEndpoint`] plays the background worker: it drains
/// outbound messages, performs the delivery however it likes and reports
/// outcomes back, which fan out to every subscriber.
pub struct WorkerChannel {
    supported: bool,
    outbound: Option<mpsc::UnboundedSender<OutboundMessage>>,
    inbound: broadcast::Sender<InboundMessage>,
    ready: watch::Receiver<bool>,
}

/// Worker side of a [`WorkerChannel`].
pub struct WorkerEndpoint {
    outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    inbound: broadcast::Sender<InboundMessage>,
    ready: watch::Sender<bool>,
}

impl WorkerChannel {
    /// `buffer` bounds how many reports a slow subscriber may fall behind by.
    /// The channel is not ready until the endpoint calls `activate`.
    pub fn new(buffer: usize) -> (Self, WorkerEndpoint) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, _) = broadcast::channel(buffer.max(1));
        let (ready_tx, ready_rx) = watch::channel(false);

        let channel = Self {
            supported: true,
            outbound: Some(outbound_tx),
            inbound: inbound_tx.clone(),
            ready: ready_rx,
        };
        let endpoint = WorkerEndpoint {
            outbound: outbound_rx,
            inbound: inbound_tx,
            ready: ready_tx,
        };
        (channel, endpoint)
    }

    /// A platform without background delivery. Every call reports `Unsupported`.
    pub fn unsupported() -> Self {
        let (inbound_tx, _) = broadcast::channel(1);
        let (_, ready_rx) = watch::channel(false);
        Self {
            supported: false,
            outbound: None,
            inbound: inbound_tx,
            ready: ready_rx,
        }
    }
}

#[async_trait]
impl DeliveryChannel for WorkerChannel {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn ready(&self) -> Result<(), DeliveryError> {
        if !self.supported {
            return Err(DeliveryError::Unsupported);
        }
        let mut ready = self.ready.clone();
        if ready.wait_for(|is_ready| *is_ready).await.is_err() {
            return Err(DeliveryError::Closed);
        }
        Ok(())
    }

    fn post_message(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        let Some(outbound) = self.outbound.as_ref() else {
            return Err(DeliveryError::Unsupported);
        };
        let message_type = message.message_type();
        outbound.send(message).map_err(|_| DeliveryError::Closed)?;
        trace!(message_type, "Posted message to worker");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<InboundMessage> {
        self.inbound.subscribe()
    }
}

impl WorkerEndpoint {
    /// Marks the worker as active; pending `ready()` calls resolve.
    pub fn activate(&self) {
        self.set_ready(true);
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.send_replace(ready);
    }

    /// Next outbound message, or `None` once the channel side is dropped.
    pub async fn recv(&mut self) -> Option<OutboundMessage> {
        self.outbound.recv().await
    }

    pub fn try_recv(&mut self) -> Option<OutboundMessage> {
        self.outbound.try_recv().ok()
    }

    /// Fans an outcome out to subscribers. Returns how many received it.
    pub fn report(&self, message: InboundMessage) -> usize {
        match self.inbound.send(message) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(message)) => {
                debug!(message_type = %message.message_type, "No listeners for worker report");
                0
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inbound.receiver_count()
    }
}
