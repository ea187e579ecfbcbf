//! Stroke relay
//!
//! A [`RelayHub`] rebroadcasts every published payload to all current
//! subscribers, the way the capture relay turns one client's submission into
//! a notification for everyone listening. A [`RelayConsumer`] sits on one
//! subscription and loads each decodable payload into a shared [`Session`].
//!
//! Payloads are opaque JSON until the consumer decodes them. Malformed
//! payloads and lagging subscribers are logged and skipped.

use inkplot_core::{RelayError, RelayPayload};
use inkplot_pipeline::Session;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default number of payloads buffered per subscriber
pub const DEFAULT_RELAY_CAPACITY: usize = 64;

/// One relayed payload
#[derive(Debug, Clone, PartialEq)]
pub struct RelayMessage {
    /// Unique message id
    pub id: Uuid,
    /// Subscription that published it, if any
    pub origin: Option<Uuid>,
    pub payload: Value,
}

/// Broadcast hub for stroke payloads
#[derive(Debug, Clone)]
pub struct RelayHub {
    sender: broadcast::Sender<RelayMessage>,
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_CAPACITY)
    }
}

impl RelayHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Rebroadcast `payload` to every subscriber.
    ///
    /// Returns the number of subscribers reached; publishing with nobody
    /// listening is not an error.
    pub fn publish(&self, payload: Value) -> usize {
        self.publish_from(None, payload)
    }

    /// Rebroadcast a payload submitted through `origin`
    pub fn publish_from(&self, origin: Option<Uuid>, payload: Value) -> usize {
        let message = RelayMessage {
            id: Uuid::new_v4(),
            origin,
            payload,
        };
        let id = message.id;
        match self.sender.send(message) {
            Ok(receivers) => {
                debug!("Relayed payload {} to {} subscribers", id, receivers);
                receivers
            }
            Err(_) => {
                debug!("Relayed payload {} with no subscribers", id);
                0
            }
        }
    }

    pub fn subscribe(&self) -> RelaySubscription {
        let id = Uuid::new_v4();
        debug!("New relay subscription {}", id);
        RelaySubscription {
            id,
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving end of a [`RelayHub`]
#[derive(Debug)]
pub struct RelaySubscription {
    id: Uuid,
    receiver: broadcast::Receiver<RelayMessage>,
}

impl RelaySubscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next message, or why none could be delivered
    pub async fn recv(&mut self) -> Result<RelayMessage, RelayError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Lagged(n) => RelayError::Lagged(n),
            broadcast::error::RecvError::Closed => RelayError::Closed,
        })
    }
}

/// Counters kept by a running consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStats {
    pub accepted: u64,
    pub rejected: u64,
    pub lagged: u64,
}

/// Feeds relayed payloads into a shared session
#[derive(Debug, Clone)]
pub struct RelayConsumer {
    session: Arc<Mutex<Session>>,
}

impl RelayConsumer {
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    /// Decode `payload` and load it. The session is untouched on error.
    pub fn handle(&self, payload: &Value) -> Result<(), RelayError> {
        let decoded = RelayPayload::decode(payload)?;
        let document = decoded.into_document();
        debug!(
            "Loading relayed {} document with {} strokes",
            document.mode(),
            document.stroke_count()
        );
        self.session.lock().load_input(document);
        Ok(())
    }

    /// Decode payload text and load it
    pub fn handle_text(&self, text: &str) -> Result<(), RelayError> {
        let document = RelayPayload::decode_str(text)?.into_document();
        self.session.lock().load_input(document);
        Ok(())
    }

    /// Consume `subscription` until the hub is dropped
    pub async fn run(self, mut subscription: RelaySubscription) -> RelayStats {
        let mut stats = RelayStats::default();
        info!("Relay consumer {} started", subscription.id());

        loop {
            match subscription.recv().await {
                Ok(message) => match self.handle(&message.payload) {
                    Ok(()) => stats.accepted += 1,
                    Err(e) => {
                        warn!("Dropping relay payload {}: {}", message.id, e);
                        stats.rejected += 1;
                    }
                },
                Err(RelayError::Lagged(n)) => {
                    warn!("Relay consumer fell behind, {} payloads skipped", n);
                    stats.lagged += n;
                }
                Err(_) => break,
            }
        }

        info!(
            "Relay consumer {} stopped: {} accepted, {} rejected, {} lagged",
            subscription.id(),
            stats.accepted,
            stats.rejected,
            stats.lagged
        );
        stats
    }

    /// Run the consumer on its own tokio task
    pub fn spawn(self, subscription: RelaySubscription) -> JoinHandle<RelayStats> {
        tokio::spawn(self.run(subscription))
    }
}
