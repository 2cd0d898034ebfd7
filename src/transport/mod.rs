//! The `transport` module is the boundary to the underlying pub/sub wire
//! protocol.
//!
//! The client consumes a [`Transport`] implementation for connect, publish,
//! subscribe and unsubscribe; every operation returns a [`DeliveryToken`]
//! that resolves once the transport has acknowledged (or failed) it, and all
//! inbound messages are delivered through a single mpsc channel consumed by
//! the dispatch loop. Two implementations ship with the crate: a WebSocket
//! transport and an in-memory loopback used by tests and demos.

pub mod memory;
pub mod message;
pub mod websocket;

pub use memory::MemoryTransport;
pub use websocket::WebSocketTransport;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::protocol::{Message, QoS};
use crate::utils::{Error, Result};

/// Handle for one transport operation.
///
/// Carries the transport-assigned message id (the correlation key for
/// administrative requests) and resolves to success or failure once the
/// transport has processed the operation.
pub struct DeliveryToken {
    message_id: u16,
    ack: oneshot::Receiver<std::result::Result<(), String>>,
}

impl DeliveryToken {
    /// Creates an unresolved token together with the sender half the
    /// transport uses to resolve it. Dropping the sender unresolved reads as
    /// a transport failure.
    pub fn pending(message_id: u16) -> (oneshot::Sender<std::result::Result<(), String>>, Self) {
        let (tx, ack) = oneshot::channel();
        (tx, Self { message_id, ack })
    }

    /// A token that is already resolved successfully.
    pub fn resolved(message_id: u16) -> Self {
        let (tx, token) = Self::pending(message_id);
        let _ = tx.send(Ok(()));
        token
    }

    /// A token that is already resolved with a transport failure.
    pub fn failed(message_id: u16, reason: impl Into<String>) -> Self {
        let (tx, token) = Self::pending(message_id);
        let _ = tx.send(Err(reason.into()));
        token
    }

    /// The transport-unique identifier of this operation, usable as a
    /// correlation key while the operation is outstanding.
    pub fn message_id(&self) -> u16 {
        self.message_id
    }

    /// Waits for the operation to complete, bounded by `bound`.
    pub async fn wait(self, bound: Duration) -> Result<()> {
        match tokio::time::timeout(bound, self.ack).await {
            Err(_) => Err(Error::Timeout),
            Ok(Err(_)) => Err(Error::Transport("operation abandoned".to_string())),
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(reason))) => Err(Error::Transport(reason)),
        }
    }
}

/// The underlying pub/sub transport consumed by the client.
///
/// Implementations assign a numeric message id to every operation, unique
/// among currently outstanding ones, and deliver all inbound messages in
/// order through the channel handed out by `inbound`.
pub trait Transport: Send + Sync {
    fn connect(&self) -> DeliveryToken;

    /// Ends the connection after waiting `grace` for in-flight work.
    fn disconnect(&self, grace: Duration);

    fn is_connected(&self) -> bool;

    fn publish(&self, topic: &str, qos: QoS, retain: bool, payload: Vec<u8>) -> DeliveryToken;

    fn subscribe(&self, topic: &str, qos: QoS) -> DeliveryToken;

    fn unsubscribe(&self, topic: &str) -> DeliveryToken;

    /// Hands out the single inbound message stream. Returns `None` once
    /// taken; there is exactly one dispatch consumer per connection.
    fn inbound(&self) -> Option<mpsc::UnboundedReceiver<Message>>;
}
